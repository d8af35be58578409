// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-image retrieval failures.  These never abort a document: the pool turns
// them into blank cells.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{reference} answered HTTP {status}")]
    Status { status: u16, reference: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("no image for reference {0}")]
    Missing(String),

    #[error("unsupported image reference: {0}")]
    InvalidReference(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                reference: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            Self::Transport(err.to_string())
        }
    }
}
