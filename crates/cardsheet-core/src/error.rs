// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Cardsheet.

use thiserror::Error;

/// Geometry failures. Raised before any page is created.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error(
        "card ({card_width_pt:.2}x{card_height_pt:.2}pt) does not fit on the page ({page_width_pt:.2}x{page_height_pt:.2}pt)"
    )]
    CardExceedsPage {
        page_width_pt: f64,
        page_height_pt: f64,
        card_width_pt: f64,
        card_height_pt: f64,
    },

    #[error("invalid paper dimensions: {width}x{height}")]
    InvalidPaper { width: f64, height: f64 },
}

/// Top-level error type for all Cardsheet operations.
///
/// Per-card fetch and decode failures are recovered inside the compositor and
/// never surface here; only failures that abort the whole document do.
#[derive(Debug, Error)]
pub enum CardsheetError {
    // -- Geometry --
    #[error("layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Rasters --
    #[error("image decoding failed: {0}")]
    ImageDecode(String),

    #[error("asset unavailable: {0}")]
    AssetLoad(String),

    // -- Output --
    #[error("document assembly failed: {0}")]
    DocumentAssembly(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CardsheetError>;
