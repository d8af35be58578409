// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP(S) image source backed by `reqwest`, with a per-request timeout and
// backoff retries for transient failures.

use std::time::Duration;

use reqwest::header::ACCEPT;
use tracing::{debug, instrument, warn};

use crate::error::FetchError;
use crate::retry::{RetryConfig, RetryDecision, should_retry};
use crate::source::ImageSource;

/// User agent presented to image hosts.
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; MTG-PDF-Printer/1.0)";

/// Accept header preferring PNG, then any image.
pub const ACCEPT_IMAGES: &str = "image/png,image/*;q=0.8,*/*;q=0.5";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches `http://` and `https://` references.
#[derive(Debug, Clone)]
pub struct HttpImageSource {
    client: reqwest::Client,
    retry: RetryConfig,
}

impl HttpImageSource {
    /// Build a source whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Transport(format!("client setup: {e}")))?;
        Ok(Self {
            client,
            retry: RetryConfig::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn fetch_once(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, ACCEPT_IMAGES)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reference: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}

impl ImageSource for HttpImageSource {
    #[instrument(skip(self))]
    async fn fetch(&self, image_ref: &str) -> Result<Vec<u8>, FetchError> {
        if !is_http_reference(image_ref) {
            return Err(FetchError::InvalidReference(image_ref.to_string()));
        }

        let mut attempt = 0;
        loop {
            match self.fetch_once(image_ref).await {
                Ok(bytes) => {
                    debug!(bytes = bytes.len(), attempt, "image downloaded");
                    return Ok(bytes);
                }
                Err(err) => match should_retry(&err, attempt, &self.retry) {
                    RetryDecision::RetryAfter(delay) => {
                        warn!(error = %err, attempt, "image download failed, retrying");
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    RetryDecision::GiveUp | RetryDecision::Exhausted => return Err(err),
                },
            }
        }
    }
}

/// Whether a reference names an `http://` or `https://` resource.
pub fn is_http_reference(image_ref: &str) -> bool {
    let lower = image_ref.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
