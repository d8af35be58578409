// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The `ImageSource` capability and its local implementations.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, instrument};

use crate::error::FetchError;

/// Maps an image reference (URL, path, or any opaque handle) to raw bytes.
///
/// Implementations own their timeouts and retries; the caller treats every
/// error as "this cell stays blank".
pub trait ImageSource: Send + Sync {
    fn fetch(&self, image_ref: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// Reads images from the local filesystem.
///
/// Relative references resolve against `root` and absolute paths are read
/// as given; `file://` prefixes are stripped. Any reference containing a
/// `..` component is refused.
#[derive(Debug, Clone)]
pub struct FileImageSource {
    root: PathBuf,
}

impl FileImageSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, image_ref: &str) -> Result<PathBuf, FetchError> {
        let trimmed = image_ref.strip_prefix("file://").unwrap_or(image_ref);
        if trimmed.is_empty() {
            return Err(FetchError::InvalidReference(image_ref.to_string()));
        }
        let path = Path::new(trimmed);
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(FetchError::InvalidReference(image_ref.to_string()));
        }
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(self.root.join(path))
        }
    }
}

impl ImageSource for FileImageSource {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn fetch(&self, image_ref: &str) -> Result<Vec<u8>, FetchError> {
        let path = self.resolve(image_ref)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!(bytes = bytes.len(), "image read from disk");
                Ok(bytes)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(FetchError::Missing(path.display().to_string()))
            }
            Err(err) => Err(FetchError::Io(err)),
        }
    }
}

/// In-memory reference-to-bytes table.
#[derive(Debug, Clone, Default)]
pub struct StaticImageSource {
    images: HashMap<String, Vec<u8>>,
}

impl StaticImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, image_ref: impl Into<String>, bytes: Vec<u8>) {
        self.images.insert(image_ref.into(), bytes);
    }

    /// Builder-style [`StaticImageSource::insert`].
    pub fn with(mut self, image_ref: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(image_ref, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ImageSource for StaticImageSource {
    async fn fetch(&self, image_ref: &str) -> Result<Vec<u8>, FetchError> {
        self.images
            .get(image_ref)
            .cloned()
            .ok_or_else(|| FetchError::Missing(image_ref.to_string()))
    }
}
