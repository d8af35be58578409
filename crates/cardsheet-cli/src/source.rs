// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sends each image reference to the source that can serve it: URLs to HTTP,
// everything else to the local filesystem.

use cardsheet_fetch::{FetchError, FileImageSource, HttpImageSource, ImageSource, is_http_reference};

pub struct RoutedSource {
    files: FileImageSource,
    http: HttpImageSource,
}

impl RoutedSource {
    pub fn new(files: FileImageSource, http: HttpImageSource) -> Self {
        Self { files, http }
    }
}

impl ImageSource for RoutedSource {
    async fn fetch(&self, image_ref: &str) -> Result<Vec<u8>, FetchError> {
        if is_http_reference(image_ref) {
            self.http.fetch(image_ref).await
        } else {
            self.files.fetch(image_ref).await
        }
    }
}
