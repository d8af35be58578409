// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cardsheet Fetch — where card image bytes come from.  Defines the
// `ImageSource` capability, ships file, in-memory and HTTP implementations,
// and runs the bounded, order-preserving fetch pool the compositor waits on.

pub mod error;
pub mod http;
pub mod pool;
pub mod retry;
pub mod source;

pub use error::FetchError;
pub use http::{HttpImageSource, is_http_reference};
pub use pool::fetch_all;
pub use retry::RetryConfig;
pub use source::{FileImageSource, ImageSource, StaticImageSource};
