// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — decoding card and asset rasters for embedding.

pub mod decode;

pub use decode::{ColorModel, DecodedImage, ImagePayload, decode_raster};
