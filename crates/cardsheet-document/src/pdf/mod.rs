// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — deterministic document assembly on lopdf's object model.

pub mod writer;

pub use writer::{ImageHandle, OpacityHandle, PageCanvas, PdfWriter, StrokeStyle};
