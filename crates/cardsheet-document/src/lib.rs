// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// cardsheet-document — Print layout and document composition for Cardsheet.
//
// Computes the sheet grid for a paper size and scale, expands cards into
// print units, places fetched card images on pages, draws cut guides and
// corner markers, and appends the optional checklist.

pub mod assets;
pub mod compose;
pub mod decorate;
pub mod expand;
pub mod generate;
pub mod geometry;
pub mod image;
pub mod manifest;
pub mod pdf;

// Re-export the primary entry points so callers can use `cardsheet_document::generate_pdf` etc.
pub use assets::{AssetProvider, Corner, DirectoryAssets, GeneratedAssets};
pub use compose::{Composition, DocumentPlan, SheetReport, SlotState};
pub use expand::expand_cards;
pub use generate::{CONTENT_TYPE, SUGGESTED_FILENAME, compose, generate_pdf};
pub use geometry::Layout;
pub use manifest::TextEncoding;
