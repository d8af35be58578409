// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Generation configuration and the job-file format.

use serde::{Deserialize, Serialize};

use crate::error::{CardsheetError, Result};
use crate::types::{CardRecord, PaperSpec, ScalePercent};

/// Default number of concurrent image fetches.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 8;

/// Options for one document generation run.
///
/// Every field has a default so partial JSON is accepted; call
/// [`PrintConfig::validate`] once at the boundary before generating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrintConfig {
    /// L-shaped marks at every cell corner (default off).
    pub crop_marks: bool,
    /// Full-length lines between columns and rows (default off).
    pub cut_lines: bool,
    /// Triangular corner markers over black-bordered cards (default off).
    pub black_corners: bool,
    /// Drop Plains, Island, Swamp, Mountain, Forest and Wastes (default off).
    pub skip_basic_lands: bool,
    /// Append the checklist pages (default off).
    #[serde(alias = "printDecklist", alias = "printChecklist")]
    pub print_manifest: bool,
    /// Translucent "playtest" overlay on every card (default off).
    pub playtest_watermark: bool,
    /// Paper size (default US Letter).
    pub paper: PaperSpec,
    /// Card scale in percent, clamped to 90..=110 (default 100).
    pub scale: ScalePercent,
    /// Upper bound on simultaneous image fetches (default 8).
    pub fetch_concurrency: usize,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            crop_marks: false,
            cut_lines: false,
            black_corners: false,
            skip_basic_lands: false,
            print_manifest: false,
            playtest_watermark: false,
            paper: PaperSpec::default(),
            scale: ScalePercent::default(),
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }
}

impl PrintConfig {
    /// Reject configurations that cannot produce a document.
    pub fn validate(&self) -> Result<()> {
        if !self.paper.is_valid() {
            return Err(CardsheetError::InvalidConfig(format!(
                "paper must have positive finite dimensions, got {}x{}",
                self.paper.width, self.paper.height
            )));
        }
        if self.fetch_concurrency == 0 {
            return Err(CardsheetError::InvalidConfig(
                "fetch concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// A complete generation request: the card list plus its configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintJob {
    pub cards: Vec<CardRecord>,
    #[serde(flatten)]
    pub config: PrintConfig,
}

impl PrintJob {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
