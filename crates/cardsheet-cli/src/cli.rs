// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments and how they override the job file.

use std::path::PathBuf;

use cardsheet_core::error::{CardsheetError, Result};
use cardsheet_core::{PaperPreset, PrintConfig, ScalePercent};
use cardsheet_document::SUGGESTED_FILENAME;
use clap::Parser;

/// Render a proxy card sheet PDF from a job file.
#[derive(Debug, Parser)]
#[command(name = "cardsheet", about, version)]
pub struct Cli {
    /// Job file: `{ "cards": [...], ...options }`
    #[arg(long, value_name = "FILE")]
    pub job: PathBuf,

    /// Where to write the PDF
    #[arg(short, long, value_name = "FILE", default_value = SUGGESTED_FILENAME)]
    pub output: PathBuf,

    /// Directory that relative image references resolve against.
    /// Default: the job file's directory
    #[arg(long, value_name = "DIR")]
    pub images_dir: Option<PathBuf>,

    /// Directory holding the corner triangles and watermark PNGs.
    /// Without it, corner triangles are drawn in memory and the watermark is unavailable
    #[arg(long, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// Paper preset (a4, a3, letter, legal, archA, archB, superB, tabloid, 4r)
    #[arg(long)]
    pub paper: Option<String>,

    /// Card scale in percent, clamped to 90-110
    #[arg(long)]
    pub scale: Option<i32>,

    /// Maximum simultaneous image fetches
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-request timeout for remote images, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Retries for transient remote failures
    #[arg(long, default_value_t = 2)]
    pub retries: u32,

    /// Draw crop marks
    #[arg(long)]
    pub crop_marks: bool,

    /// Draw cut lines
    #[arg(long)]
    pub cut_lines: bool,

    /// Draw black corner markers
    #[arg(long)]
    pub black_corners: bool,

    /// Leave out basic lands
    #[arg(long)]
    pub skip_basic_lands: bool,

    /// Append the checklist
    #[arg(long)]
    pub manifest: bool,

    /// Overlay the playtest watermark
    #[arg(long)]
    pub watermark: bool,
}

impl Cli {
    /// Apply command-line options on top of the job file's configuration.
    /// Flags only switch features on.
    pub fn apply(&self, config: &mut PrintConfig) -> Result<()> {
        if let Some(key) = &self.paper {
            let preset: PaperPreset = key.parse().map_err(|_| {
                let known: Vec<&str> = PaperPreset::ALL.iter().map(|p| p.key()).collect();
                CardsheetError::InvalidConfig(format!(
                    "unknown paper '{key}', expected one of {}",
                    known.join(", ")
                ))
            })?;
            config.paper = preset.spec();
        }
        if let Some(scale) = self.scale {
            config.scale = ScalePercent(scale);
        }
        if let Some(concurrency) = self.concurrency {
            config.fetch_concurrency = concurrency;
        }

        config.crop_marks |= self.crop_marks;
        config.cut_lines |= self.cut_lines;
        config.black_corners |= self.black_corners;
        config.skip_basic_lands |= self.skip_basic_lands;
        config.print_manifest |= self.manifest;
        config.playtest_watermark |= self.watermark;

        config.validate()
    }
}

#[cfg(test)]
mod tests {
    use cardsheet_core::PaperSpec;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cardsheet").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_leave_job_config_alone() {
        let cli = parse(&["--job", "deck.json"]);
        assert_eq!(cli.output, PathBuf::from("mtg-deck.pdf"));

        let mut config = PrintConfig {
            cut_lines: true,
            ..PrintConfig::default()
        };
        cli.apply(&mut config).unwrap();
        assert!(config.cut_lines);
        assert!(!config.crop_marks);
        assert_eq!(config.paper, PaperSpec::letter());
    }

    #[test]
    fn overrides_replace_paper_scale_and_switch_features_on() {
        let cli = parse(&[
            "--job", "deck.json", "--paper", "A4", "--scale", "105", "--concurrency", "3",
            "--crop-marks", "--manifest",
        ]);
        let mut config = PrintConfig::default();
        cli.apply(&mut config).unwrap();

        assert_eq!(config.paper, PaperSpec::a4());
        assert_eq!(config.scale, ScalePercent(105));
        assert_eq!(config.fetch_concurrency, 3);
        assert!(config.crop_marks && config.print_manifest);
    }

    #[test]
    fn unknown_paper_lists_the_presets() {
        let cli = parse(&["--job", "deck.json", "--paper", "b5"]);
        let err = cli.apply(&mut PrintConfig::default()).unwrap_err();
        match err {
            CardsheetError::InvalidConfig(msg) => assert!(msg.contains("superB")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let cli = parse(&["--job", "deck.json", "--concurrency", "0"]);
        assert!(cli.apply(&mut PrintConfig::default()).is_err());
    }

    #[test]
    fn job_is_required() {
        assert!(Cli::try_parse_from(["cardsheet"]).is_err());
    }
}
