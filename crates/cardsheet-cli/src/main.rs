// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cardsheet — print-accurate proxy card sheets.
//
// Entry point. Initialises logging, reads the job file, wires up the image
// source and decoration assets, and writes the finished PDF.

mod cli;
mod source;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use cardsheet_core::PrintJob;
use cardsheet_core::error::{CardsheetError, Result};
use cardsheet_document::{AssetProvider, DirectoryAssets, GeneratedAssets, compose};
use cardsheet_fetch::{FileImageSource, HttpImageSource, RetryConfig};

use cli::Cli;
use source::RoutedSource;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "generation failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let json = tokio::fs::read_to_string(&cli.job).await?;
    let mut job = PrintJob::from_json(&json)?;
    cli.apply(&mut job.config)?;

    tracing::info!(
        job = %cli.job.display(),
        cards = job.cards.len(),
        "Cardsheet starting"
    );

    let images_root = match &cli.images_dir {
        Some(dir) => dir.clone(),
        None => cli
            .job
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf(),
    };
    let http = HttpImageSource::new(Duration::from_secs(cli.timeout_secs))
        .map_err(|err| CardsheetError::InvalidConfig(err.to_string()))?
        .with_retry(RetryConfig {
            max_retries: cli.retries,
            ..RetryConfig::default()
        });
    let source = Arc::new(RoutedSource::new(FileImageSource::new(images_root), http));

    let assets: Box<dyn AssetProvider> = match &cli.assets {
        Some(dir) => Box::new(DirectoryAssets::new(dir)),
        None => Box::new(GeneratedAssets::default()),
    };

    let composition = compose(&job.cards, &job.config, source, assets.as_ref()).await?;
    tokio::fs::write(&cli.output, &composition.pdf).await?;

    let missing: usize = composition
        .sheets
        .iter()
        .map(|s| s.occupied() - s.drawn())
        .sum();
    tracing::info!(
        output = %cli.output.display(),
        pages = composition.page_count(),
        missing,
        bytes = composition.pdf.len(),
        "PDF written"
    );
    Ok(())
}
