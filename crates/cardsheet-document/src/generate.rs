// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end generation: plan, fetch every image as one bounded batch, then
// compose.

use std::sync::Arc;

use cardsheet_core::error::Result;
use cardsheet_core::{CardRecord, PrintConfig};
use cardsheet_fetch::{ImageSource, fetch_all};
use tracing::instrument;

use crate::assets::AssetProvider;
use crate::compose::{Composition, DocumentPlan};

/// MIME type of the generated document.
pub const CONTENT_TYPE: &str = "application/pdf";

/// File name offered to whoever stores the document.
pub const SUGGESTED_FILENAME: &str = "mtg-deck.pdf";

/// Generate the print document for `cards`.
///
/// The layout is checked before anything is fetched. Individual image
/// failures never fail the call; they show up as blank cells.
#[instrument(skip_all, fields(cards = cards.len()))]
pub async fn generate_pdf<S>(
    cards: &[CardRecord],
    config: &PrintConfig,
    source: Arc<S>,
    assets: &dyn AssetProvider,
) -> Result<Vec<u8>>
where
    S: ImageSource + 'static,
{
    Ok(compose(cards, config, source, assets).await?.pdf)
}

/// Like [`generate_pdf`] but keeps the per-page report.
pub async fn compose<S>(
    cards: &[CardRecord],
    config: &PrintConfig,
    source: Arc<S>,
    assets: &dyn AssetProvider,
) -> Result<Composition>
where
    S: ImageSource + 'static,
{
    let plan = DocumentPlan::new(cards, config)?;
    let images = fetch_all(source, plan.image_refs(), config.fetch_concurrency).await;
    plan.render(&images, assets)
}
