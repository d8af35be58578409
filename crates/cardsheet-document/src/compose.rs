// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page compositor — partitions print units into pages, places fetched card
// images in their cells, and runs the decoration passes over each page.
//
// Per page the draw order is fixed: every card image (each immediately
// followed by its watermark), then corner markers, then crop marks, then cut
// lines. A unit whose image is missing or undecodable leaves its cell blank
// and nothing else moves.

use std::collections::HashMap;

use cardsheet_core::error::Result;
use cardsheet_core::{CardRecord, PrintConfig, PrintUnit};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use crate::assets::{AssetProvider, Corner};
use crate::decorate::{
    self, Decorations, GUIDE_GRAY, GUIDE_THICKNESS_PT, Segment, WATERMARK_OPACITY,
};
use crate::expand::{expand, select_cards};
use crate::geometry::Layout;
use crate::image::decode_raster;
use crate::manifest::{self, ManifestPage, TextEncoding};
use crate::pdf::{ImageHandle, OpacityHandle, PdfWriter, StrokeStyle};

/// Title written into the document information dictionary.
pub const DOCUMENT_TITLE: &str = "MTG Deck";

/// What ended up in one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// The card image was placed.
    Drawn,
    /// A unit was assigned but its image could not be fetched or decoded.
    Missing,
    /// No unit was assigned (tail of the last page).
    Vacant,
}

/// Outcome of one card page, in row-major slot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetReport {
    pub page_index: usize,
    pub slots: Vec<SlotState>,
}

impl SheetReport {
    /// Slots with a unit assigned, drawn or not.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| **s != SlotState::Vacant).count()
    }

    pub fn drawn(&self) -> usize {
        self.slots.iter().filter(|s| **s == SlotState::Drawn).count()
    }

    /// Slots left without a card image.
    pub fn blank(&self) -> usize {
        self.slots.len() - self.drawn()
    }
}

/// A finished document plus what went into it.
#[derive(Debug, Clone)]
pub struct Composition {
    pub pdf: Vec<u8>,
    pub sheets: Vec<SheetReport>,
    pub manifest_pages: usize,
}

impl Composition {
    pub fn page_count(&self) -> usize {
        self.sheets.len() + self.manifest_pages
    }
}

/// Everything that can be decided before a single image is fetched: the
/// layout, the selected cards, and the expanded print units.
#[derive(Debug)]
pub struct DocumentPlan<'a> {
    config: PrintConfig,
    layout: Layout,
    selected: Vec<(usize, &'a CardRecord)>,
    units: Vec<PrintUnit>,
}

impl<'a> DocumentPlan<'a> {
    /// Validate the configuration and compute the layout.
    ///
    /// Fails with a layout error when a card does not fit the page; nothing
    /// has been fetched or drawn at that point.
    #[instrument(skip_all, fields(cards = cards.len()))]
    pub fn new(cards: &'a [CardRecord], config: &PrintConfig) -> Result<Self> {
        config.validate()?;
        let layout = Layout::compute(&config.paper, config.scale)?;
        let selected = select_cards(cards, config.skip_basic_lands);
        let units = expand(&selected);

        info!(
            units = units.len(),
            columns = layout.columns,
            rows = layout.rows,
            pages = layout.page_count(units.len()),
            "document planned"
        );

        Ok(Self {
            config: config.clone(),
            layout,
            selected,
            units,
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn units(&self) -> &[PrintUnit] {
        &self.units
    }

    pub fn config(&self) -> &PrintConfig {
        &self.config
    }

    /// Image references to fetch, one per unit, in unit order.
    pub fn image_refs(&self) -> Vec<String> {
        self.units.iter().map(|u| u.image_ref.clone()).collect()
    }

    /// Checklist layout, or `None` when the checklist is off.
    pub fn manifest(&self) -> Option<Vec<ManifestPage>> {
        if !self.config.print_manifest {
            return None;
        }
        let cards: Vec<&CardRecord> = self.selected.iter().map(|(_, card)| *card).collect();
        Some(manifest::plan_manifest(&cards, self.layout.page_height_pt))
    }

    /// Draw every page. `images[i]` holds the fetched bytes for unit `i`,
    /// `None` for a failed fetch.
    #[instrument(skip_all, fields(units = self.units.len()))]
    pub fn render(&self, images: &[Option<Vec<u8>>], assets: &dyn AssetProvider) -> Result<Composition> {
        let layout = &self.layout;
        let per_page = layout.cards_per_page();
        let mut writer = PdfWriter::new();

        let decorations = if self.units.is_empty() {
            Decorations::default()
        } else {
            Decorations::load(&self.config, assets)
        };
        let watermark: Option<(ImageHandle, OpacityHandle)> =
            decorations.watermark.as_ref().map(|image| {
                let handle = writer.embed_image(image);
                (handle, writer.opacity(WATERMARK_OPACITY))
            });
        let corners: Option<Vec<(Corner, ImageHandle)>> = decorations.corners.as_ref().map(|map| {
            map.iter()
                .map(|(corner, image)| (*corner, writer.embed_image(image)))
                .collect()
        });

        let guide = StrokeStyle {
            rgb: (GUIDE_GRAY, GUIDE_GRAY, GUIDE_GRAY),
            thickness_pt: GUIDE_THICKNESS_PT,
        };
        let cut_lines = decorate::cut_line_segments(layout);
        let mut cache = ImageCache::default();
        let mut sheets = Vec::with_capacity(layout.page_count(self.units.len()));

        for (page_index, page_units) in self.units.chunks(per_page).enumerate() {
            let mut canvas = writer.new_page(layout.page_width_pt, layout.page_height_pt);
            let mut slots = vec![SlotState::Vacant; per_page];

            for (ordinal, unit) in page_units.iter().enumerate() {
                let index = page_index * per_page + ordinal;
                let bytes = images.get(index).and_then(|b| b.as_deref());
                let handle = match bytes {
                    Some(bytes) => cache.resolve(&mut writer, bytes, unit),
                    None => {
                        debug!(index, image_ref = %unit.image_ref, "no image bytes, cell left blank");
                        None
                    }
                };

                let Some(handle) = handle else {
                    slots[ordinal] = SlotState::Missing;
                    continue;
                };

                let cell = layout.cell(layout.slot(ordinal));
                canvas.draw_image(&handle, cell);
                if let Some((mark, opacity)) = &watermark {
                    let rect = decorate::watermark_rect(cell, mark.aspect_ratio());
                    canvas.draw_image_with_opacity(mark, rect, opacity);
                }
                slots[ordinal] = SlotState::Drawn;
            }

            if let Some(corners) = &corners {
                for (ordinal, _) in slots.iter().enumerate().filter(|(_, s)| **s == SlotState::Drawn) {
                    let cell = layout.cell(layout.slot(ordinal));
                    for (corner, handle) in corners {
                        canvas.draw_image(handle, decorate::corner_marker_rect(cell, *corner));
                    }
                }
            }

            if self.config.crop_marks {
                // Every assigned slot, failed units included; the vacant tail
                // of a short last page gets none.
                let marks: Vec<Segment> = (0..page_units.len())
                    .flat_map(|ordinal| decorate::crop_mark_segments(layout, layout.slot(ordinal)))
                    .collect();
                canvas.stroke_segments(&marks, guide);
            }

            if self.config.cut_lines {
                canvas.stroke_segments(&cut_lines, guide);
            }

            writer.add_page(canvas)?;
            let sheet = SheetReport { page_index, slots };
            debug!(page_index, drawn = sheet.drawn(), occupied = sheet.occupied(), "page composed");
            sheets.push(sheet);
        }

        let mut manifest_pages = 0;
        if let Some(pages) = self.manifest() {
            manifest::render_manifest(
                &mut writer,
                &pages,
                layout.page_width_pt,
                layout.page_height_pt,
                TextEncoding::default(),
            )?;
            manifest_pages = pages.len();
        }

        let pdf = writer.finish(DOCUMENT_TITLE)?;
        let missing: usize = sheets.iter().map(|s| s.occupied() - s.drawn()).sum();
        info!(
            pages = sheets.len() + manifest_pages,
            missing,
            bytes = pdf.len(),
            "document composed"
        );

        Ok(Composition {
            pdf,
            sheets,
            manifest_pages,
        })
    }
}

/// Decoded-and-embedded images keyed by content digest, so a card printed
/// many times is stored in the document once.
#[derive(Default)]
struct ImageCache {
    entries: HashMap<[u8; 32], Option<ImageHandle>>,
}

impl ImageCache {
    fn resolve(&mut self, writer: &mut PdfWriter, bytes: &[u8], unit: &PrintUnit) -> Option<ImageHandle> {
        let digest: [u8; 32] = Sha256::digest(bytes).into();
        if let Some(entry) = self.entries.get(&digest) {
            return entry.clone();
        }

        let entry = match decode_raster(bytes) {
            Ok(image) => Some(writer.embed_image(&image)),
            Err(err) => {
                warn!(
                    image_ref = %unit.image_ref,
                    digest = %hex::encode(&digest[..8]),
                    error = %err,
                    "card image undecodable, cell left blank"
                );
                None
            }
        };
        self.entries.insert(digest, entry.clone());
        entry
    }
}
