// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Checklist pages: one text line per card, continued onto further pages when
// the cursor reaches the bottom margin.

use cardsheet_core::CardRecord;
use cardsheet_core::error::Result;
use tracing::debug;

use crate::pdf::{PageCanvas, PdfWriter};

pub const TITLE: &str = "Checklist";
pub const CONTINUED_TITLE: &str = "Checklist (cont.)";

pub const TITLE_SIZE_PT: f64 = 18.0;
pub const BODY_SIZE_PT: f64 = 14.0;
pub const MARGIN_PT: f64 = 40.0;
pub const LINE_HEIGHT_PT: f64 = 18.0;

/// Vertical gap between a title baseline and the first entry.
const TITLE_GAP_PT: f64 = 2.0 * LINE_HEIGHT_PT;

/// Character repertoire of the manifest font.
///
/// Text is never rejected: characters the encoding cannot represent are
/// substituted with `?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// One byte per character, U+0000..=U+00FF. The C1 control block is
    /// excluded since the built-in font maps those codes to other glyphs.
    #[default]
    Latin1,
}

impl TextEncoding {
    pub const SUBSTITUTE: char = '?';

    pub fn supports(&self, c: char) -> bool {
        match self {
            Self::Latin1 => {
                let code = u32::from(c);
                code <= 0xFF && !(0x80..=0x9F).contains(&code)
            }
        }
    }

    /// Replace every unsupported character with [`Self::SUBSTITUTE`].
    pub fn sanitize(&self, text: &str) -> String {
        text.chars()
            .map(|c| if self.supports(c) { c } else { Self::SUBSTITUTE })
            .collect()
    }

    /// Sanitize and encode into font bytes.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Self::Latin1 => self
                .sanitize(text)
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                .collect(),
        }
    }
}

/// `"<quantity> <name> (<set>) <collector number>"`.
pub fn manifest_line(card: &CardRecord) -> String {
    format!(
        "{} {} ({}) {}",
        card.quantity,
        card.name,
        card.effective_set_code(),
        card.effective_collector_number()
    )
}

/// A positioned line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestLine {
    pub y: f64,
    pub text: String,
}

/// One checklist page, before rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestPage {
    pub title: &'static str,
    pub title_y: f64,
    pub lines: Vec<ManifestLine>,
}

/// Lay out checklist lines on pages of `page_height_pt`.
///
/// No cards still gives a single titled page.
pub fn plan_manifest(cards: &[&CardRecord], page_height_pt: f64) -> Vec<ManifestPage> {
    let top = page_height_pt - MARGIN_PT;
    let mut pages = vec![ManifestPage {
        title: TITLE,
        title_y: top,
        lines: Vec::new(),
    }];
    let mut y = top - TITLE_GAP_PT;

    for card in cards {
        if y < MARGIN_PT {
            pages.push(ManifestPage {
                title: CONTINUED_TITLE,
                title_y: top,
                lines: Vec::new(),
            });
            y = top - TITLE_GAP_PT;
        }
        if let Some(page) = pages.last_mut() {
            page.lines.push(ManifestLine {
                y,
                text: manifest_line(card),
            });
        }
        y -= LINE_HEIGHT_PT;
    }

    debug!(cards = cards.len(), pages = pages.len(), "manifest planned");
    pages
}

/// Append the planned pages to `writer`.
pub fn render_manifest(
    writer: &mut PdfWriter,
    pages: &[ManifestPage],
    page_width_pt: f64,
    page_height_pt: f64,
    encoding: TextEncoding,
) -> Result<()> {
    for page in pages {
        let mut canvas: PageCanvas = writer.new_page(page_width_pt, page_height_pt);
        canvas.text(MARGIN_PT, page.title_y, TITLE_SIZE_PT, encoding.encode(page.title));
        for line in &page.lines {
            canvas.text(MARGIN_PT, line.y, BODY_SIZE_PT, encoding.encode(&line.text));
        }
        writer.add_page(canvas)?;
    }
    Ok(())
}
