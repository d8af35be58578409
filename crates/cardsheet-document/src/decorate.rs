// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Decoration geometry (crop marks, cut lines, corner markers, watermark
// placement) and loading of the decoration images.
//
// The offsets below are calibrated against physical print output and are
// kept exactly as measured.

use std::collections::BTreeMap;

use cardsheet_core::PrintConfig;
use tracing::warn;

use crate::assets::{AssetProvider, Corner};
use crate::geometry::{Layout, Point, Rect, Slot};
use crate::image::{DecodedImage, decode_raster};

/// Edge length of a corner marker square.
pub const CORNER_MARKER_PT: f64 = 8.0;

/// Length of each crop-mark arm.
pub const CROP_MARK_LENGTH_PT: f64 = 18.0;

pub const GUIDE_THICKNESS_PT: f64 = 0.5;

pub const GUIDE_GRAY: f32 = 0.7;

/// Shift applied to crop marks on the outer right and bottom edges.
pub const CROP_MARK_OFFSET_PT: f64 = 0.5 - 0.75;

/// Extra shift for crop marks on the outer right edge.
pub const RIGHT_CROP_MARK_OFFSET_PT: f64 = 0.375;

/// Gap between the bottom of a cell and the bottom of its watermark.
pub const WATERMARK_INSET_PT: f64 = 4.0;

pub const WATERMARK_OPACITY: f32 = 0.5;

pub type Segment = (Point, Point);

/// The eight crop-mark arms around one cell: two per corner, each pointing
/// away from the card.
pub fn crop_mark_segments(layout: &Layout, slot: Slot) -> [Segment; 8] {
    let cell = layout.cell(slot);
    let (x, y, top) = (cell.x, cell.y, cell.top());
    let l = CROP_MARK_LENGTH_PT;

    let rx = if layout.is_last_column(slot) {
        cell.right() + CROP_MARK_OFFSET_PT + RIGHT_CROP_MARK_OFFSET_PT
    } else {
        cell.right()
    };
    let by = if layout.is_last_row(slot) {
        y - CROP_MARK_OFFSET_PT
    } else {
        y
    };

    let p = Point::new;
    [
        // top-left
        (p(x - l, top), p(x, top)),
        (p(x, top + l), p(x, top)),
        // top-right
        (p(rx, top), p(rx + l, top)),
        (p(rx, top + l), p(rx, top)),
        // bottom-left
        (p(x - l, by), p(x, by)),
        (p(x, by - l), p(x, by)),
        // bottom-right
        (p(rx, by), p(rx + l, by)),
        (p(rx, by - l), p(rx, by)),
    ]
}

/// Full-length lines along every interior grid boundary. Outer edges get none.
pub fn cut_line_segments(layout: &Layout) -> Vec<Segment> {
    let grid = layout.grid();
    let mut segments = Vec::with_capacity(layout.columns + layout.rows);

    for col in 1..layout.columns {
        let x = layout.margin_x_pt + col as f64 * layout.card_width_pt;
        segments.push((Point::new(x, grid.top()), Point::new(x, grid.y)));
    }
    for row in 1..layout.rows {
        let y = layout.page_height_pt - layout.margin_y_pt - row as f64 * layout.card_height_pt;
        segments.push((Point::new(grid.x, y), Point::new(grid.right(), y)));
    }
    segments
}

/// Where each corner marker sits inside `cell`.
pub fn corner_marker_rect(cell: Rect, corner: Corner) -> Rect {
    let s = CORNER_MARKER_PT;
    let (x, y) = match corner {
        Corner::TopLeft => (cell.x, cell.top() - s),
        Corner::TopRight => (cell.right() - s, cell.top() - s),
        Corner::BottomLeft => (cell.x, cell.y),
        Corner::BottomRight => (cell.right() - s, cell.y),
    };
    Rect::new(x, y, s, s)
}

/// The watermark spans the cell width, keeps its aspect ratio, and sits just
/// above the bottom edge.
pub fn watermark_rect(cell: Rect, aspect_ratio: f64) -> Rect {
    Rect::new(
        cell.x,
        cell.y + WATERMARK_INSET_PT,
        cell.width,
        cell.width * aspect_ratio,
    )
}

/// Decoration images decoded for one run. A decoration whose asset cannot be
/// loaded is switched off on its own and the run continues.
#[derive(Debug, Default)]
pub struct Decorations {
    pub corners: Option<BTreeMap<Corner, DecodedImage>>,
    pub watermark: Option<DecodedImage>,
}

impl Decorations {
    pub fn load(config: &PrintConfig, assets: &dyn AssetProvider) -> Self {
        let corners = if config.black_corners {
            load_corners(assets)
        } else {
            None
        };

        let watermark = if config.playtest_watermark {
            match assets.watermark().and_then(|bytes| decode_raster(&bytes)) {
                Ok(image) => Some(image),
                Err(err) => {
                    warn!(error = %err, "watermark unavailable, watermarks disabled");
                    None
                }
            }
        } else {
            None
        };

        Self { corners, watermark }
    }
}

fn load_corners(assets: &dyn AssetProvider) -> Option<BTreeMap<Corner, DecodedImage>> {
    let mut corners = BTreeMap::new();
    for corner in Corner::ALL {
        match assets
            .corner_triangle(corner)
            .and_then(|bytes| decode_raster(&bytes))
        {
            Ok(image) => {
                corners.insert(corner, image);
            }
            Err(err) => {
                warn!(?corner, error = %err, "corner asset unavailable, corner markers disabled");
                return None;
            }
        }
    }
    Some(corners)
}
