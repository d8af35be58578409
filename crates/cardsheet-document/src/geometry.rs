// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sheet geometry — page size, card cell size, grid dimensions, and centering
// margins, all in PDF points with the origin at the bottom-left of the page.
//
// Everything here is pure: the same paper and scale always give the same
// layout, down to the last bit.

use cardsheet_core::{LayoutError, PaperSpec, ScalePercent};
use tracing::debug;

/// Nominal card width: 2.5 in.
pub const CARD_WIDTH_PT: f64 = 180.0;

/// Nominal card height: 3.5 in.
pub const CARD_HEIGHT_PT: f64 = 252.0;

/// A position on the page, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle anchored at its bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }
}

/// A grid position on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub row: usize,
    pub col: usize,
}

/// Computed page and grid geometry for one generation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub page_width_pt: f64,
    pub page_height_pt: f64,
    pub card_width_pt: f64,
    pub card_height_pt: f64,
    pub columns: usize,
    pub rows: usize,
    pub margin_x_pt: f64,
    pub margin_y_pt: f64,
}

impl Layout {
    /// Fit as many whole cards as possible on the page and center the block.
    ///
    /// Fails with [`LayoutError::CardExceedsPage`] when not even one column
    /// or row fits.
    pub fn compute(paper: &PaperSpec, scale: ScalePercent) -> Result<Self, LayoutError> {
        if !paper.is_valid() {
            return Err(LayoutError::InvalidPaper {
                width: paper.width,
                height: paper.height,
            });
        }

        let (page_width_pt, page_height_pt) = paper.dimensions_pt();
        let factor = scale.factor();
        let card_width_pt = CARD_WIDTH_PT * factor;
        let card_height_pt = CARD_HEIGHT_PT * factor;

        let columns = (page_width_pt / card_width_pt).floor() as usize;
        let rows = (page_height_pt / card_height_pt).floor() as usize;

        if columns == 0 || rows == 0 {
            return Err(LayoutError::CardExceedsPage {
                page_width_pt,
                page_height_pt,
                card_width_pt,
                card_height_pt,
            });
        }

        let margin_x_pt = (page_width_pt - columns as f64 * card_width_pt) / 2.0;
        let margin_y_pt = (page_height_pt - rows as f64 * card_height_pt) / 2.0;

        debug!(
            page_width_pt,
            page_height_pt,
            card_width_pt,
            card_height_pt,
            columns,
            rows,
            margin_x_pt,
            margin_y_pt,
            "layout computed"
        );

        Ok(Self {
            page_width_pt,
            page_height_pt,
            card_width_pt,
            card_height_pt,
            columns,
            rows,
            margin_x_pt,
            margin_y_pt,
        })
    }

    pub fn cards_per_page(&self) -> usize {
        self.columns * self.rows
    }

    /// Pages needed for `units` print units.
    pub fn page_count(&self, units: usize) -> usize {
        units.div_ceil(self.cards_per_page())
    }

    /// Grid position of the `ordinal`-th unit on a page (row-major).
    pub fn slot(&self, ordinal: usize) -> Slot {
        Slot {
            row: ordinal / self.columns,
            col: ordinal % self.columns,
        }
    }

    /// The cell a slot occupies.
    pub fn cell(&self, slot: Slot) -> Rect {
        let x = self.margin_x_pt + slot.col as f64 * self.card_width_pt;
        let y = self.page_height_pt
            - self.margin_y_pt
            - self.card_height_pt
            - slot.row as f64 * self.card_height_pt;
        Rect::new(x, y, self.card_width_pt, self.card_height_pt)
    }

    pub fn is_last_column(&self, slot: Slot) -> bool {
        slot.col + 1 == self.columns
    }

    pub fn is_last_row(&self, slot: Slot) -> bool {
        slot.row + 1 == self.rows
    }

    /// The whole card block.
    pub fn grid(&self) -> Rect {
        let width = self.columns as f64 * self.card_width_pt;
        let height = self.rows as f64 * self.card_height_pt;
        Rect::new(
            self.margin_x_pt,
            self.page_height_pt - self.margin_y_pt - height,
            width,
            height,
        )
    }
}
