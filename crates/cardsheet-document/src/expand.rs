// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print-unit expansion: card records with quantities and optional back faces
// become a flat, strictly ordered list of drawable faces.

use cardsheet_core::{CardRecord, PrintUnit};
use tracing::debug;

/// Card names dropped by the skip-basic-lands filter. Matched exactly.
pub const BASIC_LAND_NAMES: [&str; 6] = ["Plains", "Island", "Swamp", "Mountain", "Forest", "Wastes"];

pub fn is_basic_land(name: &str) -> bool {
    BASIC_LAND_NAMES.contains(&name)
}

/// Cards that take part in this run, paired with their index in `cards`.
///
/// The manifest and the expander both read this list, so a filtered basic
/// land is absent from both.
pub fn select_cards(cards: &[CardRecord], skip_basic_lands: bool) -> Vec<(usize, &CardRecord)> {
    cards
        .iter()
        .enumerate()
        .filter(|(_, card)| !(skip_basic_lands && is_basic_land(&card.name)))
        .collect()
}

/// Expand selected cards into print units.
///
/// Order is card order, then copy order, then front before back.
pub fn expand(selected: &[(usize, &CardRecord)]) -> Vec<PrintUnit> {
    let mut units = Vec::new();

    for &(index, card) in selected {
        let back = card.back_face();
        for _ in 0..card.copies() {
            units.push(PrintUnit {
                image_ref: card.primary_image_ref.clone(),
                is_back_face: false,
                source_card_index: index,
            });
            if let Some(back_ref) = back {
                units.push(PrintUnit {
                    image_ref: back_ref.to_string(),
                    is_back_face: true,
                    source_card_index: index,
                });
            }
        }
    }

    debug!(cards = selected.len(), units = units.len(), "cards expanded");
    units
}

/// [`select_cards`] followed by [`expand`].
pub fn expand_cards(cards: &[CardRecord], skip_basic_lands: bool) -> Vec<PrintUnit> {
    expand(&select_cards(cards, skip_basic_lands))
}
