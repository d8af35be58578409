// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types: paper, scale, card records, and print units.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Points per inch, the single linear unit used for all page geometry.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Centimetres per inch.
pub const CM_PER_INCH: f64 = 2.54;

/// Linear unit a paper size is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthUnit {
    #[serde(rename = "in", alias = "inch")]
    Inch,
    #[serde(rename = "cm", alias = "centimeter")]
    Centimeter,
}

impl LengthUnit {
    /// Convert a length in this unit to PDF points.
    pub fn to_points(self, value: f64) -> f64 {
        match self {
            Self::Inch => value * POINTS_PER_INCH,
            Self::Centimeter => value / CM_PER_INCH * POINTS_PER_INCH,
        }
    }
}

/// Physical paper size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaperSpec {
    pub width: f64,
    pub height: f64,
    pub unit: LengthUnit,
}

impl PaperSpec {
    pub const fn new(width: f64, height: f64, unit: LengthUnit) -> Self {
        Self {
            width,
            height,
            unit,
        }
    }

    /// US Letter, 8.5 x 11 in.
    pub const fn letter() -> Self {
        Self::new(8.5, 11.0, LengthUnit::Inch)
    }

    /// ISO A4, 21.0 x 29.7 cm.
    pub const fn a4() -> Self {
        Self::new(21.0, 29.7, LengthUnit::Centimeter)
    }

    /// Both dimensions finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Page size in points (width, height).
    pub fn dimensions_pt(&self) -> (f64, f64) {
        (
            self.unit.to_points(self.width),
            self.unit.to_points(self.height),
        )
    }
}

impl Default for PaperSpec {
    fn default() -> Self {
        Self::letter()
    }
}

/// Named paper presets offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaperPreset {
    A4,
    A3,
    Letter,
    Legal,
    ArchA,
    ArchB,
    SuperB,
    Tabloid,
    #[serde(rename = "4r")]
    FourR,
}

impl PaperPreset {
    pub const ALL: [PaperPreset; 9] = [
        Self::A4,
        Self::A3,
        Self::Letter,
        Self::Legal,
        Self::ArchA,
        Self::ArchB,
        Self::SuperB,
        Self::Tabloid,
        Self::FourR,
    ];

    /// Lookup key, as accepted by [`FromStr`].
    pub fn key(&self) -> &'static str {
        match self {
            Self::A4 => "a4",
            Self::A3 => "a3",
            Self::Letter => "letter",
            Self::Legal => "legal",
            Self::ArchA => "archA",
            Self::ArchB => "archB",
            Self::SuperB => "superB",
            Self::Tabloid => "tabloid",
            Self::FourR => "4r",
        }
    }

    pub fn spec(&self) -> PaperSpec {
        use LengthUnit::{Centimeter, Inch};
        match self {
            Self::A4 => PaperSpec::new(21.0, 29.7, Centimeter),
            Self::A3 => PaperSpec::new(42.0, 29.7, Centimeter),
            Self::Letter => PaperSpec::new(8.5, 11.0, Inch),
            Self::Legal => PaperSpec::new(14.0, 8.5, Inch),
            Self::ArchA => PaperSpec::new(9.0, 12.0, Inch),
            Self::ArchB => PaperSpec::new(18.0, 12.0, Inch),
            Self::SuperB => PaperSpec::new(13.0, 19.0, Inch),
            Self::Tabloid => PaperSpec::new(11.0, 17.0, Inch),
            Self::FourR => PaperSpec::new(10.2, 15.2, Centimeter),
        }
    }
}

impl FromStr for PaperPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|p| p.key()).collect();
                format!("unknown paper size '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

impl fmt::Display for PaperPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Card enlargement/reduction in percent of the nominal 2.5 x 3.5 in size.
///
/// Any whole number is accepted on input, including `100.0`;
/// [`ScalePercent::clamped`] applies the 90..=110 limit at the point of use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ScalePercent(pub i32);

impl<'de> Deserialize<'de> for ScalePercent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Float(f64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(v) => i32::try_from(v)
                .map(Self)
                .map_err(|_| D::Error::custom(format!("scale {v} is out of range"))),
            Raw::Float(v) if v.fract() == 0.0 && v.abs() <= f64::from(i32::MAX) => Ok(Self(v as i32)),
            Raw::Float(v) => Err(D::Error::custom(format!("scale must be a whole number, got {v}"))),
        }
    }
}

impl ScalePercent {
    pub const MIN: i32 = 90;
    pub const MAX: i32 = 110;

    pub fn clamped(self) -> i32 {
        self.0.clamp(Self::MIN, Self::MAX)
    }

    /// Multiplier applied to the nominal card size.
    pub fn factor(self) -> f64 {
        f64::from(self.clamped()) / 100.0
    }
}

impl Default for ScalePercent {
    fn default() -> Self {
        Self(100)
    }
}

/// One known printing of a card, used as a metadata fallback for the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Printing {
    #[serde(default, alias = "set_name", alias = "set")]
    pub set_code: Option<String>,
    #[serde(default, alias = "collector_number")]
    pub collector_number: Option<String>,
}

/// A card as handed over by the decklist/catalog collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(rename = "imageUrl", alias = "primaryImageRef")]
    pub primary_image_ref: String,
    #[serde(default)]
    pub is_double_faced: bool,
    #[serde(default, rename = "backImageUrl", alias = "backImageRef")]
    pub back_image_ref: Option<String>,
    #[serde(default)]
    pub set_code: Option<String>,
    #[serde(default)]
    pub collector_number: Option<String>,
    #[serde(default)]
    pub printings: Vec<Printing>,
}

fn default_quantity() -> u32 {
    1
}

impl CardRecord {
    pub fn new(name: impl Into<String>, quantity: u32, image_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity,
            primary_image_ref: image_ref.into(),
            is_double_faced: false,
            back_image_ref: None,
            set_code: None,
            collector_number: None,
            printings: Vec::new(),
        }
    }

    /// Builder-style helper marking the card double-faced with the given back.
    pub fn with_back(mut self, back_image_ref: impl Into<String>) -> Self {
        self.is_double_faced = true;
        self.back_image_ref = Some(back_image_ref.into());
        self
    }

    pub fn with_printing(
        mut self,
        set_code: impl Into<String>,
        collector_number: impl Into<String>,
    ) -> Self {
        self.set_code = Some(set_code.into());
        self.collector_number = Some(collector_number.into());
        self
    }

    /// Number of copies to print. A zero quantity counts as one copy.
    pub fn copies(&self) -> u32 {
        self.quantity.max(1)
    }

    /// Back face reference, only when the card is flagged double-faced.
    pub fn back_face(&self) -> Option<&str> {
        if self.is_double_faced {
            self.back_image_ref.as_deref().filter(|r| !r.is_empty())
        } else {
            None
        }
    }

    /// Set code, falling back to the first known printing.
    pub fn effective_set_code(&self) -> &str {
        non_empty(self.set_code.as_deref())
            .or_else(|| self.printings.first().and_then(|p| non_empty(p.set_code.as_deref())))
            .unwrap_or("")
    }

    /// Collector number, falling back to the first known printing.
    pub fn effective_collector_number(&self) -> &str {
        non_empty(self.collector_number.as_deref())
            .or_else(|| {
                self.printings
                    .first()
                    .and_then(|p| non_empty(p.collector_number.as_deref()))
            })
            .unwrap_or("")
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// One drawable card face after quantity/face expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintUnit {
    pub image_ref: String,
    pub is_back_face: bool,
    /// Index into the card list the unit was expanded from.
    pub source_card_index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centimeters_convert_through_inches() {
        let (w, h) = PaperSpec::a4().dimensions_pt();
        assert!((w - 21.0 / 2.54 * 72.0).abs() < 1e-9);
        assert!((h - 29.7 / 2.54 * 72.0).abs() < 1e-9);
    }

    #[test]
    fn letter_is_612_by_792() {
        assert_eq!(PaperSpec::letter().dimensions_pt(), (612.0, 792.0));
    }

    #[test]
    fn scale_is_clamped() {
        assert_eq!(ScalePercent(50).clamped(), 90);
        assert_eq!(ScalePercent(200).clamped(), 110);
        assert_eq!(ScalePercent(95).clamped(), 95);
        assert!((ScalePercent(105).factor() - 1.05).abs() < 1e-12);
    }

    #[test]
    fn scale_accepts_whole_floats_but_not_fractions() {
        assert_eq!(serde_json::from_str::<ScalePercent>("100.0").unwrap(), ScalePercent(100));
        assert_eq!(serde_json::from_str::<ScalePercent>("95").unwrap(), ScalePercent(95));
        assert_eq!(serde_json::from_str::<ScalePercent>("-5").unwrap(), ScalePercent(-5));
        assert!(serde_json::from_str::<ScalePercent>("95.5").is_err());
        assert!(serde_json::from_str::<ScalePercent>("\"100\"").is_err());
        assert_eq!(serde_json::to_string(&ScalePercent(105)).unwrap(), "105");
    }

    #[test]
    fn paper_presets_parse_case_insensitively() {
        assert_eq!("archB".parse::<PaperPreset>(), Ok(PaperPreset::ArchB));
        assert_eq!("LETTER".parse::<PaperPreset>(), Ok(PaperPreset::Letter));
        assert_eq!("4r".parse::<PaperPreset>(), Ok(PaperPreset::FourR));
        assert!("b5".parse::<PaperPreset>().is_err());
    }

    #[test]
    fn invalid_paper_detected() {
        assert!(!PaperSpec::new(0.0, 11.0, LengthUnit::Inch).is_valid());
        assert!(!PaperSpec::new(8.5, f64::NAN, LengthUnit::Inch).is_valid());
        assert!(PaperSpec::letter().is_valid());
    }

    #[test]
    fn zero_quantity_prints_once() {
        let card = CardRecord::new("Opt", 0, "opt.png");
        assert_eq!(card.copies(), 1);
    }

    #[test]
    fn back_face_requires_flag() {
        let mut card = CardRecord::new("Delver of Secrets", 1, "front.png");
        card.back_image_ref = Some("back.png".into());
        assert_eq!(card.back_face(), None);
        card.is_double_faced = true;
        assert_eq!(card.back_face(), Some("back.png"));
    }

    #[test]
    fn metadata_falls_back_to_first_printing() {
        let mut card = CardRecord::new("Counterspell", 1, "cs.png");
        card.printings = vec![
            Printing {
                set_code: Some("MH2".into()),
                collector_number: Some("267".into()),
            },
            Printing {
                set_code: Some("7ED".into()),
                collector_number: Some("67".into()),
            },
        ];
        assert_eq!(card.effective_set_code(), "MH2");
        assert_eq!(card.effective_collector_number(), "267");

        let card = card.with_printing("2XM", "50");
        assert_eq!(card.effective_set_code(), "2XM");
        assert_eq!(card.effective_collector_number(), "50");
    }

    #[test]
    fn card_record_reads_request_json() {
        let json = r#"{
            "name": "Brazen Borrower // Petty Theft",
            "quantity": 2,
            "imageUrl": "https://example.test/front.png",
            "backImageUrl": "https://example.test/back.png",
            "isDoubleFaced": true,
            "printings": [{ "set_name": "Throne of Eldraine", "collector_number": "39" }]
        }"#;
        let card: CardRecord = serde_json::from_str(json).unwrap();
        assert_eq!(card.quantity, 2);
        assert_eq!(card.back_face(), Some("https://example.test/back.png"));
        assert_eq!(card.effective_set_code(), "Throne of Eldraine");
        assert_eq!(card.effective_collector_number(), "39");
    }
}
