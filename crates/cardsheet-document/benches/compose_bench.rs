// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the cardsheet-document crate: layout computation
// and composing a full 60-card deck with every decoration switched on.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use cardsheet_core::{CardRecord, PaperPreset, PrintConfig, ScalePercent};
use cardsheet_document::image::decode::encode_to_format;
use cardsheet_document::{DocumentPlan, GeneratedAssets, Layout};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Layout for every paper preset at three scales.
fn bench_layout(c: &mut Criterion) {
    c.bench_function("layout (all presets x 3 scales)", |b| {
        b.iter(|| {
            for preset in PaperPreset::ALL {
                for scale in [90, 100, 110] {
                    let layout = Layout::compute(&preset.spec(), ScalePercent(scale));
                    let _ = black_box(layout);
                }
            }
        });
    });
}

/// A 60-card deck of 15 distinct 244x340 PNGs, four copies each, on Letter.
///
/// The dedup cache means only 15 images are decoded and embedded per run,
/// which matches real decklists.
fn bench_compose_deck(c: &mut Criterion) {
    let cards: Vec<CardRecord> = (0..15)
        .map(|i| CardRecord::new(format!("Card {i}"), 4, format!("{i}.png")))
        .collect();
    let config = PrintConfig {
        crop_marks: true,
        cut_lines: true,
        black_corners: true,
        print_manifest: true,
        ..PrintConfig::default()
    };
    let plan = match DocumentPlan::new(&cards, &config) {
        Ok(plan) => plan,
        Err(err) => panic!("bench plan failed: {err}"),
    };

    let faces: Vec<Vec<u8>> = (0..15u8)
        .map(|i| {
            let img = RgbImage::from_pixel(244, 340, Rgb([i * 16, 40, 200 - i * 8]));
            encode_to_format(&DynamicImage::ImageRgb8(img), ImageFormat::Png).unwrap_or_default()
        })
        .collect();
    let images: Vec<Option<Vec<u8>>> = plan
        .units()
        .iter()
        .map(|u| Some(faces[u.source_card_index].clone()))
        .collect();
    let assets = GeneratedAssets::default();

    c.bench_function("compose (60 cards, all decorations)", |b| {
        b.iter(|| {
            let out = plan.render(black_box(&images), &assets);
            black_box(out.map(|c| c.pdf.len()).unwrap_or(0));
        });
    });
}

criterion_group!(benches, bench_layout, bench_compose_deck);
criterion_main!(benches);
