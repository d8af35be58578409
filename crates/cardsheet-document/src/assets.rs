// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Decoration assets: the four corner triangles and the playtest watermark.
//
// Assets are raw encoded bytes; decoding happens in the compositor so a bad
// asset disables only the decoration that needs it.

use std::path::PathBuf;

use cardsheet_core::error::{CardsheetError, Result};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;
use tracing::debug;

use crate::image::decode::encode_to_format;

/// File name of the watermark inside an asset directory.
pub const WATERMARK_FILE: &str = "playtest_watermark.png";

/// One of the four corners of a card cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// File name of this corner's triangle inside an asset directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::TopLeft => "triangle_topleft.png",
            Self::TopRight => "triangle_topright.png",
            Self::BottomLeft => "triangle_bottomleft.png",
            Self::BottomRight => "triangle_bottomright.png",
        }
    }
}

/// Supplies encoded decoration images.
pub trait AssetProvider: Send + Sync {
    fn corner_triangle(&self, corner: Corner) -> Result<Vec<u8>>;
    fn watermark(&self) -> Result<Vec<u8>>;
}

/// Reads assets from a directory using the fixed file names.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    dir: PathBuf,
}

impl DirectoryAssets {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.dir.join(name);
        let bytes = std::fs::read(&path).map_err(|err| {
            CardsheetError::AssetLoad(format!("{}: {err}", path.display()))
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "asset loaded");
        Ok(bytes)
    }
}

impl AssetProvider for DirectoryAssets {
    fn corner_triangle(&self, corner: Corner) -> Result<Vec<u8>> {
        self.read(corner.file_name())
    }

    fn watermark(&self) -> Result<Vec<u8>> {
        self.read(WATERMARK_FILE)
    }
}

/// Draws solid black corner triangles in memory. Has no watermark.
#[derive(Debug, Clone, Copy)]
pub struct GeneratedAssets {
    size_px: u32,
}

impl Default for GeneratedAssets {
    fn default() -> Self {
        Self { size_px: 64 }
    }
}

impl GeneratedAssets {
    pub fn new(size_px: u32) -> Self {
        Self {
            size_px: size_px.max(2),
        }
    }

    /// Right triangle filling the half of the square nearest `corner`,
    /// transparent elsewhere.
    pub fn triangle(&self, corner: Corner) -> RgbaImage {
        let s = self.size_px as i32;
        let (near_x, far_x) = match corner {
            Corner::TopLeft | Corner::BottomLeft => (0, s - 1),
            Corner::TopRight | Corner::BottomRight => (s - 1, 0),
        };
        // Raster rows grow downwards.
        let (near_y, far_y) = match corner {
            Corner::TopLeft | Corner::TopRight => (0, s - 1),
            Corner::BottomLeft | Corner::BottomRight => (s - 1, 0),
        };

        let mut img = RgbaImage::from_pixel(self.size_px, self.size_px, Rgba([0, 0, 0, 0]));
        let polygon = [
            Point::new(near_x, near_y),
            Point::new(far_x, near_y),
            Point::new(near_x, far_y),
        ];
        draw_polygon_mut(&mut img, &polygon, Rgba([0, 0, 0, 255]));
        img
    }
}

impl AssetProvider for GeneratedAssets {
    fn corner_triangle(&self, corner: Corner) -> Result<Vec<u8>> {
        encode_to_format(&DynamicImage::ImageRgba8(self.triangle(corner)), ImageFormat::Png)
    }

    fn watermark(&self) -> Result<Vec<u8>> {
        Err(CardsheetError::AssetLoad(
            "no watermark image configured".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::decode_raster;

    #[test]
    fn generated_triangles_fill_their_corner() {
        let assets = GeneratedAssets::new(16);

        let tl = assets.triangle(Corner::TopLeft);
        assert_eq!(tl.get_pixel(0, 0).0[3], 255);
        assert_eq!(tl.get_pixel(15, 15).0[3], 0);

        let br = assets.triangle(Corner::BottomRight);
        assert_eq!(br.get_pixel(15, 15).0[3], 255);
        assert_eq!(br.get_pixel(0, 0).0[3], 0);

        let tr = assets.triangle(Corner::TopRight);
        assert_eq!(tr.get_pixel(15, 0).0[3], 255);
        assert_eq!(tr.get_pixel(0, 15).0[3], 0);

        let bl = assets.triangle(Corner::BottomLeft);
        assert_eq!(bl.get_pixel(0, 15).0[3], 255);
        assert_eq!(bl.get_pixel(15, 0).0[3], 0);
    }

    #[test]
    fn generated_triangles_decode_with_alpha() {
        let assets = GeneratedAssets::default();
        for corner in Corner::ALL {
            let decoded = decode_raster(&assets.corner_triangle(corner).unwrap()).unwrap();
            assert_eq!((decoded.width, decoded.height), (64, 64));
            assert!(decoded.has_alpha(), "{corner:?}");
        }
    }

    #[test]
    fn generated_assets_have_no_watermark() {
        assert!(matches!(
            GeneratedAssets::default().watermark(),
            Err(CardsheetError::AssetLoad(_))
        ));
    }

    #[test]
    fn directory_assets_read_fixed_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("triangle_topright.png"), b"tr").unwrap();
        std::fs::write(dir.path().join(WATERMARK_FILE), b"wm").unwrap();

        let assets = DirectoryAssets::new(dir.path());
        assert_eq!(assets.corner_triangle(Corner::TopRight).unwrap(), b"tr");
        assert_eq!(assets.watermark().unwrap(), b"wm");

        let missing = assets.corner_triangle(Corner::BottomLeft).unwrap_err();
        assert!(matches!(missing, CardsheetError::AssetLoad(ref msg) if msg.contains("triangle_bottomleft.png")));
    }
}
