// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster decoding for embedding: PNG first, JPEG as the fallback, into a
// form the PDF writer can place directly.

use std::io::Cursor;

use cardsheet_core::error::{CardsheetError, Result};
use image::{DynamicImage, ImageFormat};
use tracing::{debug, instrument};
use zune_jpeg::JpegDecoder;

/// Sample layout of an embedded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorModel {
    Gray,
    Rgb,
}

impl ColorModel {
    /// PDF colour space name.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Gray => "DeviceGray",
            Self::Rgb => "DeviceRGB",
        }
    }
}

/// Image data ready for a PDF image XObject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePayload {
    /// Original JPEG bytes, embedded unchanged with DCTDecode.
    Jpeg { data: Vec<u8>, color: ColorModel },
    /// Uncompressed 8-bit samples plus an optional 8-bit alpha plane.
    Samples {
        color: ColorModel,
        samples: Vec<u8>,
        alpha: Option<Vec<u8>>,
    },
}

/// A decoded raster and its pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub payload: ImagePayload,
}

impl DecodedImage {
    /// Height over width, used to scale an image to a target width.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.height) / f64::from(self.width.max(1))
    }

    pub fn has_alpha(&self) -> bool {
        matches!(
            self.payload,
            ImagePayload::Samples {
                alpha: Some(_),
                ..
            }
        )
    }
}

/// Decode card or asset bytes: try PNG, then JPEG.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn decode_raster(data: &[u8]) -> Result<DecodedImage> {
    match image::load_from_memory_with_format(data, ImageFormat::Png) {
        Ok(img) => {
            debug!(width = img.width(), height = img.height(), "decoded as PNG");
            Ok(from_dynamic(&img))
        }
        Err(png_err) => {
            let img = image::load_from_memory_with_format(data, ImageFormat::Jpeg).map_err(
                |jpeg_err| {
                    CardsheetError::ImageDecode(format!(
                        "not a PNG ({png_err}) nor a JPEG ({jpeg_err})"
                    ))
                },
            )?;
            debug!(width = img.width(), height = img.height(), "decoded as JPEG");
            Ok(from_jpeg(data, &img))
        }
    }
}

/// JPEGs with one or three components go in untouched; anything else (CMYK,
/// YCCK) is re-sampled to RGB.
fn from_jpeg(data: &[u8], img: &DynamicImage) -> DecodedImage {
    let color = match jpeg_components(data) {
        Some(1) => Some(ColorModel::Gray),
        Some(3) => Some(ColorModel::Rgb),
        _ => None,
    };

    match color {
        Some(color) => DecodedImage {
            width: img.width(),
            height: img.height(),
            payload: ImagePayload::Jpeg {
                data: data.to_vec(),
                color,
            },
        },
        None => from_dynamic(img),
    }
}

/// Flatten any decoded image into gray or RGB samples, splitting off alpha
/// only when some pixel is actually translucent.
pub fn from_dynamic(img: &DynamicImage) -> DecodedImage {
    let (width, height) = (img.width(), img.height());
    let gray = !img.color().has_color();

    if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        let alpha: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
        let translucent = alpha.iter().any(|&a| a != u8::MAX);

        let (color, samples) = if gray {
            let samples = rgba.pixels().map(|p| p.0[0]).collect();
            (ColorModel::Gray, samples)
        } else {
            let samples = rgba.pixels().flat_map(|p| [p.0[0], p.0[1], p.0[2]]).collect();
            (ColorModel::Rgb, samples)
        };

        return DecodedImage {
            width,
            height,
            payload: ImagePayload::Samples {
                color,
                samples,
                alpha: translucent.then_some(alpha),
            },
        };
    }

    let (color, samples) = if gray {
        (ColorModel::Gray, img.to_luma8().into_raw())
    } else {
        (ColorModel::Rgb, img.to_rgb8().into_raw())
    };

    DecodedImage {
        width,
        height,
        payload: ImagePayload::Samples {
            color,
            samples,
            alpha: None,
        },
    }
}

/// Colour component count declared in the JPEG frame header, if it parses.
fn jpeg_components(data: &[u8]) -> Option<usize> {
    let mut decoder = JpegDecoder::new(data);
    decoder.decode_headers().ok()?;
    decoder.get_input_colorspace().map(|space| space.num_components())
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
pub fn encode_to_format(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, format)
        .map_err(|err| CardsheetError::ImageDecode(format!("image encoding failed: {err}")))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};

    use super::*;

    fn png(img: DynamicImage) -> Vec<u8> {
        encode_to_format(&img, ImageFormat::Png).unwrap()
    }

    fn jpeg(img: DynamicImage) -> Vec<u8> {
        encode_to_format(&img, ImageFormat::Jpeg).unwrap()
    }

    #[test]
    fn opaque_png_has_no_alpha_plane() {
        let bytes = png(DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 6, Rgb([10, 20, 30]))));
        let decoded = decode_raster(&bytes).unwrap();
        assert_eq!((decoded.width, decoded.height), (4, 6));
        match decoded.payload {
            ImagePayload::Samples {
                color,
                samples,
                alpha,
            } => {
                assert_eq!(color, ColorModel::Rgb);
                assert_eq!(samples.len(), 4 * 6 * 3);
                assert_eq!(&samples[..3], &[10, 20, 30]);
                assert!(alpha.is_none());
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn fully_opaque_rgba_drops_alpha() {
        let bytes = png(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            2,
            2,
            Rgba([1, 2, 3, 255]),
        )));
        assert!(!decode_raster(&bytes).unwrap().has_alpha());
    }

    #[test]
    fn translucent_png_keeps_alpha() {
        let mut img = RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 255]));
        img.put_pixel(2, 0, Rgba([0, 0, 0, 0]));
        let decoded = decode_raster(&png(DynamicImage::ImageRgba8(img))).unwrap();
        match decoded.payload {
            ImagePayload::Samples {
                alpha: Some(alpha),
                ..
            } => {
                assert_eq!(alpha.len(), 9);
                assert_eq!(alpha[2], 0);
                assert_eq!(alpha[0], 255);
            }
            other => panic!("expected alpha, got {other:?}"),
        }
    }

    #[test]
    fn rgb_jpeg_passes_through() {
        let bytes = jpeg(DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([200, 0, 0]))));
        let decoded = decode_raster(&bytes).unwrap();
        assert_eq!((decoded.width, decoded.height), (8, 8));
        assert_eq!(
            decoded.payload,
            ImagePayload::Jpeg {
                data: bytes,
                color: ColorModel::Rgb
            }
        );
    }

    #[test]
    fn gray_jpeg_passes_through_as_gray() {
        let bytes = jpeg(DynamicImage::ImageLuma8(GrayImage::from_pixel(5, 5, Luma([99]))));
        match decode_raster(&bytes).unwrap().payload {
            ImagePayload::Jpeg { color, .. } => assert_eq!(color, ColorModel::Gray),
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn garbage_fails_both_decoders() {
        let err = decode_raster(b"<html>404 not found</html>").unwrap_err();
        assert!(matches!(err, CardsheetError::ImageDecode(_)));
        assert!(decode_raster(&[]).is_err());
    }

    #[test]
    fn jpeg_header_scan_ignores_non_jpeg() {
        assert_eq!(jpeg_components(b"\x89PNG\r\n"), None);
        assert_eq!(jpeg_components(&[0xFF, 0xD8]), None);
    }

    #[test]
    fn jpeg_header_reports_component_count() {
        let rgb = jpeg(DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]))));
        let gray = jpeg(DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([7]))));
        assert_eq!(jpeg_components(&rgb), Some(3));
        assert_eq!(jpeg_components(&gray), Some(1));
    }

    #[test]
    fn aspect_ratio_is_height_over_width() {
        let decoded = from_dynamic(&DynamicImage::ImageRgb8(RgbImage::new(200, 50)));
        assert!((decoded.aspect_ratio() - 0.25).abs() < 1e-12);
    }
}
