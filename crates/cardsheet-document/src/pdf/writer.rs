// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — builds documents directly on `lopdf`'s object model.
//
// Object ids are handed out sequentially and resource names are derived from
// insertion order, and no timestamps or random document ids are written, so
// identical input always serialises to identical bytes.

use std::collections::BTreeMap;

use cardsheet_core::error::{CardsheetError, Result};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use tracing::{debug, info, instrument};

use crate::geometry::{Point, Rect};
use crate::image::{DecodedImage, ImagePayload};

/// Resource name of the single built-in text font.
const FONT_RESOURCE: &str = "F1";

/// An image XObject embedded in the document, placeable on any page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    name: String,
    id: ObjectId,
    pub width_px: u32,
    pub height_px: u32,
}

impl ImageHandle {
    /// Height over width, in pixels.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.height_px) / f64::from(self.width_px.max(1))
    }
}

/// A constant-opacity graphics state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpacityHandle {
    name: String,
    id: ObjectId,
}

/// Line appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Gray level per channel, 0.0 (black) to 1.0 (white).
    pub rgb: (f32, f32, f32),
    pub thickness_pt: f64,
}

/// Drawing surface for one page. Obtained from [`PdfWriter::new_page`] and
/// handed back through [`PdfWriter::add_page`].
#[derive(Debug)]
pub struct PageCanvas {
    width_pt: f64,
    height_pt: f64,
    operations: Vec<Operation>,
    xobjects: BTreeMap<String, ObjectId>,
    graphics_states: BTreeMap<String, ObjectId>,
    uses_font: bool,
}

impl PageCanvas {
    /// Stretch an image over `rect`.
    pub fn draw_image(&mut self, image: &ImageHandle, rect: Rect) {
        self.operations.push(Operation::new("q", vec![]));
        self.push_image(image, rect);
        self.operations.push(Operation::new("Q", vec![]));
    }

    /// Stretch an image over `rect` under a constant opacity.
    pub fn draw_image_with_opacity(&mut self, image: &ImageHandle, rect: Rect, opacity: &OpacityHandle) {
        self.graphics_states.insert(opacity.name.clone(), opacity.id);
        self.operations.push(Operation::new("q", vec![]));
        self.operations.push(Operation::new(
            "gs",
            vec![Object::Name(opacity.name.as_bytes().to_vec())],
        ));
        self.push_image(image, rect);
        self.operations.push(Operation::new("Q", vec![]));
    }

    fn push_image(&mut self, image: &ImageHandle, rect: Rect) {
        self.xobjects.insert(image.name.clone(), image.id);
        self.operations.push(Operation::new(
            "cm",
            vec![
                real(rect.width),
                real(0.0),
                real(0.0),
                real(rect.height),
                real(rect.x),
                real(rect.y),
            ],
        ));
        self.operations.push(Operation::new(
            "Do",
            vec![Object::Name(image.name.as_bytes().to_vec())],
        ));
    }

    /// Stroke straight segments sharing one style.
    pub fn stroke_segments(&mut self, segments: &[(Point, Point)], style: StrokeStyle) {
        if segments.is_empty() {
            return;
        }
        let (r, g, b) = style.rgb;
        self.operations.push(Operation::new("q", vec![]));
        self.operations.push(Operation::new(
            "RG",
            vec![Object::Real(r), Object::Real(g), Object::Real(b)],
        ));
        self.operations
            .push(Operation::new("w", vec![real(style.thickness_pt)]));
        for (from, to) in segments {
            self.operations
                .push(Operation::new("m", vec![real(from.x), real(from.y)]));
            self.operations
                .push(Operation::new("l", vec![real(to.x), real(to.y)]));
        }
        self.operations.push(Operation::new("S", vec![]));
        self.operations.push(Operation::new("Q", vec![]));
    }

    /// Write one line of black text with its baseline at (`x`, `y`).
    ///
    /// `encoded` must already be in the font's single-byte encoding.
    pub fn text(&mut self, x: f64, y: f64, size_pt: f64, encoded: Vec<u8>) {
        self.uses_font = true;
        self.operations.push(Operation::new("BT", vec![]));
        self.operations.push(Operation::new(
            "rg",
            vec![Object::Real(0.0), Object::Real(0.0), Object::Real(0.0)],
        ));
        self.operations.push(Operation::new(
            "Tf",
            vec![Object::Name(FONT_RESOURCE.as_bytes().to_vec()), real(size_pt)],
        ));
        self.operations
            .push(Operation::new("Td", vec![real(x), real(y)]));
        self.operations.push(Operation::new(
            "Tj",
            vec![Object::String(encoded, StringFormat::Hexadecimal)],
        ));
        self.operations.push(Operation::new("ET", vec![]));
    }
}

/// Assembles a PDF page by page.
pub struct PdfWriter {
    document: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    font_id: Option<ObjectId>,
    image_count: usize,
    opacity_states: Vec<(u32, OpacityHandle)>,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        Self {
            document,
            pages_id,
            page_ids: Vec::new(),
            font_id: None,
            image_count: 0,
            opacity_states: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Embed a decoded raster once; the handle can be drawn any number of
    /// times on any page.
    pub fn embed_image(&mut self, image: &DecodedImage) -> ImageHandle {
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(image.width),
            "Height" => i64::from(image.height),
            "BitsPerComponent" => 8,
        };

        let stream = match &image.payload {
            ImagePayload::Jpeg { data, color } => {
                dict.set("ColorSpace", Object::Name(color.pdf_name().as_bytes().to_vec()));
                dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
                Stream::new(dict, data.clone())
            }
            ImagePayload::Samples {
                color,
                samples,
                alpha,
            } => {
                dict.set("ColorSpace", Object::Name(color.pdf_name().as_bytes().to_vec()));
                if let Some(alpha) = alpha {
                    let mask_id = self.add_soft_mask(image.width, image.height, alpha);
                    dict.set("SMask", Object::Reference(mask_id));
                }
                compressed(Stream::new(dict, samples.clone()))
            }
        };

        let id = self.document.add_object(stream);
        let handle = ImageHandle {
            name: format!("Im{}", self.image_count),
            id,
            width_px: image.width,
            height_px: image.height,
        };
        self.image_count += 1;
        debug!(name = %handle.name, width = image.width, height = image.height, "image embedded");
        handle
    }

    fn add_soft_mask(&mut self, width: u32, height: u32, alpha: &[u8]) -> ObjectId {
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        };
        self.document
            .add_object(compressed(Stream::new(dict, alpha.to_vec())))
    }

    /// Graphics state applying `opacity` to fills and strokes. Repeated
    /// requests for the same opacity share one object.
    pub fn opacity(&mut self, opacity: f32) -> OpacityHandle {
        let key = (opacity.clamp(0.0, 1.0) * 1000.0).round() as u32;
        if let Some((_, handle)) = self.opacity_states.iter().find(|(k, _)| *k == key) {
            return handle.clone();
        }

        let value = key as f32 / 1000.0;
        let id = self.document.add_object(dictionary! {
            "Type" => "ExtGState",
            "ca" => Object::Real(value),
            "CA" => Object::Real(value),
        });
        let handle = OpacityHandle {
            name: format!("GS{}", self.opacity_states.len()),
            id,
        };
        self.opacity_states.push((key, handle.clone()));
        handle
    }

    /// Start a blank page of the given size.
    pub fn new_page(&self, width_pt: f64, height_pt: f64) -> PageCanvas {
        PageCanvas {
            width_pt,
            height_pt,
            operations: Vec::new(),
            xobjects: BTreeMap::new(),
            graphics_states: BTreeMap::new(),
            uses_font: false,
        }
    }

    /// Append a finished page to the document.
    pub fn add_page(&mut self, canvas: PageCanvas) -> Result<()> {
        let content = Content {
            operations: canvas.operations,
        };
        let encoded = content.encode().map_err(|err| {
            CardsheetError::DocumentAssembly(format!("content stream encoding: {err}"))
        })?;
        let content_id = self
            .document
            .add_object(compressed(Stream::new(dictionary! {}, encoded)));

        let mut resources = Dictionary::new();
        if !canvas.xobjects.is_empty() {
            resources.set("XObject", name_map(canvas.xobjects));
        }
        if !canvas.graphics_states.is_empty() {
            resources.set("ExtGState", name_map(canvas.graphics_states));
        }
        if canvas.uses_font {
            let font_id = self.font();
            resources.set("Font", dictionary! { FONT_RESOURCE => font_id });
        }

        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![real(0.0), real(0.0), real(canvas.width_pt), real(canvas.height_pt)],
            "Contents" => content_id,
            "Resources" => resources,
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    /// Helvetica with WinAnsi encoding, created on first use.
    fn font(&mut self) -> ObjectId {
        if let Some(id) = self.font_id {
            return id;
        }
        let id = self.document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        self.font_id = Some(id);
        id
    }

    /// Close the page tree and serialise the document.
    #[instrument(skip(self), fields(pages = self.page_ids.len()))]
    pub fn finish(mut self, title: &str) -> Result<Vec<u8>> {
        let kids: Vec<Object> = self
            .page_ids
            .iter()
            .map(|id| Object::Reference(*id))
            .collect();
        let count = kids.len() as i64;
        self.document.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        let info_id = self.document.add_object(dictionary! {
            "Title" => Object::string_literal(title),
            "Producer" => Object::string_literal(concat!("cardsheet ", env!("CARGO_PKG_VERSION"))),
        });
        self.document.trailer.set("Root", catalog_id);
        self.document.trailer.set("Info", info_id);

        let mut output = Vec::new();
        self.document.save_to(&mut output).map_err(|err| {
            CardsheetError::DocumentAssembly(format!("failed to serialise PDF: {err}"))
        })?;

        info!(pages = count, bytes = output.len(), "PDF assembled");
        Ok(output)
    }
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

fn name_map(entries: BTreeMap<String, ObjectId>) -> Dictionary {
    let mut dict = Dictionary::new();
    for (name, id) in entries {
        dict.set(name.into_bytes(), Object::Reference(id));
    }
    dict
}

/// Flate-compress a stream; keeps it uncompressed if that fails.
fn compressed(mut stream: Stream) -> Stream {
    let _ = stream.compress();
    stream
}

#[cfg(test)]
mod tests {
    use lopdf::Document;

    use super::*;
    use crate::image::ColorModel;

    fn red_pixel() -> DecodedImage {
        DecodedImage {
            width: 1,
            height: 1,
            payload: ImagePayload::Samples {
                color: ColorModel::Rgb,
                samples: vec![255, 0, 0],
                alpha: None,
            },
        }
    }

    #[test]
    fn empty_document_still_serialises() {
        let bytes = PdfWriter::new().finish("empty").unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 0);
    }

    #[test]
    fn pages_keep_their_size_and_order() {
        let mut writer = PdfWriter::new();
        let a = writer.new_page(612.0, 792.0);
        writer.add_page(a).unwrap();
        let b = writer.new_page(300.0, 400.0);
        writer.add_page(b).unwrap();
        assert_eq!(writer.page_count(), 2);

        let doc = Document::load_mem(&writer.finish("sizes").unwrap()).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 2);

        let second = doc.get_dictionary(pages[&2]).unwrap();
        let media_box = second.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media_box[2].as_float().unwrap(), 300.0);
        assert_eq!(media_box[3].as_float().unwrap(), 400.0);
    }

    #[test]
    fn image_resources_are_registered_per_page() {
        let mut writer = PdfWriter::new();
        let image = writer.embed_image(&red_pixel());
        let mut canvas = writer.new_page(612.0, 792.0);
        canvas.draw_image(&image, Rect::new(10.0, 10.0, 180.0, 252.0));
        canvas.draw_image(&image, Rect::new(190.0, 10.0, 180.0, 252.0));
        writer.add_page(canvas).unwrap();

        let doc = Document::load_mem(&writer.finish("images").unwrap()).unwrap();
        let page_id = doc.get_pages()[&1];
        let content = doc.get_and_decode_page_content(page_id).unwrap();
        let draws = content
            .operations
            .iter()
            .filter(|op| op.operator == "Do")
            .count();
        assert_eq!(draws, 2);

        let page = doc.get_dictionary(page_id).unwrap();
        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
        assert_eq!(xobjects.len(), 1);
    }

    #[test]
    fn translucent_image_gets_soft_mask() {
        let mut writer = PdfWriter::new();
        let image = writer.embed_image(&DecodedImage {
            width: 2,
            height: 1,
            payload: ImagePayload::Samples {
                color: ColorModel::Gray,
                samples: vec![0, 0],
                alpha: Some(vec![255, 0]),
            },
        });
        let doc_bytes = {
            let mut canvas = writer.new_page(100.0, 100.0);
            canvas.draw_image(&image, Rect::new(0.0, 0.0, 8.0, 8.0));
            writer.add_page(canvas).unwrap();
            writer.finish("mask").unwrap()
        };
        let doc = Document::load_mem(&doc_bytes).unwrap();
        let stream = doc.get_object(image.id).unwrap().as_stream().unwrap();
        assert!(stream.dict.get(b"SMask").is_ok());
    }

    #[test]
    fn opacity_states_are_shared() {
        let mut writer = PdfWriter::new();
        let a = writer.opacity(0.5);
        let b = writer.opacity(0.5);
        let c = writer.opacity(0.25);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn output_is_deterministic() {
        let build = || {
            let mut writer = PdfWriter::new();
            let image = writer.embed_image(&red_pixel());
            let half = writer.opacity(0.5);
            let mut canvas = writer.new_page(612.0, 792.0);
            canvas.draw_image_with_opacity(&image, Rect::new(1.0, 2.0, 3.0, 4.0), &half);
            canvas.stroke_segments(
                &[(Point::new(0.0, 0.0), Point::new(10.0, 10.0))],
                StrokeStyle {
                    rgb: (0.7, 0.7, 0.7),
                    thickness_pt: 0.5,
                },
            );
            canvas.text(40.0, 700.0, 14.0, b"1 Opt (ELD) 59".to_vec());
            writer.add_page(canvas).unwrap();
            writer.finish("same").unwrap()
        };
        assert_eq!(build(), build());
    }
}
