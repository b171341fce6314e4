//! printpdf drawing primitives for the claim report.
//!
//! Wraps the document, current layer, fonts, and page cursor in one writer
//! owned by a single composer invocation. Coordinates given to the writer
//! are top-down mm (like the layout math); conversion to PDF bottom-up
//! space happens here.

use super::layout::{self, PageCursor, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::error::{ClaimReportError, Result};
use image::codecs::jpeg::JpegDecoder;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::utils::calculate_points_for_circle;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Polygon, Pt, Rgb,
};
use std::io::Cursor;

pub const GOLD: (u8, u8, u8) = (245, 197, 24);
pub const BLUE: (u8, u8, u8) = (66, 135, 245);
pub const RED: (u8, u8, u8) = (220, 53, 69);
pub const INDIGO: (u8, u8, u8) = (75, 0, 130);
pub const GREEN: (u8, u8, u8) = (34, 139, 34);

/// Embedded photos render at 300 dpi before scaling to the target box.
const IMAGE_DPI: f32 = 300.0;

#[derive(Debug, Clone, Copy)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

/// A photo already converted to an embeddable JPEG, with pixel dimensions
/// kept so it can be scaled into a fixed box.
#[derive(Debug, Clone)]
pub struct PreparedPhoto {
    pub jpeg: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

pub struct ReportWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    pub cursor: PageCursor,
}

fn pdf_err<E: std::fmt::Debug>(e: E) -> ClaimReportError {
    ClaimReportError::PdfGeneration(format!("{:?}", e))
}

fn rgb(color: (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        color.0 as f32 / 255.0,
        color.1 as f32 / 255.0,
        color.2 as f32 / 255.0,
        None,
    ))
}

impl ReportWriter {
    pub fn new(title: &str) -> Result<Self> {
        let (doc, page, layer_idx) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");

        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_err)?;
        let italic = doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(pdf_err)?;

        let layer = doc.get_page(page).get_layer(layer_idx);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            italic,
            cursor: PageCursor::top(),
        })
    }

    fn font(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }

    /// Top-down mm to PDF bottom-up Mm.
    fn pdf_y(&self, y_top: f32) -> Mm {
        Mm(PAGE_HEIGHT_MM - y_top)
    }

    pub fn new_page(&mut self) {
        let (page, layer_idx) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer_idx);
        self.cursor.reset();
    }

    /// Opens a new page if the block would overflow. Returns whether a
    /// break happened.
    pub fn ensure_space(&mut self, required_mm: f32) -> bool {
        if self.cursor.needs_break(required_mm) {
            self.new_page();
            true
        } else {
            false
        }
    }

    pub fn text(&self, text: &str, size_pt: f32, x: f32, y_top: f32, style: FontStyle, color: (u8, u8, u8)) {
        self.layer.set_fill_color(rgb(color));
        self.layer
            .use_text(text, size_pt, Mm(x), self.pdf_y(y_top), self.font(style));
    }

    pub fn text_right(&self, text: &str, size_pt: f32, right_x: f32, y_top: f32, style: FontStyle, color: (u8, u8, u8)) {
        let x = right_x - layout::text_width_mm(text, size_pt);
        self.text(text, size_pt, x, y_top, style, color);
    }

    pub fn text_center(&self, text: &str, size_pt: f32, center_x: f32, y_top: f32, style: FontStyle, color: (u8, u8, u8)) {
        let x = center_x - layout::text_width_mm(text, size_pt) / 2.0;
        self.text(text, size_pt, x, y_top, style, color);
    }

    fn rect_ring(&self, x: f32, y_top: f32, width: f32, height: f32) -> Vec<(Point, bool)> {
        let top = self.pdf_y(y_top);
        let bottom = self.pdf_y(y_top + height);
        vec![
            (Point::new(Mm(x), top), false),
            (Point::new(Mm(x + width), top), false),
            (Point::new(Mm(x + width), bottom), false),
            (Point::new(Mm(x), bottom), false),
        ]
    }

    pub fn fill_rect(&self, x: f32, y_top: f32, width: f32, height: f32, color: (u8, u8, u8)) {
        self.layer.set_fill_color(rgb(color));
        self.layer.add_polygon(Polygon {
            rings: vec![self.rect_ring(x, y_top, width, height)],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    pub fn stroke_rect(&self, x: f32, y_top: f32, width: f32, height: f32, color: (u8, u8, u8), thickness_pt: f32) {
        self.layer.set_outline_color(rgb(color));
        self.layer.set_outline_thickness(thickness_pt);
        self.layer.add_line(Line {
            points: self.rect_ring(x, y_top, width, height),
            is_closed: true,
        });
    }

    pub fn line(&self, x1: f32, y1_top: f32, x2: f32, y2_top: f32, color: (u8, u8, u8), thickness_pt: f32) {
        self.layer.set_outline_color(rgb(color));
        self.layer.set_outline_thickness(thickness_pt);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x1), self.pdf_y(y1_top)), false),
                (Point::new(Mm(x2), self.pdf_y(y2_top)), false),
            ],
            is_closed: false,
        });
    }

    pub fn fill_circle(&self, center_x: f32, center_y_top: f32, radius: f32, color: (u8, u8, u8)) {
        let points = calculate_points_for_circle(
            Pt::from(Mm(radius)),
            Pt::from(Mm(center_x)),
            Pt::from(self.pdf_y(center_y_top)),
        );
        self.layer.set_fill_color(rgb(color));
        self.layer.add_polygon(Polygon {
            rings: vec![points],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    /// Places a prepared JPEG into a fixed box (top-down anchor).
    pub fn image_at(&self, photo: &PreparedPhoto, x: f32, y_top: f32, width_mm: f32, height_mm: f32) -> Result<()> {
        let decoder = JpegDecoder::new(Cursor::new(photo.jpeg.as_slice())).map_err(pdf_err)?;
        let image = Image::try_from(decoder).map_err(pdf_err)?;

        let natural_w_mm = photo.width_px as f32 * 25.4 / IMAGE_DPI;
        let natural_h_mm = photo.height_px as f32 * 25.4 / IMAGE_DPI;

        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(self.pdf_y(y_top + height_mm)),
                scale_x: Some(width_mm / natural_w_mm),
                scale_y: Some(height_mm / natural_h_mm),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
        Ok(())
    }

    pub fn save(self) -> Result<Vec<u8>> {
        self.doc.save_to_bytes().map_err(pdf_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::layout::MARGIN_MM;

    #[test]
    fn test_writer_produces_pdf_bytes() {
        let writer = ReportWriter::new("test").unwrap();
        writer.text("hello", 12.0, 20.0, 20.0, FontStyle::Regular, (0, 0, 0));
        let bytes = writer.save().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_new_page_resets_cursor() {
        let mut writer = ReportWriter::new("test").unwrap();
        writer.cursor.advance(200.0);
        writer.new_page();
        assert_eq!(writer.cursor, PageCursor::top());
    }

    #[test]
    fn test_ensure_space_breaks_only_on_overflow() {
        let mut writer = ReportWriter::new("test").unwrap();
        assert!(!writer.ensure_space(10.0));

        writer.cursor.set(PAGE_HEIGHT_MM - MARGIN_MM - 5.0);
        assert!(writer.ensure_space(10.0));
        assert_eq!(writer.cursor, PageCursor::top());
    }
}
