//! PDF rendering of documents via printpdf
//!
//! Output is A4 landscape with the built-in Helvetica faces. Tables get
//! cell grid lines and text is clipped to its cell. Image blocks are
//! embedded as RGB pictures scaled to their maximum width; a picture that
//! cannot be decoded is left out.

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use image::GenericImageView;
use printpdf::{
    BuiltinFont, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, IndirectFontRef,
    Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point, Px,
};
use tracing::{debug, warn};

use crate::error::{MedLogError, MedLogResult};

use super::model::{Block, Document, Table};

const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 10.0;
const LABEL_COLUMN: f32 = 30.0;
const DEFAULT_CELL_SIZE: f32 = 7.0;
const DEFAULT_TEXT_SIZE: f32 = 10.0;
const MM_PER_INCH: f32 = 25.4;

/// Millimetres per point
const PT: f32 = 0.3528;

/// Turns a document into a secondary format
pub trait DocumentConverter {
    fn convert(&self, document: &Document, output: &Path) -> MedLogResult<()>;
}

/// Converter writing PDF files with printpdf
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfConverter;

impl DocumentConverter for PdfConverter {
    fn convert(&self, document: &Document, output: &Path) -> MedLogResult<()> {
        let bytes = render_pdf(document)?;
        fs::write(output, bytes).map_err(|e| {
            MedLogError::Conversion(format!("Cannot write {}: {}", output.display(), e))
        })?;
        debug!(path = %output.display(), "wrote pdf");
        Ok(())
    }
}

/// Render a document to PDF bytes
pub fn render_pdf(document: &Document) -> MedLogResult<Vec<u8>> {
    let title = if document.title.is_empty() {
        "Medication Log"
    } else {
        document.title.as_str()
    };
    let mut writer = PdfWriter::new(title)?;

    for block in &document.blocks {
        match block {
            Block::Heading { text, level } => writer.heading(text, *level),
            Block::Paragraph {
                text,
                font_size,
                italic,
            } => writer.paragraph(text, font_size.unwrap_or(DEFAULT_TEXT_SIZE), *italic),
            Block::Table(table) => writer.table(table),
            Block::PageBreak => writer.page_break(),
            Block::Image { path, max_width_in } => writer.image(path, *max_width_in),
        }
    }

    writer.finish()
}

struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    /// Baseline cursor, measured from the bottom of the page
    y: f32,
    page_has_content: bool,
}

impl PdfWriter {
    fn new(title: &str) -> MedLogResult<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        let font = |face| {
            doc.add_builtin_font(face)
                .map_err(|e| MedLogError::Conversion(format!("PDF font error: {}", e)))
        };
        let regular = font(BuiltinFont::Helvetica)?;
        let bold = font(BuiltinFont::HelveticaBold)?;
        let italic = font(BuiltinFont::HelveticaOblique)?;

        layer.set_outline_thickness(0.3);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            italic,
            y: PAGE_HEIGHT - MARGIN,
            page_has_content: false,
        })
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.layer.set_outline_thickness(0.3);
        self.y = PAGE_HEIGHT - MARGIN;
        self.page_has_content = false;
    }

    fn page_break(&mut self) {
        if self.page_has_content {
            self.new_page();
        }
    }

    fn ensure_space(&mut self, height: f32) {
        if self.y - height < MARGIN && self.page_has_content {
            self.new_page();
        }
    }

    fn heading(&mut self, text: &str, level: u8) {
        let size = (16.0 - 2.0 * f32::from(level.saturating_sub(1))).max(10.0);
        let height = size * PT * 1.6;
        self.ensure_space(height);
        self.y -= size * PT;
        self.layer
            .use_text(text, size, Mm(MARGIN), Mm(self.y), &self.bold);
        self.y -= height - size * PT;
        self.page_has_content = true;
    }

    fn paragraph(&mut self, text: &str, size: f32, italic: bool) {
        let line_height = size * PT * 1.4;
        let width = chars_that_fit(PAGE_WIDTH - 2.0 * MARGIN, size);
        let font = if italic {
            self.italic.clone()
        } else {
            self.regular.clone()
        };

        for line in wrap_text(text, width) {
            self.ensure_space(line_height);
            self.y -= line_height;
            self.layer.use_text(line, size, Mm(MARGIN), Mm(self.y), &font);
            self.page_has_content = true;
        }
    }

    fn table(&mut self, table: &Table) {
        let widths = column_widths(table.column_count());
        let right = MARGIN + widths.iter().sum::<f32>();

        for row in &table.rows {
            let size = row
                .iter()
                .filter_map(|cell| cell.font_size)
                .fold(DEFAULT_CELL_SIZE, f32::max);
            let height = (size * PT * 1.6).max(4.5);
            self.ensure_space(height);

            let top = self.y;
            let bottom = top - height;
            self.rule(MARGIN, top, right, top);
            self.rule(MARGIN, bottom, right, bottom);

            let mut x = MARGIN;
            self.rule(x, top, x, bottom);
            for (column, width) in widths.iter().enumerate() {
                if let Some(cell) = row.get(column) {
                    if !cell.text.is_empty() {
                        let cell_size = cell.font_size.unwrap_or(DEFAULT_CELL_SIZE);
                        let fitted: String = cell
                            .text
                            .chars()
                            .take(chars_that_fit(width - 1.0, cell_size))
                            .collect();
                        self.layer.use_text(
                            fitted,
                            cell_size,
                            Mm(x + 0.8),
                            Mm(bottom + (height - cell_size * PT) / 2.0),
                            &self.regular,
                        );
                    }
                }
                x += width;
                self.rule(x, top, x, bottom);
            }

            self.y = bottom;
            self.page_has_content = true;
        }
        self.y -= 4.0;
    }

    fn image(&mut self, path: &Path, max_width_in: f32) {
        let decoded = match image::open(path) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "image left out of pdf");
                return;
            }
        };
        let (px_width, px_height) = decoded.dimensions();
        if px_width == 0 || px_height == 0 {
            return;
        }

        let (width, height) = image_size_mm(px_width, px_height, max_width_in);
        self.ensure_space(height + 2.0);
        self.y -= height;

        let xobject = ImageXObject {
            width: Px(px_width as usize),
            height: Px(px_height as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: decoded.to_rgb8().into_raw(),
            image_filter: None,
            smask: None,
            clipping_bbox: None,
        };
        Image::from(xobject).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(MARGIN)),
                translate_y: Some(Mm(self.y)),
                dpi: Some(px_width as f32 * MM_PER_INCH / width),
                ..Default::default()
            },
        );

        self.y -= 2.0;
        self.page_has_content = true;
    }

    fn rule(&self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x1), Mm(y1)), false),
                (Point::new(Mm(x2), Mm(y2)), false),
            ],
            is_closed: false,
        });
    }

    fn finish(self) -> MedLogResult<Vec<u8>> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| MedLogError::Conversion(format!("PDF save error: {}", e)))?;
        buf.into_inner()
            .map_err(|e| MedLogError::Conversion(format!("PDF buffer error: {}", e)))
    }
}

/// Column widths spanning the printable width
///
/// Wide tables keep a fixed label column and split the rest evenly.
fn column_widths(columns: usize) -> Vec<f32> {
    let usable = PAGE_WIDTH - 2.0 * MARGIN;
    match columns {
        0 => Vec::new(),
        1..=8 => vec![usable / columns as f32; columns],
        _ => {
            let rest = (usable - LABEL_COLUMN) / (columns - 1) as f32;
            std::iter::once(LABEL_COLUMN)
                .chain(std::iter::repeat(rest).take(columns - 1))
                .collect()
        }
    }
}

/// Rendered size of a picture in millimetres
///
/// The width is capped by `max_width_in` and the printable width, the
/// height by the printable height; the aspect ratio is kept.
fn image_size_mm(px_width: u32, px_height: u32, max_width_in: f32) -> (f32, f32) {
    let aspect = px_height as f32 / px_width as f32;
    let mut width = (max_width_in * MM_PER_INCH).min(PAGE_WIDTH - 2.0 * MARGIN);
    let max_height = PAGE_HEIGHT - 2.0 * MARGIN;
    if width * aspect > max_height {
        width = max_height / aspect;
    }
    (width, width * aspect)
}

/// Rough Helvetica capacity of a span
fn chars_that_fit(width_mm: f32, size: f32) -> usize {
    (width_mm / (size * PT * 0.5)).floor().max(1.0) as usize
}

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for source_line in text.lines() {
        let mut current = String::new();
        for word in source_line.split_whitespace() {
            if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TemplateDocument;
    use tempfile::TempDir;

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_text("", 10), vec![""]);
        assert_eq!(wrap_text("a\nb", 10), vec!["a", "b"]);
    }

    #[test]
    fn test_column_widths_fill_page() {
        let widths = column_widths(32);
        assert_eq!(widths.len(), 32);
        assert_eq!(widths[0], LABEL_COLUMN);
        let total: f32 = widths.iter().sum();
        assert!((total - (PAGE_WIDTH - 2.0 * MARGIN)).abs() < 0.01);

        assert_eq!(column_widths(4).len(), 4);
        assert!(column_widths(0).is_empty());
    }

    #[test]
    fn test_image_size_keeps_aspect() {
        let (width, height) = image_size_mm(600, 300, 6.0);
        assert!((width - 152.4).abs() < 0.01);
        assert!((height - 76.2).abs() < 0.01);

        // Tall pictures are limited by the page height
        let (width, height) = image_size_mm(100, 1000, 6.0);
        assert!((height - (PAGE_HEIGHT - 2.0 * MARGIN)).abs() < 0.01);
        assert!((width - height / 10.0).abs() < 0.01);
    }

    #[test]
    fn test_render_embeds_images() {
        let temp_dir = TempDir::new().unwrap();
        let picture = temp_dir.path().join("pill.png");
        image::RgbImage::from_pixel(40, 20, image::Rgb([200u8, 30, 30]))
            .save(&picture)
            .unwrap();

        let mut template = TemplateDocument::builtin();
        let without = render_pdf(template.document()).unwrap();
        template.add_image(picture, "Front", 6.0);
        template.add_image(temp_dir.path().join("gone.png"), "Back", 6.0);
        let with = render_pdf(template.document()).unwrap();

        assert!(!contains(&without, b"/Subtype/Image"));
        assert!(contains(&with, b"/Subtype/Image"));
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|window| window == needle)
    }

    #[test]
    fn test_render_builtin_template() {
        let mut template = TemplateDocument::builtin();
        template.clone_table_section("Continuation");
        let bytes = render_pdf(template.document()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_converter_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("log.pdf");
        PdfConverter
            .convert(TemplateDocument::builtin().document(), &output)
            .unwrap();
        assert!(output.exists());

        let bad = temp_dir.path().join("missing").join("log.pdf");
        let err = PdfConverter
            .convert(TemplateDocument::builtin().document(), &bad)
            .unwrap_err();
        assert!(matches!(err, MedLogError::Conversion(_)));
    }
}
