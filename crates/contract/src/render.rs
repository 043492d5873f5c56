use thiserror::Error;

use clientdesk_export::geometry::PaperSize;
use clientdesk_export::raster::{RasterCanvas, RasterImage};
use clientdesk_export::renderer::{DocumentRenderer, RenderRequest};

use crate::document::{Block, ContractDocument, Signatory};
use crate::settings::{Color, ColorParseError};

/// Base raster density before supersampling. 4 px/mm puts an A4 sheet at
/// 840 px wide, matching the on-screen template width.
pub const BASE_PIXELS_PER_MM: u32 = 4;

/// Page margin on every side.
pub const PAGE_MARGIN_MM: u32 = 20;

const INK: [u8; 4] = [33, 37, 41, 255];
const RULE: [u8; 4] = [120, 120, 120, 255];
// Pale enough to read as a watermark, dark enough that the rows it
// touches never count as blank.
const WATERMARK: [u8; 4] = [240, 241, 242, 255];

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid primary colour '{value}': {reason}")]
    InvalidColor {
        value: String,
        reason: ColorParseError,
    },
}

/// Rasterizes a composed contract onto a white canvas.
///
/// Text is laid out with an estimated glyph width rather than real font
/// shaping; the output is a faithful ink map of the document, which is all
/// pagination and PDF assembly need.
pub struct ContractRenderer {
    document: ContractDocument,
    paper: PaperSize,
}

struct PaintOp {
    x: i64,
    y: i64,
    width: i64,
    height: i64,
    rgba: [u8; 4],
}

/// Scale-dependent layout metrics, all in pixels.
struct Metrics {
    scale: u32,
}

impl Metrics {
    fn px(&self, base: u32) -> i64 {
        (base * self.scale) as i64
    }

    fn title_font(&self) -> i64 {
        self.px(24)
    }
    fn heading_font(&self) -> i64 {
        self.px(18)
    }
    fn body_font(&self) -> i64 {
        self.px(13)
    }
    fn title_line(&self) -> i64 {
        self.px(34)
    }
    fn heading_line(&self) -> i64 {
        self.px(26)
    }
    fn body_line(&self) -> i64 {
        self.px(20)
    }
}

/// Average glyph advance for a given font height. Matches the width
/// estimate the preview pane uses, so wrapping agrees between the two.
fn char_width(font_px: i64) -> f32 {
    font_px as f32 * 0.6
}

fn text_width(text: &str, font_px: i64) -> i64 {
    (text.chars().count() as f32 * char_width(font_px)).ceil() as i64
}

/// Greedy word wrap against an estimated line capacity in characters.
fn wrap_text(text: &str, font_px: i64, max_width: i64) -> Vec<String> {
    let capacity = ((max_width as f32 / char_width(font_px)).floor() as usize).max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > capacity && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

struct LayoutPass {
    metrics: Metrics,
    margin: i64,
    content_width: i64,
    cursor: i64,
    ops: Vec<PaintOp>,
    accent: [u8; 4],
}

impl LayoutPass {
    /// Paints one line of text as an ink band centred inside its line box.
    fn text_line(&mut self, text: &str, x: i64, font_px: i64, line_px: i64, rgba: [u8; 4]) {
        let width = text_width(text, font_px).min(self.margin + self.content_width - x);
        self.ops.push(PaintOp {
            x,
            y: self.cursor + (line_px - font_px) / 2,
            width,
            height: font_px,
            rgba,
        });
        self.cursor += line_px;
    }

    fn wrapped(&mut self, text: &str, x: i64, width: i64, font_px: i64, line_px: i64, rgba: [u8; 4]) {
        for line in wrap_text(text, font_px, width) {
            self.text_line(&line, x, font_px, line_px, rgba);
        }
    }

    fn centered_line(&mut self, text: &str, font_px: i64, line_px: i64, rgba: [u8; 4]) {
        let width = text_width(text, font_px).min(self.content_width);
        let x = self.margin + (self.content_width - width) / 2;
        self.text_line(text, x, font_px, line_px, rgba);
    }

    fn gap(&mut self, base: u32) {
        self.cursor += self.metrics.px(base);
    }

    fn rule(&mut self, x: i64, width: i64) {
        self.ops.push(PaintOp {
            x,
            y: self.cursor,
            width,
            height: self.metrics.px(1).max(1),
            rgba: RULE,
        });
        self.cursor += self.metrics.px(4);
    }

    fn signature_column(&mut self, x: i64, width: i64, signatory: &Signatory, top: i64) {
        let body = self.metrics.body_font();
        let line = self.metrics.body_line();
        let saved = self.cursor;
        self.cursor = top;
        self.rule(x, width);
        for text in [&signatory.name, &signatory.role, &signatory.document_line] {
            self.wrapped(text, x, width, body, line, INK);
        }
        self.cursor = self.cursor.max(saved);
    }

    fn block(&mut self, block: &Block) {
        let m = &self.metrics;
        let (body, body_line) = (m.body_font(), m.body_line());
        let (heading, heading_line) = (m.heading_font(), m.heading_line());
        let (title, title_line) = (m.title_font(), m.title_line());
        match block {
            Block::Title(text) => {
                self.centered_line(text, title, title_line, self.accent);
                self.gap(6);
            }
            Block::Subtitle(text) => {
                self.centered_line(text, body, body_line, INK);
                self.gap(14);
            }
            Block::ClauseHeading(text) => {
                self.gap(12);
                self.wrapped(
                    text,
                    self.margin,
                    self.content_width,
                    heading,
                    heading_line,
                    self.accent,
                );
                self.gap(4);
            }
            Block::Paragraph(text) => {
                self.wrapped(text, self.margin, self.content_width, body, body_line, INK);
                self.gap(8);
            }
            Block::ListItem(text) => {
                let indent = self.metrics.px(16);
                let bullet = self.metrics.px(5);
                self.ops.push(PaintOp {
                    x: self.margin + self.metrics.px(4),
                    y: self.cursor + (body_line - bullet) / 2,
                    width: bullet,
                    height: bullet,
                    rgba: INK,
                });
                self.wrapped(
                    text,
                    self.margin + indent,
                    self.content_width - indent,
                    body,
                    body_line,
                    INK,
                );
                self.gap(6);
            }
            Block::SignatureRow(left, right) => {
                // Room for the actual pen strokes above the rules.
                self.gap(40);
                let gutter = self.metrics.px(20);
                let column = (self.content_width - gutter) / 2;
                let top = self.cursor;
                self.signature_column(self.margin, column, left, top);
                self.signature_column(self.margin + column + gutter, column, right, top);
                self.gap(10);
            }
            Block::Footer { left, right } => {
                self.gap(16);
                self.rule(self.margin, self.content_width);
                let y_line = self.cursor;
                self.text_line(left, self.margin, body, body_line, INK);
                let right_width = text_width(right, body).min(self.content_width);
                self.ops.push(PaintOp {
                    x: self.margin + self.content_width - right_width,
                    y: y_line + (body_line - body) / 2,
                    width: right_width,
                    height: body,
                    rgba: INK,
                });
            }
        }
    }
}

impl ContractRenderer {
    pub fn new(document: ContractDocument, paper: PaperSize) -> Self {
        Self { document, paper }
    }

    fn resolve_accent(&self, request: &RenderRequest) -> Result<[u8; 4], RenderError> {
        if let Some(rgba) = request.palette.get("primary") {
            return Ok(rgba);
        }
        Color::from_hex(&self.document.primary_color_hex)
            .map(|color| color.rgba())
            .map_err(|reason| RenderError::InvalidColor {
                value: self.document.primary_color_hex.clone(),
                reason,
            })
    }
}

impl DocumentRenderer for ContractRenderer {
    type Error = RenderError;

    fn render(&self, request: &RenderRequest) -> Result<RasterImage, Self::Error> {
        let scale = request.scale.max(1);
        let accent = self.resolve_accent(request)?;

        let width = (self.paper.width_mm * BASE_PIXELS_PER_MM as f32).round() as u32 * scale;
        let page_height =
            ((self.paper.height_mm * BASE_PIXELS_PER_MM as f32).round() as u32 * scale) as i64;
        let margin = (PAGE_MARGIN_MM * BASE_PIXELS_PER_MM * scale) as i64;

        let mut pass = LayoutPass {
            metrics: Metrics { scale },
            margin,
            content_width: width as i64 - 2 * margin,
            cursor: margin,
            ops: Vec::new(),
            accent,
        };
        for block in &self.document.blocks {
            pass.block(block);
        }

        // The capture never shrinks below one full page.
        let height = (pass.cursor + margin).max(page_height) as u32;
        let mut canvas = RasterCanvas::filled(width, height, [255, 255, 255, 255]);

        if self.document.watermark.is_some() {
            // One pale stripe per nominal page, under the ink.
            let stripe_height = pass.metrics.px(30);
            let stripe_width = pass.content_width / 2;
            let pages = (height as i64 + page_height - 1) / page_height;
            for page in 0..pages {
                canvas.fill_rect(
                    margin + pass.content_width / 4,
                    page * page_height + (page_height - stripe_height) / 2,
                    stripe_width,
                    stripe_height,
                    WATERMARK,
                );
            }
        }

        for op in &pass.ops {
            canvas.fill_rect(op.x, op.y, op.width, op.height, op.rgba);
        }
        Ok(canvas.into_image())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Client, PaymentMethod};
    use crate::document::ExportFlags;
    use crate::settings::ContractSettings;

    fn sample_client() -> Client {
        Client {
            id: "ab12cd34".into(),
            name: "Ana Souza".into(),
            email: "ana@example.com".into(),
            phone: Some("(19) 98888-7777".into()),
            document: Some("123.456.789-00".into()),
            project_name: "Site institucional".into(),
            project_description: Some("Landing page e blog.".into()),
            start_date: "01/02/2025".into(),
            end_date: "30/04/2025".into(),
            setup_fee: 3500.0,
            monthly_fee: 250.0,
            due_day: 10,
            payment_method: PaymentMethod::Pix,
            contract_signed: true,
        }
    }

    fn sample_document(flags: ExportFlags) -> ContractDocument {
        let mut settings = ContractSettings::default();
        settings.provider_name = "Maria Dev".into();
        settings.provider_city_state = "Campinas - SP".into();
        ContractDocument::compose(&sample_client(), &settings, flags, "01/07/2025", 2025).unwrap()
    }

    fn tiny_document(watermark: bool) -> ContractDocument {
        ContractDocument {
            blocks: vec![Block::Title("CONTRATO".into())],
            watermark: watermark.then(|| "RASCUNHO".to_string()),
            primary_color_hex: "#7C3AED".into(),
        }
    }

    #[test]
    fn canvas_matches_paper_width_and_scale() {
        let renderer = ContractRenderer::new(sample_document(ExportFlags::default()), PaperSize::a4());
        let image = renderer.render(&RenderRequest::default()).unwrap();
        assert_eq!(image.width(), 210 * BASE_PIXELS_PER_MM * 2);
        assert!(image.height() >= 297 * BASE_PIXELS_PER_MM * 2);
    }

    #[test]
    fn layout_leaves_blank_gutters_between_blocks() {
        let renderer = ContractRenderer::new(sample_document(ExportFlags::default()), PaperSize::a4());
        let image = renderer.render(&RenderRequest::with_scale(1)).unwrap();

        let mut seen_ink = false;
        let mut blank_after_ink = 0u32;
        for y in 0..image.height() {
            if image.is_row_blank(y) {
                if seen_ink {
                    blank_after_ink += 1;
                }
            } else {
                seen_ink = true;
            }
        }
        assert!(seen_ink);
        assert!(blank_after_ink > 0, "no whitespace for pagination to target");
    }

    #[test]
    fn watermark_fills_the_page_centre() {
        let paper = PaperSize::a4();
        let centre = (297 * BASE_PIXELS_PER_MM / 2) as u32;

        let plain = ContractRenderer::new(tiny_document(false), paper)
            .render(&RenderRequest::with_scale(1))
            .unwrap();
        assert!(plain.is_row_blank(centre));

        let draft = ContractRenderer::new(tiny_document(true), paper)
            .render(&RenderRequest::with_scale(1))
            .unwrap();
        assert!(!draft.is_row_blank(centre));
    }

    #[test]
    fn invalid_primary_colour_is_reported() {
        let mut document = tiny_document(false);
        document.primary_color_hex = "oklch(0.5 0.2 280)".into();
        let renderer = ContractRenderer::new(document, PaperSize::a4());
        match renderer.render(&RenderRequest::default()) {
            Err(RenderError::InvalidColor { value, .. }) => {
                assert_eq!(value, "oklch(0.5 0.2 280)");
            }
            Ok(_) => panic!("render accepted a non-hex colour"),
        }
    }

    #[test]
    fn palette_override_bypasses_colour_parsing() {
        let mut document = tiny_document(false);
        document.primary_color_hex = "var(--primary)".into();
        let renderer = ContractRenderer::new(document, PaperSize::a4());
        let mut request = RenderRequest::with_scale(1);
        request.palette.set("primary", [124, 58, 237, 255]);
        assert!(renderer.render(&request).is_ok());
    }
}
