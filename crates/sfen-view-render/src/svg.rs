//! SVG バックエンド

use sfen_view_core::{Diagram, DrawingInstruction};
use svg::node::element::{Line, Rectangle, Text};
use svg::{Document, Node};

use crate::{RenderError, Renderer, canvas_size};

/// 描画命令列を SVG 文書にする
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    font_family: String,
}

impl SvgRenderer {
    pub fn new() -> Self {
        SvgRenderer { font_family: "serif".to_string() }
    }

    pub fn with_font_family(font_family: impl Into<String>) -> Self {
        SvgRenderer { font_family: font_family.into() }
    }

    /// SVG 文書を組み立てる
    pub fn document(&self, diagram: &Diagram) -> Result<Document, RenderError> {
        canvas_size(diagram)?;

        let mut document =
            Document::new().set("width", diagram.width).set("height", diagram.height);
        for instruction in &diagram.instructions {
            document.append(self.element(instruction));
        }
        Ok(document)
    }

    /// SVG 文書を文字列で返す
    pub fn render_string(&self, diagram: &Diagram) -> Result<String, RenderError> {
        Ok(self.document(diagram)?.to_string())
    }

    fn element(&self, instruction: &DrawingInstruction) -> Box<dyn Node> {
        match instruction {
            DrawingInstruction::Line { x1, y1, x2, y2, color } => Box::new(
                Line::new()
                    .set("x1", *x1)
                    .set("y1", *y1)
                    .set("x2", *x2)
                    .set("y2", *y2)
                    .set("stroke", color.to_hex()),
            ),
            DrawingInstruction::FilledRect { x, y, width, height, color } => Box::new(
                Rectangle::new()
                    .set("x", *x)
                    .set("y", *y)
                    .set("width", *width)
                    .set("height", *height)
                    .set("fill", color.to_hex()),
            ),
            DrawingInstruction::Glyph { text, x, y, font_size, color, rotated } => {
                Box::new(self.text(text, *x, *y, *font_size, &color.to_hex(), *rotated))
            }
            // 画像タイルは持たないので、同じ駒を文字で描く
            DrawingInstruction::Tile { image, x, y, size, color } => Box::new(self.text(
                image.kind.glyph(),
                x + size / 2.0,
                y + size / 2.0,
                size * 0.75,
                &color.to_hex(),
                image.rotated,
            )),
        }
    }

    /// (x, y) を中心に置く文字。倒立はその中心まわりの180度回転。
    fn text(&self, text: &str, x: f64, y: f64, font_size: f64, fill: &str, rotated: bool) -> Text {
        let element = Text::new(text)
            .set("x", x)
            .set("y", y)
            .set("font-size", font_size)
            .set("fill", fill)
            .set("font-family", self.font_family.as_str())
            .set("text-anchor", "middle")
            .set("dominant-baseline", "central");
        if rotated {
            element.set("transform", format!("rotate(180 {x} {y})"))
        } else {
            element
        }
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        SvgRenderer::new()
    }
}

impl Renderer for SvgRenderer {
    fn mime_type(&self) -> &'static str {
        "image/svg+xml"
    }

    fn render(&self, diagram: &Diagram) -> Result<Vec<u8>, RenderError> {
        self.render_string(diagram).map(String::into_bytes)
    }
}
