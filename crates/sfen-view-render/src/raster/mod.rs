//! ラスタバックエンド
//!
//! 透明なキャンバスに罫線・矩形を描き、駒はキャッシュ済みタイル、その他の文字は
//! その場でラスタライズしたマスクを合成して PNG にする。

mod draw;
mod font;
mod glyph;
mod tiles;

pub use font::{FontError, FontRasterizer};
pub use glyph::{GlyphRasterizer, Mask, SilhouetteRasterizer};
pub use tiles::TileCache;

use std::io::Cursor;

use image::imageops::rotate180;
use image::{ImageFormat, RgbaImage};
use sfen_view_core::{Diagram, DrawingInstruction, PieceStyle};

use crate::{RenderError, Renderer, canvas_size};

/// 文字サイズのピクセル数
fn pixel_size(font_size: f64) -> u32 {
    font_size.round().max(1.0) as u32
}

/// PNG を出力する描画器
///
/// 駒タイルのキャッシュを持つので、長く生かして使い回す。
pub struct RasterRenderer {
    rasterizer: Box<dyn GlyphRasterizer>,
    tiles: TileCache,
}

impl RasterRenderer {
    /// `font_size` は盤上の駒の文字サイズ（マスの 3/4）
    pub fn new(rasterizer: Box<dyn GlyphRasterizer>, font_size: u32) -> Self {
        RasterRenderer { rasterizer, tiles: TileCache::new(font_size) }
    }

    /// 同梱の簡易ラスタライザを使う
    pub fn with_silhouettes(font_size: u32) -> Self {
        RasterRenderer::new(Box::new(SilhouetteRasterizer), font_size)
    }

    pub fn tile_cache(&self) -> &TileCache {
        &self.tiles
    }

    /// キャンバスに描くところまで（エンコード前）
    pub fn paint(&self, diagram: &Diagram) -> Result<RgbaImage, RenderError> {
        let (width, height) = canvas_size(diagram)?;
        let mut canvas = RgbaImage::new(width, height);

        for instruction in &diagram.instructions {
            match instruction {
                DrawingInstruction::Line { x1, y1, x2, y2, color } => {
                    draw::line(&mut canvas, (*x1, *y1), (*x2, *y2), *color);
                }
                DrawingInstruction::FilledRect { x, y, width, height, color } => {
                    draw::fill_rect(&mut canvas, *x, *y, *width, *height, *color);
                }
                DrawingInstruction::Glyph { text, x, y, font_size, color, rotated } => {
                    let mask = self.rasterizer.rasterize(text, pixel_size(*font_size));
                    let mask = if *rotated { rotate180(&mask) } else { mask };
                    draw::draw_mask(&mut canvas, &mask, *x, *y, *color);
                }
                DrawingInstruction::Tile { image, x, y, size, color } => {
                    let (cx, cy) = (x + size / 2.0, y + size / 2.0);
                    let font_size = pixel_size(size * 0.75);
                    if font_size == self.tiles.font_size() {
                        let mask = self.tiles.get(self.rasterizer.as_ref(), *image);
                        draw::draw_mask(&mut canvas, mask, cx, cy, *color);
                    } else {
                        // キャッシュと大きさが違うマスはその場で描く
                        log::debug!(
                            "tile {font_size}px does not match cache {}px",
                            self.tiles.font_size()
                        );
                        let mask = self.rasterizer.rasterize(image.kind.glyph(), font_size);
                        let mask = if image.rotated { rotate180(&mask) } else { mask };
                        draw::draw_mask(&mut canvas, &mask, cx, cy, *color);
                    }
                }
            }
        }
        Ok(canvas)
    }
}

impl std::fmt::Debug for RasterRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterRenderer").field("tiles", &self.tiles).finish_non_exhaustive()
    }
}

impl Renderer for RasterRenderer {
    fn mime_type(&self) -> &'static str {
        "image/png"
    }

    fn piece_style(&self) -> PieceStyle {
        PieceStyle::Tile
    }

    fn render(&self, diagram: &Diagram) -> Result<Vec<u8>, RenderError> {
        let canvas = self.paint(diagram)?;
        let mut bytes = Vec::new();
        canvas.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}
