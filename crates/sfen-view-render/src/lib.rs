//! 局面図の描画バックエンドとプレビューの入口
//!
//! レイアウト（[`sfen_view_core::layout`]）が作った描画命令列を、
//! SVG テキストか PNG 画像のバイト列に変換する。

pub mod config;
pub mod preview;
pub mod raster;
pub mod svg;

pub use config::{ConfigError, OutputFormat, PreviewConfig, TextColorMode, ThemeKind};
pub use preview::{
    Preview, PreviewError, Previewer, render_sfen_preview, render_sfen_preview_for,
};
pub use raster::{
    FontRasterizer, GlyphRasterizer, Mask, RasterRenderer, SilhouetteRasterizer, TileCache,
};
pub use crate::svg::SvgRenderer;

use sfen_view_core::{Diagram, PieceStyle};

/// 描画エラー
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// キャンバスの寸法が不正
    #[error("Invalid canvas size: {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },
    /// 画像のエンコードに失敗
    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

/// 描画命令列を画像のバイト列にするバックエンド
pub trait Renderer {
    /// 出力の MIME タイプ
    fn mime_type(&self) -> &'static str;

    /// このバックエンドが受け付ける盤上の駒の描き方
    fn piece_style(&self) -> PieceStyle {
        PieceStyle::Text
    }

    fn render(&self, diagram: &Diagram) -> Result<Vec<u8>, RenderError>;
}

/// キャンバス寸法を検査して整数ピクセルに丸める
pub(crate) fn canvas_size(diagram: &Diagram) -> Result<(u32, u32), RenderError> {
    const MAX_SIDE: f64 = 16384.0;
    let valid = |v: f64| v.is_finite() && v >= 1.0 && v <= MAX_SIDE;
    if !valid(diagram.width) || !valid(diagram.height) {
        return Err(RenderError::InvalidCanvas {
            width: diagram.width,
            height: diagram.height,
        });
    }
    Ok((diagram.width.ceil() as u32, diagram.height.ceil() as u32))
}
