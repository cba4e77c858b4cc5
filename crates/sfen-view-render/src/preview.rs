//! プレビューの入口
//!
//! 任意のテキスト → SFEN の検出 → 局面の復元 → レイアウト → 画像。
//! SFEN が見つからない・壊れている場合はプレビューを出さないだけで、
//! エラーとして利用者に見せる必要はない（[`PreviewError::is_silent`]）。

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use sfen_view_core::{LocateError, SfenError, decode, layout, locate};

use crate::config::{ConfigError, OutputFormat, PreviewConfig, ThemeKind};
use crate::raster::RasterRenderer;
use crate::svg::SvgRenderer;
use crate::{RenderError, Renderer};

/// 描画結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

impl Preview {
    /// `data:<mime>;base64,...`
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }

    /// ツールチップ等に埋め込む Markdown 画像
    pub fn to_markdown(&self) -> String {
        format!("![]({})", self.to_data_uri())
    }
}

/// プレビューのエラー
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error(transparent)]
    NotFound(#[from] LocateError),
    #[error("Malformed SFEN: {0}")]
    Malformed(#[from] SfenError),
    /// 文書がファイルセレクタの対象外
    #[error("Document is not selected for preview")]
    NotSelected,
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PreviewError {
    /// 黙ってプレビューを出さなければよいエラーか
    pub fn is_silent(&self) -> bool {
        !matches!(self, PreviewError::Render(_) | PreviewError::Config(_))
    }
}

/// 設定と描画器をまとめて持つ。
///
/// PNG の駒タイルは初回の描画で作られ、以後この値が生きている間は使い回される。
#[derive(Debug)]
pub struct Previewer {
    config: PreviewConfig,
    svg: SvgRenderer,
    raster: RasterRenderer,
}

impl Previewer {
    /// 指定のフォントが読めなければエラー
    pub fn new(config: PreviewConfig) -> Result<Previewer, ConfigError> {
        let font_size = config.font_size.round().max(1.0) as u32;
        let raster = RasterRenderer::new(config.glyph_rasterizer()?, font_size);
        Ok(Previewer { config, svg: SvgRenderer::new(), raster })
    }

    /// ラスタ描画器を差し替える
    ///
    /// 駒タイルの大きさが `font-size` と違う描画器でも描けるが、タイルは毎回作り直す。
    pub fn with_raster(mut self, raster: RasterRenderer) -> Previewer {
        self.raster = raster;
        self
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    fn renderer(&self) -> &dyn Renderer {
        match self.config.format {
            OutputFormat::Svg => &self.svg,
            OutputFormat::Png => &self.raster,
        }
    }

    /// テキスト中の SFEN を描画する
    pub fn render(&self, text: &str, theme: ThemeKind) -> Result<Preview, PreviewError> {
        let sfen = locate(text).inspect_err(|e| log::debug!("no preview: {e}"))?;
        let position = decode(&sfen).inspect_err(|e| log::debug!("rejected '{sfen}': {e}"))?;

        let renderer = self.renderer();
        let options = self.config.layout_options(theme).with_piece_style(renderer.piece_style());
        let diagram = layout(&position, &options);
        let bytes = renderer.render(&diagram)?;
        log::debug!(
            "rendered {}x{} {} ({} bytes)",
            diagram.width,
            diagram.height,
            renderer.mime_type(),
            bytes.len()
        );
        Ok(Preview { bytes, mime_type: renderer.mime_type() })
    }

    /// 文書パスがファイルセレクタに合う場合だけ描画する
    pub fn render_for(
        &self,
        document: &Path,
        text: &str,
        theme: ThemeKind,
    ) -> Result<Preview, PreviewError> {
        if !self.config.allows(document) {
            return Err(PreviewError::NotSelected);
        }
        self.render(text, theme)
    }
}

/// 一回限りのプレビュー。繰り返し描くなら [`Previewer`] を使い回す。
pub fn render_sfen_preview(
    text: &str,
    config: &PreviewConfig,
    theme: ThemeKind,
) -> Result<Preview, PreviewError> {
    Previewer::new(config.clone())?.render(text, theme)
}

/// [`render_sfen_preview`] の文書パス付き版
pub fn render_sfen_preview_for(
    document: &Path,
    text: &str,
    config: &PreviewConfig,
    theme: ThemeKind,
) -> Result<Preview, PreviewError> {
    Previewer::new(config.clone())?.render_for(document, text, theme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sfen_view_core::SFEN_HIRATE;
    use std::path::PathBuf;

    fn png_config() -> PreviewConfig {
        PreviewConfig { format: OutputFormat::Png, ..PreviewConfig::default() }
    }

    fn svg_text(preview: &Preview) -> String {
        String::from_utf8(preview.bytes.clone()).unwrap()
    }

    #[test]
    fn test_svg_preview_from_prose() {
        let text = format!("see {SFEN_HIRATE} for the start");
        let preview =
            render_sfen_preview(&text, &PreviewConfig::default(), ThemeKind::Light).unwrap();
        assert_eq!(preview.mime_type, "image/svg+xml");
        let svg = svg_text(&preview);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("玉"));
    }

    #[test]
    fn test_png_preview() {
        let preview = render_sfen_preview(SFEN_HIRATE, &png_config(), ThemeKind::Dark).unwrap();
        assert_eq!(preview.mime_type, "image/png");
        assert_eq!(&preview.bytes[1..4], b"PNG");
    }

    #[test]
    fn test_theme_decides_default_color() {
        let config = PreviewConfig::default();
        let light = svg_text(&render_sfen_preview(SFEN_HIRATE, &config, ThemeKind::Light).unwrap());
        let dark = svg_text(&render_sfen_preview(SFEN_HIRATE, &config, ThemeKind::Dark).unwrap());
        assert!(light.contains("#000000") && !light.contains("#ffffff"));
        assert!(dark.contains("#ffffff") && !dark.contains("#000000"));
    }

    #[test]
    fn test_failures_are_silent() {
        let config = PreviewConfig::default();
        let not_found =
            render_sfen_preview("no shogi here", &config, ThemeKind::Light).unwrap_err();
        assert!(matches!(not_found, PreviewError::NotFound(_)));
        assert!(not_found.is_silent());

        let malformed = render_sfen_preview(
            "lnsgkgsnl/9/9/9/9/9/9/9/LNSGKGSNX b -",
            &config,
            ThemeKind::Light,
        )
        .unwrap_err();
        assert!(matches!(malformed, PreviewError::Malformed(_)));
        assert!(malformed.is_silent());
    }

    #[test]
    fn test_file_selector_gate() {
        let config =
            PreviewConfig { file_selector: vec!["*.md".to_string()], ..PreviewConfig::default() };
        let render = |document: &str| {
            render_sfen_preview_for(Path::new(document), SFEN_HIRATE, &config, ThemeKind::Light)
        };
        let err = render("main.rs").unwrap_err();
        assert!(matches!(err, PreviewError::NotSelected));
        assert!(err.is_silent());
        assert!(render("notes.md").is_ok());
    }

    #[test]
    fn test_embedding() {
        let preview = Preview { bytes: b"<svg/>".to_vec(), mime_type: "image/svg+xml" };
        assert_eq!(preview.to_data_uri(), "data:image/svg+xml;base64,PHN2Zy8+");
        assert_eq!(preview.to_markdown(), "![](data:image/svg+xml;base64,PHN2Zy8+)");
    }

    #[test]
    fn test_previewer_reuses_tiles() {
        let previewer = Previewer::new(png_config()).unwrap();
        let first = previewer.render(SFEN_HIRATE, ThemeKind::Light).unwrap();
        assert!(previewer.raster.tile_cache().is_built());
        let second = previewer.render(SFEN_HIRATE, ThemeKind::Light).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_png_shows_which_piece_stands_on_a_square() {
        let png = |sfen: &str| render_sfen_preview(sfen, &png_config(), ThemeKind::Light).unwrap();
        let pawn = png("4k4/9/9/9/4P4/9/9/9/4K4 b - 1");
        let rook = png("4k4/9/9/9/4R4/9/9/9/4K4 b - 1");
        assert_ne!(pawn.bytes, rook.bytes);
    }

    #[test]
    fn test_png_shows_which_piece_is_in_hand() {
        let png = |sfen: &str| render_sfen_preview(sfen, &png_config(), ThemeKind::Light).unwrap();
        let gold = png("4k4/9/9/9/9/9/9/9/4K4 b G 1");
        let rook = png("4k4/9/9/9/9/9/9/9/4K4 b R 1");
        assert_ne!(gold.bytes, rook.bytes);

        let gote_gold = png("4k4/9/9/9/9/9/9/9/4K4 b g 1");
        let gote_rook = png("4k4/9/9/9/9/9/9/9/4K4 b r 1");
        assert_ne!(gote_gold.bytes, gote_rook.bytes);
    }

    #[test]
    fn test_missing_font_file_is_reported() {
        let config = PreviewConfig {
            font_file: Some(PathBuf::from("/nonexistent/font.ttf")),
            ..png_config()
        };
        let err = render_sfen_preview(SFEN_HIRATE, &config, ThemeKind::Light).unwrap_err();
        assert!(matches!(err, PreviewError::Config(ConfigError::Font(_))));
        assert!(!err.is_silent());
    }
}
