//! プレビュー設定
//!
//! TOML ファイル（または既定値）から読み、CLI 引数で上書きする。
//!
//! ```toml
//! file-selector = ["**/*.md", "**/*.kif"]
//! text-color = "default"   # "black" | "white" | "default"
//! font-size = 24
//! format = "svg"           # "svg" | "png"
//! font-file = "/usr/share/fonts/opentype/ipaexfont-mincho/ipaexm.ttf"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sfen_view_core::{LayoutOptions, Rgba};

use crate::raster::{FontError, FontRasterizer, GlyphRasterizer, SilhouetteRasterizer};

/// 設定エラー
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid file selector '{pattern}': {source}")]
    Selector {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("font-size must be between {min} and {max}, got {value}")]
    FontSize { value: f64, min: f64, max: f64 },
    #[error(transparent)]
    Font(#[from] FontError),
}

/// エディタの配色テーマ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeKind {
    #[default]
    Light,
    Dark,
    HighContrast,
}

/// 文字色の指定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextColorMode {
    /// テーマに従う（暗いテーマなら白）
    #[default]
    Default,
    #[serde(alias = "light")]
    Black,
    #[serde(alias = "dark")]
    White,
}

impl TextColorMode {
    pub fn resolve(self, theme: ThemeKind) -> Rgba {
        match self {
            TextColorMode::Black => Rgba::BLACK,
            TextColorMode::White => Rgba::WHITE,
            TextColorMode::Default => match theme {
                ThemeKind::Dark | ThemeKind::HighContrast => Rgba::WHITE,
                ThemeKind::Light => Rgba::BLACK,
            },
        }
    }
}

/// 出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
}

/// プレビュー設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PreviewConfig {
    /// プレビュー対象の文書パスの glob。空なら全文書。
    pub file_selector: Vec<String>,
    pub text_color: TextColorMode,
    /// 盤上の駒の文字サイズ。マスの一辺はこの 4/3 倍。
    pub font_size: f64,
    pub format: OutputFormat,
    /// PNG の駒文字に使うフォント。無ければシステムのフォントを探す。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_file: Option<PathBuf>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        PreviewConfig {
            file_selector: Vec::new(),
            text_color: TextColorMode::Default,
            font_size: Self::DEFAULT_FONT_SIZE,
            format: OutputFormat::Svg,
            font_file: None,
        }
    }
}

impl PreviewConfig {
    pub const DEFAULT_FONT_SIZE: f64 = 24.0;
    pub const MIN_FONT_SIZE: f64 = 4.0;
    pub const MAX_FONT_SIZE: f64 = 256.0;

    /// TOML 文字列から
    pub fn from_toml(text: &str) -> Result<PreviewConfig, ConfigError> {
        let config: PreviewConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML ファイルから
    pub fn load(path: &Path) -> Result<PreviewConfig, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = PreviewConfig::from_toml(&text)?;
        log::debug!("loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let size = self.font_size;
        if !size.is_finite() || !(Self::MIN_FONT_SIZE..=Self::MAX_FONT_SIZE).contains(&size) {
            return Err(ConfigError::FontSize {
                value: size,
                min: Self::MIN_FONT_SIZE,
                max: Self::MAX_FONT_SIZE,
            });
        }
        for pattern in &self.file_selector {
            glob::Pattern::new(pattern).map_err(|source| ConfigError::Selector {
                pattern: pattern.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// 文書パスがプレビュー対象か
    pub fn allows(&self, document: &Path) -> bool {
        if self.file_selector.is_empty() {
            return true;
        }
        let allowed = self
            .file_selector
            .iter()
            .filter_map(|p| glob::Pattern::new(p).ok())
            .any(|p| p.matches_path(document));
        if !allowed {
            log::debug!("{} is not selected by {:?}", document.display(), self.file_selector);
        }
        allowed
    }

    /// レイアウト設定に変換
    pub fn layout_options(&self, theme: ThemeKind) -> LayoutOptions {
        LayoutOptions::from_font_size(self.font_size)
            .with_text_color(self.text_color.resolve(theme))
    }

    /// PNG の文字を描くラスタライザ
    ///
    /// `font-file` の指定、システムのフォント、同梱の簡易ラスタライザの順に選ぶ。
    /// 指定されたフォントが読めないのはエラー。
    pub fn glyph_rasterizer(&self) -> Result<Box<dyn GlyphRasterizer>, ConfigError> {
        if let Some(path) = &self.font_file {
            return Ok(Box::new(FontRasterizer::load(path)?));
        }
        if let Some(font) = FontRasterizer::discover() {
            log::debug!("using {font:?}");
            return Ok(Box::new(font));
        }
        log::debug!("no CJK font found, drawing piece silhouettes");
        Ok(Box::new(SilhouetteRasterizer))
    }
}
