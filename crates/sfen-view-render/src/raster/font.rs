//! フォントによるラスタライズ

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, OutlinedGlyph, PxScale, Rect, ScaleFont, point};

use super::glyph::{GlyphRasterizer, Mask, SilhouetteRasterizer};

/// よくある場所に置かれる日本語フォント
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSerifCJK-Regular.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSerifCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/opentype/ipaexfont-mincho/ipaexm.ttf",
    "/usr/share/fonts/opentype/ipafont-gothic/ipag.ttf",
    "/usr/share/fonts/truetype/fonts-japanese-gothic.ttf",
    "/System/Library/Fonts/ヒラギノ明朝 ProN.ttc",
    "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
    "C:\\Windows\\Fonts\\msmincho.ttc",
    "C:\\Windows\\Fonts\\msgothic.ttc",
];

/// フォント読み込みのエラー
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("Failed to read font {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unusable font {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ab_glyph::InvalidFont,
    },
}

/// TrueType / OpenType フォントで文字を描く
///
/// フォントに無い文字を含む文字列は [`SilhouetteRasterizer`] に回す。
pub struct FontRasterizer {
    font: FontVec,
}

impl FontRasterizer {
    pub fn from_bytes(data: Vec<u8>) -> Result<FontRasterizer, ab_glyph::InvalidFont> {
        Ok(FontRasterizer { font: FontVec::try_from_vec(data)? })
    }

    pub fn load(path: &Path) -> Result<FontRasterizer, FontError> {
        let data = std::fs::read(path)
            .map_err(|source| FontError::Read { path: path.to_path_buf(), source })?;
        let rasterizer = FontRasterizer::from_bytes(data)
            .map_err(|source| FontError::Invalid { path: path.to_path_buf(), source })?;
        log::debug!("loaded font {}", path.display());
        Ok(rasterizer)
    }

    /// 駒の文字を持つシステムフォントを探す
    pub fn discover() -> Option<FontRasterizer> {
        SYSTEM_FONTS.iter().map(Path::new).filter(|p| p.is_file()).find_map(|path| {
            let rasterizer = FontRasterizer::load(path)
                .inspect_err(|e| log::debug!("skip system font: {e}"))
                .ok()?;
            rasterizer.covers("歩香桂銀金角飛玉と杏圭全馬龍").then_some(rasterizer)
        })
    }

    /// すべての文字のグリフを持つか
    pub fn covers(&self, text: &str) -> bool {
        text.chars().all(|c| self.font.glyph_id(c).0 != 0)
    }

    /// 並べた文字のアウトラインと、それらを囲む矩形
    fn outline(&self, text: &str, size: u32) -> Option<(Vec<OutlinedGlyph>, Rect)> {
        let scale = PxScale::from(size as f32);
        let scaled = self.font.as_scaled(scale);
        let mut caret = 0.0;
        let mut glyphs = Vec::new();
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            let glyph = id.with_scale_and_position(scale, point(caret, scaled.ascent()));
            caret += scaled.h_advance(id);
            glyphs.extend(self.font.outline_glyph(glyph));
        }
        let bounds = glyphs.iter().map(OutlinedGlyph::px_bounds).reduce(|a, b| Rect {
            min: point(a.min.x.min(b.min.x), a.min.y.min(b.min.y)),
            max: point(a.max.x.max(b.max.x), a.max.y.max(b.max.y)),
        })?;
        Some((glyphs, bounds))
    }
}

impl GlyphRasterizer for FontRasterizer {
    fn rasterize(&self, text: &str, size: u32) -> Mask {
        let size = size.max(1);
        if !self.covers(text) {
            return SilhouetteRasterizer.rasterize(text, size);
        }
        let Some((glyphs, bounds)) = self.outline(text, size) else {
            return Mask::new(size, size);
        };

        // 塗られる範囲の中心をマスクの中心に合わせる
        let width = size.max(bounds.width().ceil() as u32);
        let height = size.max(bounds.height().ceil() as u32);
        let dx = (width as f32 - bounds.width()) / 2.0 - bounds.min.x;
        let dy = (height as f32 - bounds.height()) / 2.0 - bounds.min.y;
        let mut mask = Mask::new(width, height);
        for glyph in &glyphs {
            let b = glyph.px_bounds();
            let left = (b.min.x + dx).round() as i64;
            let top = (b.min.y + dy).round() as i64;
            glyph.draw(|x, y, c| {
                let (px, py) = (left + i64::from(x), top + i64::from(y));
                let (Ok(px), Ok(py)) = (u32::try_from(px), u32::try_from(py)) else {
                    return;
                };
                if let Some(p) = mask.get_pixel_mut_checked(px, py) {
                    let value = (c.clamp(0.0, 1.0) * 255.0).round() as u8;
                    p.0[0] = p.0[0].max(value);
                }
            });
        }
        mask
    }
}

impl std::fmt::Debug for FontRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontRasterizer").field("glyphs", &self.font.glyph_count()).finish()
    }
}
