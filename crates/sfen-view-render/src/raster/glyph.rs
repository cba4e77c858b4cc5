//! 文字のラスタライズ
//!
//! 境界は [`GlyphRasterizer`] trait。フォントを使う実装は [`super::FontRasterizer`]、
//! フォントが無い環境向けに [`SilhouetteRasterizer`] を同梱する。

use image::{GrayImage, Luma};
use sfen_view_core::PieceKind;
use sfen_view_core::layout::{GOTE_MARKER, SENTE_MARKER};

/// 8bit の被覆率マスク。色は合成時に付ける。
pub type Mask = GrayImage;

/// 文字列を `size` ピクセル四方程度のマスクにする
pub trait GlyphRasterizer: Send + Sync {
    fn rasterize(&self, text: &str, size: u32) -> Mask;
}

/// 塗られているピクセル数
#[cfg(test)]
pub(crate) fn coverage(mask: &Mask) -> usize {
    mask.pixels().filter(|p| p.0[0] > 0).count()
}

/// フォントを使わない簡易ラスタライザ
///
/// - 駒の文字: 駒形の五角形の輪郭に駒種の SFEN 文字（成駒は塗りつぶしに白抜き）
/// - ☗ / ☖: 塗りつぶし / 輪郭の五角形
/// - 数字: 3x5 のビットマップ数字
/// - その他: 透明
#[derive(Debug, Clone, Copy, Default)]
pub struct SilhouetteRasterizer;

/// 駒形（上向き）の頂点。単位正方形上の座標。
const PENTAGON: [(f64, f64); 5] =
    [(0.5, 0.06), (0.8, 0.24), (0.9, 0.94), (0.1, 0.94), (0.2, 0.24)];

/// 3x5 のビットマップ。各行の下位3bitが左→右。
type Bitmap = [u8; 5];

const DIGITS: [Bitmap; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

/// 成る前の駒種の SFEN 文字
fn letter(kind: PieceKind) -> Bitmap {
    match kind.unpromote() {
        PieceKind::Pawn => [0b111, 0b101, 0b111, 0b100, 0b100],
        PieceKind::Lance => [0b100, 0b100, 0b100, 0b100, 0b111],
        PieceKind::Knight => [0b101, 0b111, 0b111, 0b101, 0b101],
        PieceKind::Silver => [0b111, 0b100, 0b111, 0b001, 0b111],
        PieceKind::Gold => [0b111, 0b100, 0b101, 0b101, 0b111],
        PieceKind::Bishop => [0b110, 0b101, 0b110, 0b101, 0b110],
        PieceKind::Rook => [0b110, 0b101, 0b110, 0b101, 0b101],
        _ => [0b101, 0b101, 0b110, 0b101, 0b101],
    }
}

impl GlyphRasterizer for SilhouetteRasterizer {
    fn rasterize(&self, text: &str, size: u32) -> Mask {
        let size = size.max(1);
        if text == SENTE_MARKER {
            return pentagon(size, true);
        }
        if text == GOTE_MARKER {
            return pentagon(size, false);
        }
        if let Some(&kind) = PieceKind::ALL.iter().find(|k| k.glyph() == text) {
            return piece(kind, size);
        }
        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            return digits(text, size);
        }
        log::trace!("no silhouette for glyph {text:?}");
        Mask::new(size, size)
    }
}

/// 駒形に駒種の文字を入れる。成駒は地を塗り、文字を抜く。
fn piece(kind: PieceKind, size: u32) -> Mask {
    let promoted = kind.is_promoted();
    let mut mask = pentagon(size, promoted);
    let scale = (size / 10).max(1);
    let left = size.saturating_sub(3 * scale) / 2;
    let top = (size * 3 / 5).saturating_sub(5 * scale / 2);
    let ink = if promoted { 0 } else { 0xff };
    stamp(&mut mask, &letter(kind), left, top, scale, |p| p.0[0] = ink);
    mask
}

fn pentagon(size: u32, filled: bool) -> Mask {
    let s = f64::from(size);
    let points: Vec<(f64, f64)> = PENTAGON.iter().map(|&(x, y)| (x * s, y * s)).collect();
    let stroke = (s / 16.0).max(1.0);

    Mask::from_fn(size, size, |px, py| {
        let p = (f64::from(px) + 0.5, f64::from(py) + 0.5);
        let on = inside(&points, p) && (filled || edge_distance(&points, p) <= stroke);
        Luma([if on { 0xff } else { 0 }])
    })
}

/// 偶奇規則による内外判定
fn inside(points: &[(f64, f64)], (x, y): (f64, f64)) -> bool {
    let mut result = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (xi, yi) = points[i];
        let (xj, yj) = points[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            result = !result;
        }
        j = i;
    }
    result
}

/// 多角形の辺までの最短距離
fn edge_distance(points: &[(f64, f64)], (x, y): (f64, f64)) -> f64 {
    let mut best = f64::INFINITY;
    for i in 0..points.len() {
        let (ax, ay) = points[i];
        let (bx, by) = points[(i + 1) % points.len()];
        let (dx, dy) = (bx - ax, by - ay);
        let len2 = dx * dx + dy * dy;
        let t = if len2 == 0.0 {
            0.0
        } else {
            (((x - ax) * dx + (y - ay) * dy) / len2).clamp(0.0, 1.0)
        };
        let (cx, cy) = (ax + t * dx, ay + t * dy);
        best = best.min(((x - cx).powi(2) + (y - cy).powi(2)).sqrt());
    }
    best
}

/// ビットマップの立っているドットを `scale` 倍の正方形で塗る
fn stamp(
    mask: &mut Mask,
    bitmap: &Bitmap,
    left: u32,
    top: u32,
    scale: u32,
    mut paint: impl FnMut(&mut Luma<u8>),
) {
    for (row, bits) in bitmap.iter().enumerate() {
        for col in 0..3u32 {
            if bits & (0b100 >> col) == 0 {
                continue;
            }
            for dy in 0..scale {
                for dx in 0..scale {
                    let x = left + col * scale + dx;
                    let y = top + row as u32 * scale + dy;
                    if let Some(p) = mask.get_pixel_mut_checked(x, y) {
                        paint(p);
                    }
                }
            }
        }
    }
}

fn digits(text: &str, size: u32) -> Mask {
    let n = text.len() as u32;
    // 1桁 = 3列 + 桁間1列、高さ 5行 + 上下余白
    let scale = (size / (n * 4)).min(size / 6).max(1);
    let width = (n * 4 - 1) * scale;
    let height = 5 * scale;
    let mut mask = Mask::new(width.max(size), height.max(size));
    let left = (mask.width() - width) / 2;
    let top = (mask.height() - height) / 2;

    for (i, b) in text.bytes().enumerate() {
        let origin = left + i as u32 * 4 * scale;
        stamp(&mut mask, &DIGITS[(b - b'0') as usize], origin, top, scale, |p| p.0[0] = 0xff);
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::imageops::rotate180;

    fn at(mask: &Mask, x: u32, y: u32) -> u8 {
        mask.get_pixel(x, y).0[0]
    }

    #[test]
    fn test_rotate180_swaps_corners() {
        let mut mask = Mask::new(3, 2);
        mask.put_pixel(0, 0, Luma([9]));
        let rotated = rotate180(&mask);
        assert_eq!(at(&rotated, 2, 1), 9);
        assert_eq!(at(&rotated, 0, 0), 0);
        assert_eq!(rotate180(&rotated), mask);
    }

    #[test]
    fn test_piece_silhouette_points_up() {
        let mask = SilhouetteRasterizer.rasterize("歩", 32);
        assert_eq!(mask.dimensions(), (32, 32));
        // 上端の角は空、下端の辺は塗られる
        assert_eq!(at(&mask, 0, 0), 0);
        assert_eq!(at(&mask, 16, 29), 0xff);
        // 輪郭と文字の間は空
        assert_eq!(at(&mask, 16, 8), 0);
        // 成駒は地が塗られる
        assert_eq!(at(&SilhouetteRasterizer.rasterize("と", 32), 16, 8), 0xff);
    }

    #[test]
    fn test_every_kind_has_its_own_silhouette() {
        for size in [19, 24, 32] {
            let masks: Vec<Mask> = PieceKind::ALL
                .iter()
                .map(|k| SilhouetteRasterizer.rasterize(k.glyph(), size))
                .collect();
            for (i, a) in masks.iter().enumerate() {
                for (j, b) in masks.iter().enumerate().skip(i + 1) {
                    let (x, y) = (PieceKind::ALL[i], PieceKind::ALL[j]);
                    assert_ne!(a, b, "{x:?} vs {y:?} at {size}px");
                }
            }
        }
    }

    #[test]
    fn test_promoted_and_marker_are_filled() {
        let outline = coverage(&SilhouetteRasterizer.rasterize("銀", 32));
        let promoted = coverage(&SilhouetteRasterizer.rasterize("全", 32));
        let sente = coverage(&SilhouetteRasterizer.rasterize(SENTE_MARKER, 32));
        let gote = coverage(&SilhouetteRasterizer.rasterize(GOTE_MARKER, 32));
        // 文字の分だけ、成駒は塗りより少なく、生駒は輪郭より多い
        assert!(sente > promoted);
        assert!(promoted > outline);
        assert!(outline > gote);
    }

    #[test]
    fn test_digits_fit_requested_size() {
        let one = SilhouetteRasterizer.rasterize("7", 20);
        let two = SilhouetteRasterizer.rasterize("18", 20);
        assert_eq!(one.dimensions(), (20, 20));
        assert_eq!(two.dimensions(), (20, 20));
        assert!(coverage(&one) > 0);
        assert!(coverage(&two) > coverage(&one));
    }

    #[test]
    fn test_unknown_text_is_transparent() {
        assert_eq!(coverage(&SilhouetteRasterizer.rasterize("?", 8)), 0);
    }
}
