//! RGBA キャンバスへの描画
//!
//! 合成は `image` の source-over（[`Pixel::blend`]）に任せる。背景は透明。

use image::imageops::overlay;
use image::{Pixel, RgbaImage};
use sfen_view_core::Rgba;

use super::glyph::Mask;

#[inline]
pub(crate) fn to_pixel(color: Rgba) -> image::Rgba<u8> {
    image::Rgba([color.r, color.g, color.b, color.a])
}

fn blend(canvas: &mut RgbaImage, x: i64, y: i64, color: &image::Rgba<u8>) {
    let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
        return;
    };
    if let Some(p) = canvas.get_pixel_mut_checked(x, y) {
        p.blend(color);
    }
}

/// 1ピクセル幅の線（DDA）
pub fn line(canvas: &mut RgbaImage, (x1, y1): (f64, f64), (x2, y2): (f64, f64), color: Rgba) {
    let color = to_pixel(color);
    let steps = (x2 - x1).abs().max((y2 - y1).abs()).ceil().max(1.0) as i64;
    for step in 0..=steps {
        let t = step as f64 / steps as f64;
        let x = (x1 + (x2 - x1) * t).round() as i64;
        let y = (y1 + (y2 - y1) * t).round() as i64;
        blend(canvas, x, y, &color);
    }
}

pub fn fill_rect(canvas: &mut RgbaImage, x: f64, y: f64, width: f64, height: f64, color: Rgba) {
    let (x0, y0) = (x.round() as i64, y.round() as i64);
    let (x1, y1) = ((x + width).round() as i64, (y + height).round() as i64);
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    let rect = RgbaImage::from_pixel((x1 - x0) as u32, (y1 - y0) as u32, to_pixel(color));
    overlay(canvas, &rect, x0, y0);
}

/// マスクを `color` で着色し、中心が (cx, cy) になるよう合成
pub fn draw_mask(canvas: &mut RgbaImage, mask: &Mask, cx: f64, cy: f64, color: Rgba) {
    let left = (cx - f64::from(mask.width()) / 2.0).round() as i64;
    let top = (cy - f64::from(mask.height()) / 2.0).round() as i64;
    let tinted = RgbaImage::from_fn(mask.width(), mask.height(), |x, y| {
        let coverage = u16::from(mask.get_pixel(x, y).0[0]);
        let alpha = (u16::from(color.a) * coverage + 127) / 255;
        image::Rgba([color.r, color.g, color.b, alpha as u8])
    });
    overlay(canvas, &tinted, left, top);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn at(canvas: &RgbaImage, x: u32, y: u32) -> Rgba {
        let [r, g, b, a] = canvas.get_pixel(x, y).0;
        Rgba { r, g, b, a }
    }

    #[test]
    fn test_line_covers_both_endpoints() {
        let mut canvas = RgbaImage::new(10, 10);
        line(&mut canvas, (1.0, 9.0), (8.0, 9.0), Rgba::BLACK);
        assert_eq!(at(&canvas, 1, 9), Rgba::BLACK);
        assert_eq!(at(&canvas, 8, 9), Rgba::BLACK);
        assert_eq!(at(&canvas, 9, 9).a, 0);
    }

    #[test]
    fn test_translucent_rect_over_opaque() {
        let mut canvas = RgbaImage::new(4, 4);
        fill_rect(&mut canvas, 0.0, 0.0, 4.0, 4.0, Rgba::WHITE);
        fill_rect(&mut canvas, 0.0, 0.0, 2.0, 2.0, Rgba::HIGHLIGHT);

        let p = at(&canvas, 0, 0);
        assert_eq!(p.a, 0xff);
        assert!(p.r >= 0xfe && p.g >= 0xfe);
        assert!(p.b < 0xff && p.b > 0);
        assert_eq!(at(&canvas, 3, 3), Rgba::WHITE);
    }

    #[test]
    fn test_out_of_bounds_is_clipped() {
        let mut canvas = RgbaImage::new(2, 2);
        line(&mut canvas, (-5.0, -5.0), (5.0, 5.0), Rgba::BLACK);
        fill_rect(&mut canvas, -3.0, 1.0, 4.0, 9.0, Rgba::WHITE);
        assert_eq!(at(&canvas, 0, 0), Rgba::BLACK);
        assert_eq!(at(&canvas, 0, 1), Rgba::WHITE);
        assert_eq!(at(&canvas, 1, 1), Rgba::BLACK);
    }

    #[test]
    fn test_draw_mask_centers_and_tints() {
        let mask = Mask::from_pixel(2, 2, Luma([0xff]));
        let mut canvas = RgbaImage::new(6, 6);
        draw_mask(&mut canvas, &mask, 3.0, 3.0, Rgba::opaque(0x10, 0x20, 0x30));

        assert_eq!(at(&canvas, 2, 2), Rgba::opaque(0x10, 0x20, 0x30));
        assert_eq!(at(&canvas, 3, 3), Rgba::opaque(0x10, 0x20, 0x30));
        assert_eq!(at(&canvas, 1, 1).a, 0);
        assert_eq!(at(&canvas, 4, 4).a, 0);
    }
}
