//! 描画命令

use crate::types::PieceKind;

/// 8bit RGBA 色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const WHITE: Rgba = Rgba::opaque(0xff, 0xff, 0xff);
    /// 手番側の持ち駒欄に重ねる半透明の黄色
    pub const HIGHLIGHT: Rgba = Rgba { r: 0xff, g: 0xff, b: 0x00, a: 0x66 };

    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Rgba {
        Rgba { r, g, b, a: 0xff }
    }

    /// `#rrggbb`（不透明）または `#rrggbbaa`
    pub fn to_hex(self) -> String {
        if self.a == 0xff {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// ラスタ描画用の事前描画済み駒画像の参照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileRef {
    pub kind: PieceKind,
    pub rotated: bool,
}

/// 描画命令。奥から手前の順に並ぶ。
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingInstruction {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Rgba,
    },
    /// `(x, y)` は文字の見た目の中心。`rotated` なら中心まわりに180度回転。
    Glyph {
        text: String,
        x: f64,
        y: f64,
        font_size: f64,
        color: Rgba,
        rotated: bool,
    },
    FilledRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgba,
    },
    /// `(x, y)` はマスの左上、`size` はマスの一辺。タイルは `color` で着色する。
    Tile {
        image: TileRef,
        x: f64,
        y: f64,
        size: f64,
        color: Rgba,
    },
}
