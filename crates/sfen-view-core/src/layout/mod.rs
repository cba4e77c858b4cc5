//! 局面図のレイアウト
//!
//! 局面と描画設定から描画命令列を作る純粋関数。寸法はすべてマスの一辺 `C` に比例する。
//!
//! ```text
//!  x: 0      C                         10C      11C+4
//!     +------+-------------------------+--------+
//!     | ☖    |                         | ☗      |
//!     | 後手 |        9x9 の盤          | 先手   |
//!     | 持駒 |                         | 持駒   |
//!     +------+-------------------------+--------+
//! ```

mod instruction;

pub use instruction::{DrawingInstruction, Rgba, TileRef};

use crate::position::{BOARD_SIZE, Position};
use crate::types::Side;

/// 先手の持ち駒欄の印
pub const SENTE_MARKER: &str = "☗";
/// 後手の持ち駒欄の印
pub const GOTE_MARKER: &str = "☖";

/// 盤上の駒の描き方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PieceStyle {
    /// 文字として描く（SVG 向け）
    #[default]
    Text,
    /// 事前描画済みの駒画像を貼る（ラスタ向け）
    Tile,
}

/// レイアウト設定
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// マスの一辺。他の寸法はすべてここから導く。
    pub cell_size: f64,
    /// 盤上の駒の文字サイズ
    pub font_size: f64,
    pub text_color: Rgba,
    pub piece_style: PieceStyle,
}

impl LayoutOptions {
    /// マスの一辺から。文字サイズは `0.75 * cell_size`。
    pub fn new(cell_size: f64) -> LayoutOptions {
        LayoutOptions {
            cell_size,
            font_size: cell_size * 0.75,
            text_color: Rgba::BLACK,
            piece_style: PieceStyle::Text,
        }
    }

    /// 文字サイズから。マスの一辺は `font_size * 4 / 3`。
    pub fn from_font_size(font_size: f64) -> LayoutOptions {
        LayoutOptions::new(font_size * 4.0 / 3.0)
    }

    pub fn with_text_color(mut self, color: Rgba) -> LayoutOptions {
        self.text_color = color;
        self
    }

    pub fn with_piece_style(mut self, style: PieceStyle) -> LayoutOptions {
        self.piece_style = style;
        self
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions::from_font_size(24.0)
    }
}

/// レイアウト結果
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    pub width: f64,
    pub height: f64,
    /// 持ち駒が既定の高さに収まらず、縦に伸ばしたか
    pub tall: bool,
    pub instructions: Vec<DrawingInstruction>,
}

/// `C` から導かれる寸法
#[derive(Debug, Clone, Copy)]
pub struct Geometry {
    pub cell: f64,
    /// 持ち駒1行の高さ（0.75C）
    pub hand_row: f64,
    /// 持ち駒の文字サイズ（0.6C）
    pub hand_font: f64,
    pub width: f64,
    pub default_height: f64,
}

impl Geometry {
    /// 手番表示の矩形が印の行より下に伸びる量
    const HIGHLIGHT_OVERHANG: f64 = 4.0;

    pub fn new(cell: f64) -> Geometry {
        Geometry {
            cell,
            hand_row: cell * 0.75,
            hand_font: cell * 0.6,
            width: cell * 11.0 + 4.0,
            default_height: cell * 9.0 + 1.0,
        }
    }

    /// 盤の左端（持ち駒欄1列分の余白）
    #[inline]
    pub fn board_left(&self) -> f64 {
        self.cell
    }

    /// 盤上 (row, column) のマスの左上
    #[inline]
    pub fn cell_origin(&self, row: usize, column: usize) -> (f64, f64) {
        (self.board_left() + column as f64 * self.cell, row as f64 * self.cell)
    }

    /// 持ち駒欄の中心 x。先手は右、後手は左。
    pub fn hand_center_x(&self, side: Side) -> f64 {
        let nudge = self.cell / 8.0;
        match side {
            Side::Sente => self.cell * 10.0 + self.cell / 2.0 + nudge,
            Side::Gote => self.cell / 2.0 - nudge,
        }
    }

    /// 印の行の高さ（手番表示の矩形の高さ）
    #[inline]
    pub fn marker_height(&self) -> f64 {
        self.hand_row + Self::HIGHLIGHT_OVERHANG
    }

    /// 持ち駒 k 行目（0始まり）の中心 y
    #[inline]
    pub fn hand_row_center_y(&self, k: usize) -> f64 {
        self.marker_height() + k as f64 * self.hand_row + self.hand_row / 2.0
    }

    /// 持ち駒 n 行を積んだときに必要な高さ（末尾に1行分の余白）
    #[inline]
    pub fn hand_extent(&self, rows: usize) -> f64 {
        self.marker_height() + (rows + 1) as f64 * self.hand_row
    }

    /// 既定の高さに収まる持ち駒の行数
    pub fn rows_fitting_default(&self) -> usize {
        let free = self.default_height - self.marker_height() - self.hand_row;
        (free / self.hand_row).floor().max(0.0) as usize
    }
}

/// 局面を描画命令列に変換する。
///
/// 出力順は 罫線 → 手番の強調矩形 → 盤上の駒 → 持ち駒欄の印 → 持ち駒。
/// 同じ入力に対して常に同じ命令列を返す。
pub fn layout(position: &Position, options: &LayoutOptions) -> Diagram {
    let geo = Geometry::new(options.cell_size);
    let color = options.text_color;
    let mut out = Vec::with_capacity(2 * (BOARD_SIZE + 1) + 1 + 40 + 2 + 16);

    // 罫線
    let board_right = geo.board_left() + BOARD_SIZE as f64 * geo.cell;
    let board_bottom = BOARD_SIZE as f64 * geo.cell;
    for i in 0..=BOARD_SIZE {
        let offset = i as f64 * geo.cell;
        out.push(DrawingInstruction::Line {
            x1: geo.board_left(),
            y1: offset,
            x2: board_right,
            y2: offset,
            color,
        });
        out.push(DrawingInstruction::Line {
            x1: geo.board_left() + offset,
            y1: 0.0,
            x2: geo.board_left() + offset,
            y2: board_bottom,
            color,
        });
    }

    // 手番側の持ち駒欄を強調
    let turn = position.turn();
    out.push(DrawingInstruction::FilledRect {
        x: geo.hand_center_x(turn) - geo.hand_row / 2.0,
        y: 0.0,
        width: geo.hand_row,
        height: geo.marker_height(),
        color: Rgba::HIGHLIGHT,
    });

    // 盤上の駒
    for (row, column, piece) in position.pieces() {
        let (left, top) = geo.cell_origin(row, column);
        let rotated = piece.side.is_rotated();
        out.push(match options.piece_style {
            PieceStyle::Text => DrawingInstruction::Glyph {
                text: piece.kind.glyph().to_string(),
                x: left + geo.cell / 2.0,
                y: top + geo.cell / 2.0,
                font_size: options.font_size,
                color,
                rotated,
            },
            PieceStyle::Tile => DrawingInstruction::Tile {
                image: TileRef { kind: piece.kind, rotated },
                x: left,
                y: top,
                size: geo.cell,
                color,
            },
        });
    }

    // 持ち駒欄の印（後手・先手）
    for (side, marker) in [(Side::Gote, GOTE_MARKER), (Side::Sente, SENTE_MARKER)] {
        out.push(DrawingInstruction::Glyph {
            text: marker.to_string(),
            x: geo.hand_center_x(side),
            y: geo.marker_height() / 2.0,
            font_size: geo.hand_row,
            color,
            rotated: false,
        });
    }

    // 持ち駒: 駒種ごとに文字1つ、2枚以上なら枚数をその下に
    let mut height = geo.default_height;
    for side in Side::ALL {
        let x = geo.hand_center_x(side);
        let mut rows = 0usize;
        for (kind, count) in position.hand(side).iter() {
            let mut texts = vec![kind.glyph().to_string()];
            if count > 1 {
                texts.push(count.to_string());
            }
            for text in texts {
                out.push(DrawingInstruction::Glyph {
                    text,
                    x,
                    y: geo.hand_row_center_y(rows),
                    font_size: geo.hand_font,
                    color,
                    rotated: false,
                });
                rows += 1;
            }
        }
        if rows > geo.rows_fitting_default() {
            height = height.max(geo.hand_extent(rows));
        }
    }

    let tall = height > geo.default_height;
    log::trace!(
        "layout: {} instructions, {}x{}{}",
        out.len(),
        geo.width,
        height,
        if tall { " (tall)" } else { "" }
    );

    Diagram { width: geo.width, height, tall, instructions: out }
}
