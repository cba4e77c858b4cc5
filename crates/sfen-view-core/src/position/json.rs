use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{BOARD_SIZE, Position};
use crate::types::Side;

/// 駒のJSON表現
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PieceJson {
    pub owner: Side,
    /// "K" | "R" | "B" | "G" | "S" | "N" | "L" | "P"
    #[serde(rename = "type")]
    pub piece_type: String,
    /// 成駒かどうか
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub promoted: bool,
    /// 表示文字
    pub glyph: String,
}

/// 盤面の1マス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellJson {
    /// "9a" ~ "1i" 形式
    pub square: String,
    /// 駒（存在しない場合はnull）
    pub piece: Option<PieceJson>,
}

/// 持ち駒（SFEN 文字 -> 枚数）
pub type HandJson = BTreeMap<String, u32>;

/// 両者の持ち駒
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandsJson {
    pub sente: HandJson,
    pub gote: HandJson,
}

/// 局面全体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PositionJson {
    /// 9x9のセル配列（外側:1段〜9段、内側:9筋〜1筋）
    pub cells: Vec<Vec<CellJson>>,
    pub hands: HandsJson,
    pub turn: Side,
    /// 正規化したSFEN
    pub sfen: String,
}

impl Position {
    /// JSON 出力用の表現に変換
    pub fn to_json(&self) -> PositionJson {
        let cells = (0..BOARD_SIZE)
            .map(|row| {
                (0..BOARD_SIZE)
                    .map(|column| CellJson {
                        square: square_name(row, column),
                        piece: self.cell(row, column).map(|pc| PieceJson {
                            owner: pc.side,
                            piece_type: pc.kind.unpromote().sfen(),
                            promoted: pc.kind.is_promoted(),
                            glyph: pc.kind.glyph().to_string(),
                        }),
                    })
                    .collect()
            })
            .collect();

        PositionJson {
            cells,
            hands: HandsJson {
                sente: hand_json(self, Side::Sente),
                gote: hand_json(self, Side::Gote),
            },
            turn: self.turn(),
            sfen: self.to_sfen(),
        }
    }
}

fn hand_json(pos: &Position, side: Side) -> HandJson {
    pos.hand(side)
        .iter()
        .map(|(kind, count)| (kind.sfen(), count))
        .collect()
}

/// USI のマス表記（"7g" 等）
fn square_name(row: usize, column: usize) -> String {
    let file = BOARD_SIZE - column;
    let rank = (b'a' + row as u8) as char;
    format!("{file}{rank}")
}
