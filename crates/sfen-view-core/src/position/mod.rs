//! 局面（Position）
//!
//! SFEN から一度だけ組み立てられ、以後は不変。描画1回分の寿命しか持たない。

mod json;
mod sfen;

pub use json::{CellJson, HandJson, HandsJson, PieceJson, PositionJson};
pub use sfen::{SFEN_HIRATE, SfenError, SfenField, decode};

use crate::types::{Hand, Piece, Side};

/// 盤の筋・段の数
pub const BOARD_SIZE: usize = 9;

/// 盤面・手駒・手番
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    /// `board[row][column]`。row 0 = 1段目、column 0 = 9筋（左端）。
    board: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
    hands: [Hand; Side::NUM],
    turn: Side,
}

impl Position {
    /// 駒のない盤、空の手駒、先手番
    pub fn empty() -> Position {
        Position {
            board: [[None; BOARD_SIZE]; BOARD_SIZE],
            hands: [Hand::EMPTY; Side::NUM],
            turn: Side::Sente,
        }
    }

    /// 筋・段（どちらも1-9）で駒を引く。範囲外は None。
    pub fn piece_at(&self, file: usize, rank: usize) -> Option<Piece> {
        if !(1..=BOARD_SIZE).contains(&file) || !(1..=BOARD_SIZE).contains(&rank) {
            return None;
        }
        self.board[rank - 1][BOARD_SIZE - file]
    }

    /// 描画座標（row 0 = 1段目、column 0 = 9筋）で駒を引く
    #[inline]
    pub fn cell(&self, row: usize, column: usize) -> Option<Piece> {
        self.board[row][column]
    }

    #[inline]
    pub fn hand(&self, side: Side) -> &Hand {
        &self.hands[side.index()]
    }

    #[inline]
    pub fn turn(&self) -> Side {
        self.turn
    }

    /// 盤上の駒の数
    pub fn occupied_count(&self) -> usize {
        self.board.iter().flatten().filter(|sq| sq.is_some()).count()
    }

    /// 盤上の駒を (row, column, piece) で列挙（1段目から、各段は9筋から）
    pub fn pieces(&self) -> impl Iterator<Item = (usize, usize, Piece)> + '_ {
        self.board.iter().enumerate().flat_map(|(row, rank)| {
            rank.iter()
                .enumerate()
                .filter_map(move |(column, sq)| sq.map(|pc| (row, column, pc)))
        })
    }

    fn put(&mut self, row: usize, column: usize, piece: Piece) {
        self.board[row][column] = Some(piece);
    }

    fn hand_mut(&mut self, side: Side) -> &mut Hand {
        &mut self.hands[side.index()]
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::empty()
    }
}
