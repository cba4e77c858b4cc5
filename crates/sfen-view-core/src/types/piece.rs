//! 駒（Piece）: 駒種と所有者の組

use super::{PieceKind, Side};

/// 盤上の1マスを占める駒
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
}

impl Piece {
    #[inline]
    pub const fn new(side: Side, kind: PieceKind) -> Piece {
        Piece { kind, side }
    }

    /// SFEN 表記（先手は大文字、後手は小文字）
    pub fn sfen(self) -> String {
        let s = self.kind.sfen();
        match self.side {
            Side::Sente => s,
            Side::Gote => s.to_ascii_lowercase(),
        }
    }
}
