//! 手番（Side）

use serde::{Deserialize, Serialize};

/// 手番（先手/後手）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Side {
    Sente = 0,
    Gote = 1,
}

impl Side {
    /// 手番の数
    pub const NUM: usize = 2;

    /// 全ての手番（先手、後手の順）
    pub const ALL: [Side; 2] = [Side::Sente, Side::Gote];

    /// 相手番を返す
    #[inline]
    pub const fn opponent(self) -> Side {
        match self {
            Side::Sente => Side::Gote,
            Side::Gote => Side::Sente,
        }
    }

    /// インデックスとして使用（配列アクセス用）
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// SFEN の手番文字（`b` / `w`）
    #[inline]
    pub const fn sfen_char(self) -> char {
        match self {
            Side::Sente => 'b',
            Side::Gote => 'w',
        }
    }

    /// SFEN の手番文字から変換
    #[inline]
    pub const fn from_sfen_char(c: char) -> Option<Side> {
        match c {
            'b' => Some(Side::Sente),
            'w' => Some(Side::Gote),
            _ => None,
        }
    }

    /// 盤面描画で駒を180度回転させるか。
    ///
    /// 先手の駒は常に正立、後手の駒は常に倒立。手番には依存しない。
    #[inline]
    pub const fn is_rotated(self) -> bool {
        matches!(self, Side::Gote)
    }
}

impl std::ops::Not for Side {
    type Output = Side;

    #[inline]
    fn not(self) -> Side {
        self.opponent()
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Sente => f.write_str("sente"),
            Side::Gote => f.write_str("gote"),
        }
    }
}
