//! 駒種（PieceKind）

use serde::{Deserialize, Serialize};

/// 駒種（先後の区別なし）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PieceKind {
    // 生駒
    Pawn = 0,
    Lance = 1,
    Knight = 2,
    Silver = 3,
    Gold = 4,
    Bishop = 5,
    Rook = 6,
    King = 7,
    // 成駒
    ProPawn = 8,
    ProLance = 9,
    ProKnight = 10,
    ProSilver = 11,
    Horse = 12,  // 成角
    Dragon = 13, // 成飛
}

/// 駒種ごとの表示文字。`PieceKind as usize` で引く。
const GLYPHS: [&str; PieceKind::NUM] = [
    "歩", "香", "桂", "銀", "金", "角", "飛", "玉", "と", "杏", "圭", "全", "馬", "龍",
];

/// 駒種ごとの SFEN 文字（先手・大文字）
const SFEN_LETTERS: [char; 8] = ['P', 'L', 'N', 'S', 'G', 'B', 'R', 'K'];

impl PieceKind {
    /// 駒種の数
    pub const NUM: usize = 14;

    /// 全ての駒種
    pub const ALL: [PieceKind; 14] = [
        PieceKind::Pawn,
        PieceKind::Lance,
        PieceKind::Knight,
        PieceKind::Silver,
        PieceKind::Gold,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::King,
        PieceKind::ProPawn,
        PieceKind::ProLance,
        PieceKind::ProKnight,
        PieceKind::ProSilver,
        PieceKind::Horse,
        PieceKind::Dragon,
    ];

    /// 持ち駒の表示順（歩香桂銀金角飛玉）
    pub const HAND_ORDER: [PieceKind; 8] = [
        PieceKind::Pawn,
        PieceKind::Lance,
        PieceKind::Knight,
        PieceKind::Silver,
        PieceKind::Gold,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::King,
    ];

    /// 表示用の漢字一文字
    #[inline]
    pub const fn glyph(self) -> &'static str {
        GLYPHS[self as usize]
    }

    /// 成駒を返す（成れない場合はNone）
    #[inline]
    pub const fn promote(self) -> Option<PieceKind> {
        match self {
            PieceKind::Pawn => Some(PieceKind::ProPawn),
            PieceKind::Lance => Some(PieceKind::ProLance),
            PieceKind::Knight => Some(PieceKind::ProKnight),
            PieceKind::Silver => Some(PieceKind::ProSilver),
            PieceKind::Bishop => Some(PieceKind::Horse),
            PieceKind::Rook => Some(PieceKind::Dragon),
            _ => None,
        }
    }

    /// 生駒を返す（既に生駒の場合はそのまま）
    #[inline]
    pub const fn unpromote(self) -> PieceKind {
        match self {
            PieceKind::ProPawn => PieceKind::Pawn,
            PieceKind::ProLance => PieceKind::Lance,
            PieceKind::ProKnight => PieceKind::Knight,
            PieceKind::ProSilver => PieceKind::Silver,
            PieceKind::Horse => PieceKind::Bishop,
            PieceKind::Dragon => PieceKind::Rook,
            _ => self,
        }
    }

    /// 成駒かどうか
    #[inline]
    pub const fn is_promoted(self) -> bool {
        self as u8 >= PieceKind::ProPawn as u8
    }

    /// インデックス（0-13）
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 生駒の SFEN 文字（大文字）から変換
    pub fn from_sfen_letter(c: char) -> Option<PieceKind> {
        let upper = c.to_ascii_uppercase();
        SFEN_LETTERS
            .iter()
            .position(|&l| l == upper)
            .map(|i| PieceKind::HAND_ORDER[i])
    }

    /// SFEN 表記（先手・大文字）。成駒は `+` 付き。
    pub fn sfen(self) -> String {
        let base = SFEN_LETTERS[self.unpromote() as usize];
        if self.is_promoted() {
            format!("+{base}")
        } else {
            base.to_string()
        }
    }
}
