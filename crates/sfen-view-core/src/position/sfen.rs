//! SFEN形式の解析・出力
//!
//! 構造の整形式だけを検査する。駒数・玉の有無・到達可能性は見ない。

use std::str::{Chars, SplitWhitespace};

use super::{BOARD_SIZE, Position};
use crate::types::{Piece, PieceKind, Side};

/// 平手初期局面のSFEN
pub const SFEN_HIRATE: &str = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";

/// SFEN のフィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SfenField {
    Board,
    Turn,
    Hands,
}

impl std::fmt::Display for SfenField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SfenField::Board => f.write_str("board"),
            SfenField::Turn => f.write_str("side to move"),
            SfenField::Hands => f.write_str("hands"),
        }
    }
}

/// SFENパースエラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SfenError {
    /// 必須フィールドが無い
    #[error("Missing {0} field")]
    MissingField(SfenField),
    /// 盤面の形式が不正
    #[error("Invalid board: {0}")]
    Board(String),
    /// 手番の形式が不正
    #[error("Invalid side to move: {0}")]
    SideToMove(String),
    /// 手駒の形式が不正
    #[error("Invalid hand: {0}")]
    Hand(String),
}

impl SfenError {
    /// どのフィールドで失敗したか
    pub fn field(&self) -> SfenField {
        match self {
            SfenError::MissingField(field) => *field,
            SfenError::Board(_) => SfenField::Board,
            SfenError::SideToMove(_) => SfenField::Turn,
            SfenError::Hand(_) => SfenField::Hands,
        }
    }
}

/// SFEN文字列を局面に変換する。4番目以降のフィールドは読まない。
pub fn decode(sfen: &str) -> Result<Position, SfenError> {
    let mut fields = FieldCursor::new(sfen);
    let mut pos = Position::empty();

    // 1. 盤面
    parse_board(&mut pos, fields.next(SfenField::Board)?)?;

    // 2. 手番
    let turn = fields.next(SfenField::Turn)?;
    pos.turn = parse_turn(turn)?;

    // 3. 手駒
    parse_hands(&mut pos, fields.next(SfenField::Hands)?)?;

    Ok(pos)
}

impl std::str::FromStr for Position {
    type Err = SfenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

impl Position {
    /// 現局面のSFEN文字列を取得（手数は常に1）
    pub fn to_sfen(&self) -> String {
        let mut result = String::new();

        // 1. 盤面
        for row in 0..BOARD_SIZE {
            let mut empty_count = 0;
            for column in 0..BOARD_SIZE {
                match self.cell(row, column) {
                    None => empty_count += 1,
                    Some(pc) => {
                        if empty_count > 0 {
                            result.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        result.push_str(&pc.sfen());
                    }
                }
            }
            if empty_count > 0 {
                result.push_str(&empty_count.to_string());
            }
            if row < BOARD_SIZE - 1 {
                result.push('/');
            }
        }

        // 2. 手番
        result.push(' ');
        result.push(self.turn.sfen_char());

        // 3. 手駒
        result.push(' ');
        let hand_str = self.hands_to_sfen();
        if hand_str.is_empty() {
            result.push('-');
        } else {
            result.push_str(&hand_str);
        }

        // 4. 手数
        result.push_str(" 1");
        result
    }

    /// 手駒をSFEN文字列に変換（先手→後手、飛角金銀桂香歩玉の順）
    fn hands_to_sfen(&self) -> String {
        const ORDER: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Bishop,
            PieceKind::Gold,
            PieceKind::Silver,
            PieceKind::Knight,
            PieceKind::Lance,
            PieceKind::Pawn,
            PieceKind::King,
        ];

        let mut result = String::new();
        for side in Side::ALL {
            for kind in ORDER {
                let cnt = self.hand(side).count(kind);
                if cnt == 0 {
                    continue;
                }
                if cnt > 1 {
                    result.push_str(&cnt.to_string());
                }
                result.push_str(&Piece::new(side, kind).sfen());
            }
        }
        result
    }
}

/// 空白区切りフィールドのカーソル
struct FieldCursor<'a> {
    fields: SplitWhitespace<'a>,
}

impl<'a> FieldCursor<'a> {
    fn new(sfen: &'a str) -> Self {
        FieldCursor { fields: sfen.split_whitespace() }
    }

    fn next(&mut self, field: SfenField) -> Result<&'a str, SfenError> {
        self.fields.next().ok_or(SfenError::MissingField(field))
    }
}

fn parse_turn(field: &str) -> Result<Side, SfenError> {
    let mut chars = field.chars();
    match (chars.next().and_then(Side::from_sfen_char), chars.next()) {
        (Some(side), None) => Ok(side),
        _ => Err(SfenError::SideToMove(format!("Expected 'b' or 'w', got '{field}'"))),
    }
}

/// 盤面部分をパース
fn parse_board(pos: &mut Position, board_str: &str) -> Result<(), SfenError> {
    let ranks: Vec<&str> = board_str.split('/').collect();
    if ranks.len() != BOARD_SIZE {
        return Err(SfenError::Board(format!(
            "Expected {BOARD_SIZE} ranks, got {}",
            ranks.len()
        )));
    }

    for (row, rank_str) in ranks.iter().enumerate() {
        parse_rank(pos, row, rank_str)?;
    }
    Ok(())
}

/// 1段分をパース。先頭文字が9筋（column 0）。
fn parse_rank(pos: &mut Position, row: usize, rank_str: &str) -> Result<(), SfenError> {
    let rank_no = row + 1;
    let mut chars = rank_str.chars();
    let mut column = 0usize;

    while let Some(c) = chars.next() {
        if let Some(digit) = c.to_digit(10) {
            if digit == 0 {
                return Err(SfenError::Board(format!("Zero skip in rank {rank_no}")));
            }
            column += digit as usize;
            if column > BOARD_SIZE {
                return Err(SfenError::Board(format!("Too many squares in rank {rank_no}")));
            }
            continue;
        }

        let piece = read_board_piece(c, &mut chars, rank_no)?;
        if column >= BOARD_SIZE {
            return Err(SfenError::Board(format!("Too many pieces in rank {rank_no}")));
        }
        pos.put(row, column, piece);
        column += 1;
    }

    if column != BOARD_SIZE {
        return Err(SfenError::Board(format!(
            "Rank {rank_no} has {column} squares, expected {BOARD_SIZE}"
        )));
    }
    Ok(())
}

/// 盤上の駒1つ（`+` 付きなら成駒）を読む
fn read_board_piece(
    c: char,
    chars: &mut Chars<'_>,
    rank_no: usize,
) -> Result<Piece, SfenError> {
    let (letter, promoted) = if c == '+' {
        match chars.next() {
            Some(next) if next.is_ascii_alphabetic() => (next, true),
            _ => {
                return Err(SfenError::Board(format!(
                    "'+' not followed by a piece in rank {rank_no}"
                )));
            }
        }
    } else {
        (c, false)
    };

    let base = PieceKind::from_sfen_letter(letter)
        .ok_or_else(|| SfenError::Board(format!("Unknown piece: {letter}")))?;
    let kind = if promoted {
        base.promote()
            .ok_or_else(|| SfenError::Board(format!("Cannot promote: {letter}")))?
    } else {
        base
    };

    Ok(Piece::new(side_of(letter), kind))
}

/// 手駒部分をパース
fn parse_hands(pos: &mut Position, hand_str: &str) -> Result<(), SfenError> {
    if hand_str == "-" {
        return Ok(());
    }

    let mut count: Option<u32> = None;
    for c in hand_str.chars() {
        if let Some(digit) = c.to_digit(10) {
            let next = count
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|n| n.checked_add(digit))
                .ok_or_else(|| SfenError::Hand(format!("Count overflow in '{hand_str}'")))?;
            if count.is_none() && digit == 0 {
                return Err(SfenError::Hand(format!("Count starts with zero in '{hand_str}'")));
            }
            count = Some(next);
            continue;
        }

        let kind = PieceKind::from_sfen_letter(c)
            .ok_or_else(|| SfenError::Hand(format!("Unknown hand piece: {c}")))?;
        pos.hand_mut(side_of(c)).add(kind, count.take().unwrap_or(1));
    }

    if let Some(n) = count {
        return Err(SfenError::Hand(format!("Count {n} without a piece in '{hand_str}'")));
    }
    Ok(())
}

#[inline]
fn side_of(letter: char) -> Side {
    if letter.is_ascii_uppercase() { Side::Sente } else { Side::Gote }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hirate() {
        let pos = decode(SFEN_HIRATE).unwrap();

        assert_eq!(pos.turn(), Side::Sente);
        assert_eq!(pos.occupied_count(), 40);
        assert!(pos.hand(Side::Sente).is_empty());
        assert!(pos.hand(Side::Gote).is_empty());

        // 先手の駒配置チェック
        assert_eq!(pos.piece_at(9, 9), Some(Piece::new(Side::Sente, PieceKind::Lance)));
        assert_eq!(pos.piece_at(5, 9), Some(Piece::new(Side::Sente, PieceKind::King)));
        assert_eq!(pos.piece_at(8, 8), Some(Piece::new(Side::Sente, PieceKind::Bishop)));
        assert_eq!(pos.piece_at(2, 8), Some(Piece::new(Side::Sente, PieceKind::Rook)));

        // 後手の駒配置チェック
        assert_eq!(pos.piece_at(2, 2), Some(Piece::new(Side::Gote, PieceKind::Bishop)));
        assert_eq!(pos.piece_at(8, 2), Some(Piece::new(Side::Gote, PieceKind::Rook)));
        assert_eq!(pos.piece_at(7, 3), Some(Piece::new(Side::Gote, PieceKind::Pawn)));
    }

    #[test]
    fn test_from_str_is_decode() {
        let parsed: Position = SFEN_HIRATE.parse().unwrap();
        assert_eq!(parsed, decode(SFEN_HIRATE).unwrap());
        assert!("9/9/9 b -".parse::<Position>().is_err());
    }

    #[test]
    fn test_sfen_roundtrip() {
        let test_cases = [
            SFEN_HIRATE,
            "8l/1l+R2P3/p2pBG1pp/kps1p4/Nn1P2G2/P1P1P2PP/1PS6/1KSG3+r1/LN2+p3L w Sbgn3p 1",
            "4k4/9/9/9/4+P4/9/9/9/4K4 b 2R2B4G4S4N4L18P 1",
        ];

        for sfen in test_cases {
            let pos = decode(sfen).unwrap();
            assert_eq!(pos.to_sfen(), sfen, "SFEN roundtrip failed for: {sfen}");
            assert_eq!(decode(&pos.to_sfen()).unwrap(), pos);
        }
    }

    #[test]
    fn test_hand_counts_and_sides() {
        let pos = decode("4k4/9/9/9/9/9/9/9/4K4 b 2Pp 1").unwrap();
        assert_eq!(pos.hand(Side::Sente).count(PieceKind::Pawn), 2);
        assert_eq!(pos.hand(Side::Gote).count(PieceKind::Pawn), 1);
    }

    #[test]
    fn test_explicit_count_of_one_is_accepted() {
        let pos = decode("9/9/9/9/9/9/9/9/9 w 1G10p 1").unwrap();
        assert_eq!(pos.hand(Side::Sente).count(PieceKind::Gold), 1);
        assert_eq!(pos.hand(Side::Gote).count(PieceKind::Pawn), 10);
        assert_eq!(pos.turn(), Side::Gote);
    }

    #[test]
    fn test_promoted_pieces() {
        let pos = decode("4k4/9/9/9/4+P4/9/9/9/4K+r3 b - 1").unwrap();
        assert_eq!(pos.piece_at(5, 5), Some(Piece::new(Side::Sente, PieceKind::ProPawn)));
        assert_eq!(pos.piece_at(4, 9), Some(Piece::new(Side::Gote, PieceKind::Dragon)));
    }

    #[test]
    fn test_trailing_fields_are_ignored() {
        let pos = decode(&format!("{SFEN_HIRATE} bar baz")).unwrap();
        assert_eq!(pos.occupied_count(), 40);
        assert!(decode("9/9/9/9/9/9/9/9/9 b -").is_ok());
    }

    #[test]
    fn test_rank_width_errors() {
        let short = "8/9/9/9/9/9/9/9/9 b - 1";
        let long = "9p/9/9/9/9/9/9/9/9 b - 1";
        let long_pieces = "lnsgkgsnll/9/9/9/9/9/9/9/9 b - 1";
        for sfen in [short, long, long_pieces] {
            assert!(matches!(decode(sfen), Err(SfenError::Board(_))), "{sfen}");
        }
    }

    #[test]
    fn test_board_character_errors() {
        for sfen in [
            "4x4/9/9/9/9/9/9/9/9 b - 1",
            "4+G4/9/9/9/9/9/9/9/9 b - 1",
            "4+4/9/9/9/9/9/9/9/9 b - 1",
            "8+/9/9/9/9/9/9/9/9 b - 1",
            "09/9/9/9/9/9/9/9/9 b - 1",
            "9/9/9/9/9/9/9/9 b - 1",
        ] {
            let err = decode(sfen).unwrap_err();
            assert_eq!(err.field(), SfenField::Board, "{sfen}: {err}");
        }
    }

    #[test]
    fn test_turn_errors() {
        for turn in ["x", "B", "bw", "-"] {
            let err = decode(&format!("9/9/9/9/9/9/9/9/9 {turn} - 1")).unwrap_err();
            assert!(matches!(err, SfenError::SideToMove(_)), "{turn}: {err}");
        }
    }

    #[test]
    fn test_hand_errors() {
        for hand in ["2", "P3", "x", "+P", "0P", "-P", "99999999999P"] {
            let err = decode(&format!("9/9/9/9/9/9/9/9/9 b {hand} 1")).unwrap_err();
            assert!(matches!(err, SfenError::Hand(_)), "{hand}: {err}");
        }
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(decode("").unwrap_err(), SfenError::MissingField(SfenField::Board));
        assert_eq!(
            decode("9/9/9/9/9/9/9/9/9").unwrap_err(),
            SfenError::MissingField(SfenField::Turn)
        );
        assert_eq!(
            decode("9/9/9/9/9/9/9/9/9 w").unwrap_err(),
            SfenError::MissingField(SfenField::Hands)
        );
    }

    #[test]
    fn test_from_str() {
        let pos: Position = SFEN_HIRATE.parse().unwrap();
        assert_eq!(pos.turn(), Side::Sente);
    }
}
