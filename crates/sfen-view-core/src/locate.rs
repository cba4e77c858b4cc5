//! 任意のテキストから SFEN らしき部分を探す
//!
//! 空白で区切ったトークンのうち、`/` で分けると9個になる最初のものを盤面とみなし、
//! そこから末尾までを空白1つで連結して返す。盤面の後ろにある無関係なトークンも
//! 含まれるが、デコーダは先頭3フィールドしか読まないので問題にならない。

use crate::position::BOARD_SIZE;

/// SFEN が見つからない
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LocateError {
    #[error("string contains no SFEN")]
    NotFound,
}

/// テキスト中の SFEN 候補を切り出す。
///
/// 連続する空白（タブ・改行を含む）は1つの区切りとして扱う。
/// 段の中身の妥当性は見ない。
pub fn locate(text: &str) -> Result<String, LocateError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let start = tokens
        .iter()
        .position(|token| is_board_token(token))
        .ok_or(LocateError::NotFound)?;

    let found = tokens[start..].join(" ");
    log::debug!("located SFEN candidate at token {start}: {found}");
    Ok(found)
}

/// `/` 区切りでちょうど9段になるトークンか
#[inline]
pub fn is_board_token(token: &str) -> bool {
    token.split('/').count() == BOARD_SIZE
}

/// ホバー位置の「単語」として SFEN に使われうる文字か
#[inline]
fn is_sfen_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '/' | '+' | '-')
}

/// `offset`（バイト位置）を含む、SFEN に使われうる文字だけからなる最大の区間を返す。
///
/// エディタのホバーで、カーソル下の「単語」を取り出すのと同じ切り出し方。
/// `offset` が範囲外・文字境界でない・対象外の文字の上にある場合は None。
pub fn sfen_run_at(text: &str, offset: usize) -> Option<&str> {
    let c = text.get(offset..)?.chars().next()?;
    if !is_sfen_char(c) {
        return None;
    }

    let start = text[..offset]
        .char_indices()
        .rev()
        .find(|&(_, c)| !is_sfen_char(c))
        .map_or(0, |(i, c)| i + c.len_utf8());
    let end = text[offset..]
        .char_indices()
        .find(|&(_, c)| !is_sfen_char(c))
        .map_or(text.len(), |(i, _)| offset + i);

    Some(&text[start..end])
}
