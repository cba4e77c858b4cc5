//! 手駒（Hand）

use super::PieceKind;

/// 手駒
///
/// 生駒8種（玉を含む）の枚数を持つ。枚数の上限はこの層では設けない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hand([u32; 8]);

impl Hand {
    /// 空の手駒
    pub const EMPTY: Hand = Hand([0; 8]);

    /// 指定駒種の枚数を取得（成駒は常に0）
    #[inline]
    pub fn count(&self, kind: PieceKind) -> u32 {
        if kind.is_promoted() {
            return 0;
        }
        self.0[kind.index()]
    }

    /// 指定枚数を加える。成駒は生駒として数える。
    #[inline]
    pub fn add(&mut self, kind: PieceKind, count: u32) {
        let slot = &mut self.0[kind.unpromote().index()];
        *slot = slot.saturating_add(count);
    }

    /// 指定枚数をセット
    #[inline]
    pub fn set(&mut self, kind: PieceKind, count: u32) {
        self.0[kind.unpromote().index()] = count;
    }

    /// 空かどうか
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&c| c == 0)
    }

    /// 合計枚数
    pub fn total(&self) -> u64 {
        self.0.iter().map(|&c| u64::from(c)).sum()
    }

    /// 1枚以上ある駒種を表示順（歩香桂銀金角飛玉）で列挙
    pub fn iter(&self) -> impl Iterator<Item = (PieceKind, u32)> + '_ {
        PieceKind::HAND_ORDER
            .iter()
            .map(|&kind| (kind, self.0[kind.index()]))
            .filter(|&(_, count)| count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_add_and_count() {
        let mut hand = Hand::EMPTY;
        assert!(hand.is_empty());

        hand.add(PieceKind::Pawn, 2);
        hand.add(PieceKind::Pawn, 1);
        hand.add(PieceKind::Rook, 1);

        assert_eq!(hand.count(PieceKind::Pawn), 3);
        assert_eq!(hand.count(PieceKind::Rook), 1);
        assert_eq!(hand.count(PieceKind::Gold), 0);
        assert_eq!(hand.total(), 4);
        assert!(!hand.is_empty());
    }

    #[test]
    fn test_promoted_kinds_fold_into_base() {
        let mut hand = Hand::EMPTY;
        hand.add(PieceKind::Dragon, 1);
        assert_eq!(hand.count(PieceKind::Rook), 1);
        assert_eq!(hand.count(PieceKind::Dragon), 0);
    }

    #[test]
    fn test_iter_uses_hand_order() {
        let mut hand = Hand::EMPTY;
        hand.set(PieceKind::Rook, 1);
        hand.set(PieceKind::Pawn, 18);
        hand.set(PieceKind::Gold, 2);

        let items: Vec<_> = hand.iter().collect();
        assert_eq!(
            items,
            vec![(PieceKind::Pawn, 18), (PieceKind::Gold, 2), (PieceKind::Rook, 1)]
        );
    }
}
