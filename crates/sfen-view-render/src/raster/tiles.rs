//! 駒タイルのキャッシュ
//!
//! 14駒種 x 正立/倒立 の 28 枚を初回利用時に一度だけ作り、以後は読むだけ。
//! 複数スレッドから同時に初回利用されても構築は一度に限られる。

use image::imageops::rotate180;
use once_cell::sync::OnceCell;
use sfen_view_core::{PieceKind, TileRef};

use super::glyph::{GlyphRasterizer, Mask};

/// 駒タイルのキャッシュ。描画器が所有し、描画ごとに参照で渡す。
#[derive(Debug)]
pub struct TileCache {
    font_size: u32,
    tiles: OnceCell<Vec<Mask>>,
}

impl TileCache {
    pub fn new(font_size: u32) -> TileCache {
        TileCache { font_size: font_size.max(1), tiles: OnceCell::new() }
    }

    /// タイルを作る文字サイズ。マスの 3/4 に当たる。
    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    /// 構築済みか
    pub fn is_built(&self) -> bool {
        self.tiles.get().is_some()
    }

    /// タイルを引く。未構築なら `rasterizer` で全タイルを作る。
    pub fn get(&self, rasterizer: &dyn GlyphRasterizer, tile: TileRef) -> &Mask {
        let tiles = self.tiles.get_or_init(|| self.build(rasterizer));
        &tiles[Self::slot(tile)]
    }

    fn build(&self, rasterizer: &dyn GlyphRasterizer) -> Vec<Mask> {
        let mut tiles = Vec::with_capacity(PieceKind::NUM * 2);
        for kind in PieceKind::ALL {
            let upright = rasterizer.rasterize(kind.glyph(), self.font_size);
            let rotated = rotate180(&upright);
            tiles.push(upright);
            tiles.push(rotated);
        }
        log::debug!("built {} piece tiles at {}px", tiles.len(), self.font_size);
        tiles
    }

    #[inline]
    fn slot(tile: TileRef) -> usize {
        tile.kind.index() * 2 + usize::from(tile.rotated)
    }
}
