//! SFEN 局面図プレビューのコア
//!
//! テキスト → [`locate`] → SFEN → [`decode`] → [`Position`] → [`layout`] → 描画命令
//!
//! 描画命令をバイト列にするのは `sfen-view-render` 側の仕事。

pub mod layout;
pub mod locate;
pub mod position;
pub mod types;

pub use layout::{Diagram, DrawingInstruction, LayoutOptions, PieceStyle, Rgba, TileRef, layout};
pub use locate::{LocateError, locate, sfen_run_at};
pub use position::{Position, SFEN_HIRATE, SfenError, SfenField, decode};
pub use types::{Hand, Piece, PieceKind, Side};
