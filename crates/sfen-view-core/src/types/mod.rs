//! 局面を構成する基本型

mod hand;
mod piece;
mod piece_kind;
mod side;

pub use hand::Hand;
pub use piece::Piece;
pub use piece_kind::PieceKind;
pub use side::Side;
