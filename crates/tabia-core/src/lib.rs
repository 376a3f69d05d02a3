//! Core value types for the tabia chess engine.
//!
//! This crate holds the vocabulary shared by every other crate in the
//! workspace:
//! - [`Color`] and [`PieceKind`] for piece identity
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] and [`MoveFlag`] for move encoding
//! - [`FenRecord`] for raw FEN parsing and validation
//!
//! Nothing in here knows the rules of chess; rule knowledge lives in
//! `tabia-rules`.

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, FenRecord};
pub use mov::{Move, MoveFlag};
pub use piece::PieceKind;
pub use square::{File, Rank, Square};
