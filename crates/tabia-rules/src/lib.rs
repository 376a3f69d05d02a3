//! The tabia rules engine: an immutable chess game-state machine.
//!
//! The crate is built around three layers:
//! - [`Board`] - a plain 64-cell piece container with attack queries
//! - [`Position`] - a board plus side to move, castling rights,
//!   en-passant target, and move counters; convertible to and from FEN
//! - [`GameState`] - a position plus the full position history and move
//!   record needed for repetition detection and notation export
//!
//! [`GameState`] is a value: applying a move never mutates the input
//! state, it returns a fresh state (or an error, leaving the caller's
//! state untouched). This makes sharing states across threads safe
//! without locks and removes any need for defensive cloning.
//!
//! # Example
//!
//! ```
//! use tabia_rules::{GameOutcome, GameState};
//!
//! let start = GameState::new();
//! assert_eq!(start.legal_moves().len(), 20);
//!
//! let after = start.apply_san("e4").unwrap();
//! assert_eq!(start.legal_moves().len(), 20); // `start` is unchanged
//! assert_eq!(after.outcome(), GameOutcome::InProgress);
//! ```

mod apply;
mod board;
mod game;
mod movegen;
mod outcome;
mod position;
mod san;

pub use board::Board;
pub use game::{GameError, GameState, PlayedMove};
pub use movegen::legal_moves;
pub use outcome::GameOutcome;
pub use position::{CastlingRights, Position};
pub use san::{move_to_san, replay, san_to_move, SanError};
