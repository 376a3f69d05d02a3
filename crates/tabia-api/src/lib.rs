//! Host-facing adapter over the tabia rules engine.
//!
//! Embedding applications (UIs, servers, foreign-function bridges)
//! rarely want `Move` values and typed errors; they want strings,
//! lists, and a success/failure pair they can map onto their own
//! result types. This crate reshapes [`GameState`] into exactly that
//! surface:
//!
//! ```
//! use tabia_api as api;
//!
//! let game = api::new_game();
//! assert_eq!(api::side_to_move(&game), "white");
//! assert_eq!(api::legal_moves(&game).len(), 20);
//!
//! let game = api::apply_move(&game, "e4").expect("e4 is legal");
//! assert_eq!(api::side_to_move(&game), "black");
//! assert!(api::apply_move(&game, "Ke2").is_err());
//! ```
//!
//! States stay immutable values: `apply_move` hands back a new game on
//! success and leaves the input untouched on failure, so a host can
//! keep its last good state without defensive copies.

use serde::{Deserialize, Serialize};
use tabia_core::{Color, File, Rank, Square};
use tabia_rules::{move_to_san, GameOutcome, GameState};

/// Starts a game from the standard initial position.
pub fn new_game() -> GameState {
    GameState::new()
}

/// Every legal move as SAN, in the engine's deterministic order.
pub fn legal_moves(state: &GameState) -> Vec<String> {
    state
        .legal_moves()
        .into_iter()
        .map(|m| move_to_san(state.position(), m))
        .collect()
}

/// Applies a move given as SAN ("Nf3") or long algebraic ("g1f3").
///
/// On failure the error is a human-readable reason and `state` is
/// unchanged.
pub fn apply_move(state: &GameState, move_text: &str) -> Result<GameState, String> {
    state.apply_text(move_text).map_err(|e| e.to_string())
}

/// Whether the game has ended.
pub fn is_game_over(state: &GameState) -> bool {
    state.is_game_over()
}

/// The current position as FEN.
pub fn to_fen(state: &GameState) -> String {
    state.to_fen()
}

/// The 64 squares in row-major order from rank 8 down to rank 1, file
/// a to h: `""` for an empty square, otherwise a two-character code of
/// color letter and piece letter ("wp", "bk", ...).
pub fn board_squares(state: &GameState) -> Vec<String> {
    let mut cells = Vec::with_capacity(64);
    for rank in Rank::ALL.iter().rev() {
        for file in File::ALL {
            let cell = match state.position().board.piece_at(Square::new(file, *rank)) {
                Some((color, kind)) => {
                    let side = match color {
                        Color::White => 'w',
                        Color::Black => 'b',
                    };
                    format!("{}{}", side, kind.letter())
                }
                None => String::new(),
            };
            cells.push(cell);
        }
    }
    cells
}

/// Source and destination squares of the most recent move, in
/// algebraic notation. `None` before the first move.
pub fn last_move(state: &GameState) -> Option<(String, String)> {
    state
        .last_move()
        .map(|(from, to)| (from.to_algebraic(), to.to_algebraic()))
}

/// The game's end condition as a stable label.
pub fn end_condition(state: &GameState) -> &'static str {
    match state.outcome() {
        GameOutcome::InProgress => "none",
        GameOutcome::Checkmate(_) => "checkmate",
        GameOutcome::Stalemate => "draw-stalemate",
        GameOutcome::DrawFiftyMove => "draw-fifty-move-rule",
        GameOutcome::DrawInsufficientMaterial => "draw-insufficient-material",
        GameOutcome::DrawThreefoldRepetition => "draw-threefold-repetition",
    }
}

/// "white" or "black".
pub fn side_to_move(state: &GameState) -> &'static str {
    match state.position().side_to_move {
        Color::White => "white",
        Color::Black => "black",
    }
}

/// A self-contained, serializable view of a game, for hosts that
/// exchange state as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub fen: String,
    pub squares: Vec<String>,
    pub side_to_move: String,
    pub end_condition: String,
    pub last_move: Option<(String, String)>,
}

impl GameSnapshot {
    /// Captures the observable surface of a game state.
    pub fn capture(state: &GameState) -> Self {
        GameSnapshot {
            fen: to_fen(state),
            squares: board_squares(state),
            side_to_move: side_to_move(state).to_string(),
            end_condition: end_condition(state).to_string(),
            last_move: last_move(state),
        }
    }
}
