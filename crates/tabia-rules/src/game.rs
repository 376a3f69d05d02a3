//! Immutable game state with history.

use crate::apply::apply_unchecked;
use crate::movegen::legal_moves;
use crate::outcome::{classify, GameOutcome};
use crate::san::{move_to_san, san_to_move, SanError};
use crate::Position;
use tabia_core::{FenError, Move, Square};
use thiserror::Error;

/// Errors from operations on a [`GameState`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    /// The move is not legal in the current position.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// The move text could not be resolved.
    #[error(transparent)]
    Notation(#[from] SanError),

    /// A FEN string could not be parsed.
    #[error(transparent)]
    Fen(#[from] FenError),
}

/// One entry of the move record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayedMove {
    /// The move in internal encoding.
    pub mov: Move,
    /// Its SAN text in the position it was played from.
    pub san: String,
}

/// A chess game as an immutable value.
///
/// A `GameState` owns its current [`Position`], every position the
/// game has visited (for repetition detection), and the move record
/// (for notation export). Applying a move builds a new `GameState`;
/// the old one stays valid and unchanged, so rejected moves cost the
/// caller nothing and accepted moves never invalidate earlier
/// snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    position: Position,
    history: Vec<Position>,
    record: Vec<PlayedMove>,
}

impl GameState {
    /// A fresh game from the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::startpos())
    }

    /// A game starting from an arbitrary position.
    pub fn from_position(position: Position) -> Self {
        GameState {
            history: vec![position.clone()],
            record: Vec::new(),
            position,
        }
    }

    /// A game starting from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    /// The current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Every legal move, ordered by source square, destination square,
    /// and flag.
    pub fn legal_moves(&self) -> Vec<Move> {
        legal_moves(&self.position)
    }

    /// Whether the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.position.in_check()
    }

    /// Applies a move, returning the successor state.
    ///
    /// Fails with [`GameError::IllegalMove`] when the move is not in
    /// [`legal_moves`](Self::legal_moves); `self` is untouched either
    /// way.
    pub fn apply(&self, m: Move) -> Result<GameState, GameError> {
        if !self.legal_moves().contains(&m) {
            return Err(GameError::IllegalMove(format!(
                "{} is not legal in {}",
                m.to_long_algebraic(),
                self.position.to_fen()
            )));
        }
        Ok(self.apply_legal(m))
    }

    /// Applies a move given in SAN.
    pub fn apply_san(&self, san: &str) -> Result<GameState, GameError> {
        let m = san_to_move(&self.position, san)?;
        Ok(self.apply_legal(m))
    }

    /// Applies a move given as SAN or long algebraic text.
    ///
    /// SAN is tried first; if the text instead parses as long
    /// algebraic ("e2e4", "e7e8q") it is matched against the legal
    /// moves to recover the full encoding.
    pub fn apply_text(&self, text: &str) -> Result<GameState, GameError> {
        match san_to_move(&self.position, text) {
            Ok(m) => Ok(self.apply_legal(m)),
            Err(san_err) => {
                if let Some(wanted) = Move::from_long_algebraic(text.trim()) {
                    let found = self.legal_moves().into_iter().find(|legal| {
                        legal.from() == wanted.from()
                            && legal.to() == wanted.to()
                            && legal.flag().promotion() == wanted.flag().promotion()
                    });
                    if let Some(legal) = found {
                        return Ok(self.apply_legal(legal));
                    }
                    return Err(GameError::IllegalMove(format!(
                        "{} is not legal in {}",
                        text.trim(),
                        self.position.to_fen()
                    )));
                }
                Err(san_err.into())
            }
        }
    }

    fn apply_legal(&self, m: Move) -> GameState {
        let san = move_to_san(&self.position, m);
        let position = apply_unchecked(&self.position, m);

        let mut history = self.history.clone();
        history.push(position.clone());
        let mut record = self.record.clone();
        record.push(PlayedMove { mov: m, san });

        GameState {
            position,
            history,
            record,
        }
    }

    /// Classifies the game, lazily, from the current state.
    pub fn outcome(&self) -> GameOutcome {
        classify(&self.position, self.repetition_count())
    }

    /// Whether the game has ended.
    pub fn is_game_over(&self) -> bool {
        self.outcome().is_over()
    }

    /// How often the current placement has occurred, counting the
    /// current occurrence.
    pub fn repetition_count(&self) -> usize {
        self.history
            .iter()
            .filter(|p| p.same_placement(&self.position))
            .count()
    }

    /// Source and destination of the most recent move.
    pub fn last_move(&self) -> Option<(Square, Square)> {
        self.record.last().map(|p| (p.mov.from(), p.mov.to()))
    }

    /// The move record, oldest first.
    pub fn moves_played(&self) -> &[PlayedMove] {
        &self.record
    }

    /// Number of halfmoves played since the starting position.
    pub fn ply_count(&self) -> usize {
        self.record.len()
    }

    /// The current position as FEN.
    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabia_core::{Color, FenRecord};

    fn play(state: &GameState, sans: &[&str]) -> GameState {
        let mut cur = state.clone();
        for san in sans {
            cur = cur.apply_san(san).unwrap();
        }
        cur
    }

    #[test]
    fn new_game() {
        let game = GameState::new();
        assert_eq!(game.to_fen(), FenRecord::STARTPOS);
        assert_eq!(game.ply_count(), 0);
        assert_eq!(game.last_move(), None);
        assert!(!game.is_check());
        assert!(!game.is_game_over());
        assert_eq!(game.outcome(), GameOutcome::InProgress);
    }

    #[test]
    fn apply_produces_new_state_and_keeps_old() {
        let start = GameState::new();
        let m = start.legal_moves()[0];
        let next = start.apply(m).unwrap();

        assert_eq!(start.to_fen(), FenRecord::STARTPOS);
        assert_eq!(start.ply_count(), 0);
        assert_eq!(next.ply_count(), 1);
        assert_ne!(
            next.position().side_to_move,
            start.position().side_to_move
        );
    }

    #[test]
    fn every_legal_move_applies() {
        let start = GameState::new();
        for m in start.legal_moves() {
            let next = start.apply(m).unwrap();
            assert_eq!(next.position().side_to_move, Color::Black);
        }
    }

    #[test]
    fn illegal_move_is_rejected_without_side_effects() {
        let start = GameState::new();
        let bogus = Move::normal(Square::E1, Square::E8);
        let err = start.apply(bogus).unwrap_err();
        assert!(matches!(err, GameError::IllegalMove(_)));
        assert_eq!(start.to_fen(), FenRecord::STARTPOS);

        let err = start.apply_text("e2e5").unwrap_err();
        assert!(matches!(err, GameError::IllegalMove(_)));
        assert_eq!(start.to_fen(), FenRecord::STARTPOS);
    }

    #[test]
    fn last_move_tracks_record() {
        let game = play(&GameState::new(), &["e4", "e5", "Nf3"]);
        let (from, to) = game.last_move().unwrap();
        assert_eq!(from.to_algebraic(), "g1");
        assert_eq!(to.to_algebraic(), "f3");
        assert_eq!(game.moves_played()[0].san, "e4");
        assert_eq!(game.moves_played()[1].san, "e5");
    }

    #[test]
    fn scholars_mate_is_checkmate() {
        let game = play(
            &GameState::new(),
            &["e4", "e5", "Qh5", "Nc6", "Bc4", "Nf6", "Qxf7#"],
        );
        assert_eq!(game.outcome(), GameOutcome::Checkmate(Color::White));
        assert!(game.is_game_over());
        assert_eq!(game.position().side_to_move, Color::Black);
        assert!(game.legal_moves().is_empty());
        assert!(game.is_check());
        assert_eq!(game.moves_played().last().unwrap().san, "Qxf7#");
    }

    #[test]
    fn fools_mate_is_checkmate_for_black() {
        let game = play(&GameState::new(), &["f3", "e5", "g4", "Qh4#"]);
        assert_eq!(game.outcome(), GameOutcome::Checkmate(Color::Black));
    }

    #[test]
    fn stalemate_from_fen() {
        let game = GameState::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(game.outcome(), GameOutcome::Stalemate);
        assert!(game.is_game_over());
    }

    #[test]
    fn fifty_move_rule_triggers_at_one_hundred() {
        let game = GameState::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 80").unwrap();
        assert_eq!(game.outcome(), GameOutcome::InProgress);

        let after = game.apply_text("a1a2").unwrap();
        assert_eq!(after.position().halfmove_clock, 100);
        assert_eq!(after.outcome(), GameOutcome::DrawFiftyMove);
    }

    #[test]
    fn bare_kings_draw_immediately() {
        let game = GameState::from_fen("8/8/4k3/8/8/4K3/8/8 w - - 0 1").unwrap();
        assert_eq!(game.outcome(), GameOutcome::DrawInsufficientMaterial);
    }

    #[test]
    fn threefold_repetition_by_knight_shuffle() {
        let mut game = GameState::new();
        for san in ["Nf3", "Nf6", "Ng1", "Ng8"] {
            game = game.apply_san(san).unwrap();
        }
        assert_eq!(game.repetition_count(), 2);
        assert_eq!(game.outcome(), GameOutcome::InProgress);

        for san in ["Nf3", "Nf6", "Ng1", "Ng8"] {
            game = game.apply_san(san).unwrap();
        }
        assert_eq!(game.repetition_count(), 3);
        assert_eq!(game.outcome(), GameOutcome::DrawThreefoldRepetition);
        assert!(game.is_game_over());
    }

    #[test]
    fn repetition_identity_includes_castling_rights() {
        // Shuffling the rook away and back restores the placement but
        // not the castling rights, so the "same" position differs.
        let mut game =
            GameState::from_fen("r3k3/8/8/8/8/8/8/R3K3 w Qq - 0 1").unwrap();
        for text in ["a1a2", "a8a7", "a2a1", "a7a8"] {
            game = game.apply_text(text).unwrap();
        }
        assert_eq!(game.repetition_count(), 1);
    }

    #[test]
    fn from_fen_rejects_bad_input() {
        assert!(matches!(
            GameState::from_fen("not a fen"),
            Err(GameError::Fen(_))
        ));
    }

    #[test]
    fn apply_text_accepts_promotion_suffix() {
        let game = GameState::from_fen("8/P7/8/8/8/8/8/4K1k1 w - - 0 1").unwrap();
        let next = game.apply_text("a7a8q").unwrap();
        assert_eq!(next.moves_played()[0].san, "a8=Q");

        // Bare "a7a8" does not name a promotion piece.
        assert!(game.apply_text("a7a8").is_err());
    }
}
