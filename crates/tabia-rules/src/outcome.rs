//! Game-end classification.

use crate::movegen::legal_moves;
use crate::{Board, Position};
use tabia_core::{Color, PieceKind, Square};

/// The status of a game, classified lazily from its current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// The game continues.
    InProgress,
    /// The side to move is mated; the carried color is the winner.
    Checkmate(Color),
    /// The side to move has no legal move but is not in check.
    Stalemate,
    /// Halfmove clock reached 100 (fifty full moves without a pawn
    /// move or capture).
    DrawFiftyMove,
    /// Neither side retains mating material.
    DrawInsufficientMaterial,
    /// The same position occurred three times.
    DrawThreefoldRepetition,
}

impl GameOutcome {
    /// Whether this outcome ends the game.
    #[inline]
    pub fn is_over(self) -> bool {
        self != GameOutcome::InProgress
    }
}

/// Classifies a position given how often its placement has occurred in
/// the game (including the current occurrence).
///
/// Several conditions can hold at once; the priority order is fixed:
/// checkmate, stalemate, fifty-move, insufficient material, threefold
/// repetition.
pub(crate) fn classify(position: &Position, occurrences: usize) -> GameOutcome {
    if legal_moves(position).is_empty() {
        return if position.in_check() {
            GameOutcome::Checkmate(position.side_to_move.opposite())
        } else {
            GameOutcome::Stalemate
        };
    }
    if position.halfmove_clock >= 100 {
        return GameOutcome::DrawFiftyMove;
    }
    if insufficient_material(&position.board) {
        return GameOutcome::DrawInsufficientMaterial;
    }
    if occurrences >= 3 {
        return GameOutcome::DrawThreefoldRepetition;
    }
    GameOutcome::InProgress
}

/// Whether no sequence of legal moves can lead to a checkmate.
///
/// Table of dead positions: king vs king, king and one minor vs king,
/// and any number of bishops (either color) all standing on squares of
/// one shade.
pub(crate) fn insufficient_material(board: &Board) -> bool {
    let mut non_kings: Vec<(PieceKind, Square)> = Vec::new();
    for sq in Square::all() {
        match board.piece_at(sq) {
            Some((_, PieceKind::King)) | None => {}
            Some((_, kind)) => {
                if matches!(kind, PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen) {
                    return false;
                }
                non_kings.push((kind, sq));
            }
        }
    }

    match non_kings.as_slice() {
        [] | [_] => true,
        bishops => {
            let shade = |sq: Square| (sq.file().index() + sq.rank().index()) % 2;
            bishops.iter().all(|&(kind, _)| kind == PieceKind::Bishop)
                && bishops
                    .iter()
                    .all(|&(_, sq)| shade(sq) == shade(bishops[0].1))
        }
    }
}
