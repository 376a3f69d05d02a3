//! Move application.
//!
//! [`apply_unchecked`] derives the successor of a position under a
//! move that is already known to be pseudo-legal. Legality checking
//! and the public `Result`-returning entry point live on
//! [`GameState`](crate::GameState).

use crate::Position;
use tabia_core::{Color, Move, MoveFlag, PieceKind, Square};

/// Applies a pseudo-legal move, returning the successor position.
///
/// The input position is never touched. All derived state is updated:
/// castling rights, en-passant target, both move counters, and the
/// side to move.
pub(crate) fn apply_unchecked(position: &Position, m: Move) -> Position {
    let mut next = position.clone();
    let us = position.side_to_move;
    let from = m.from();
    let to = m.to();

    let (_, kind) = position
        .board
        .piece_at(from)
        .expect("apply requires a piece on the source square");

    let direct_capture = position.board.piece_at(to).is_some();
    next.board.clear(from);

    // En passant captures a pawn that is not on the destination square.
    if m.flag() == MoveFlag::EnPassant {
        if let Some(victim) = to.offset(0, -us.pawn_direction()) {
            next.board.clear(victim);
        }
    }

    let landing = m.flag().promotion().unwrap_or(kind);
    next.board.set(to, us, landing);

    // Castling also relocates the rook.
    match m.flag() {
        MoveFlag::CastleKingside => {
            let (rook_from, rook_to) = match us {
                Color::White => (Square::H1, Square::F1),
                Color::Black => (Square::H8, Square::F8),
            };
            next.board.clear(rook_from);
            next.board.set(rook_to, us, PieceKind::Rook);
        }
        MoveFlag::CastleQueenside => {
            let (rook_from, rook_to) = match us {
                Color::White => (Square::A1, Square::D1),
                Color::Black => (Square::A8, Square::D8),
            };
            next.board.clear(rook_from);
            next.board.set(rook_to, us, PieceKind::Rook);
        }
        _ => {}
    }

    // A king move forfeits both rights; a rook leaving its home square
    // forfeits that side's right.
    if kind == PieceKind::King {
        next.castling.revoke_all(us);
    }
    if kind == PieceKind::Rook {
        let (home_kingside, home_queenside) = match us {
            Color::White => (Square::H1, Square::A1),
            Color::Black => (Square::H8, Square::A8),
        };
        if from == home_kingside {
            next.castling.revoke_kingside(us);
        } else if from == home_queenside {
            next.castling.revoke_queenside(us);
        }
    }

    // Anything landing on a rook home square kills the right attached
    // to that square, whether or not a rook still stood there.
    if to == Square::H1 {
        next.castling.revoke_kingside(Color::White);
    } else if to == Square::A1 {
        next.castling.revoke_queenside(Color::White);
    } else if to == Square::H8 {
        next.castling.revoke_kingside(Color::Black);
    } else if to == Square::A8 {
        next.castling.revoke_queenside(Color::Black);
    }

    next.en_passant = if m.flag() == MoveFlag::DoublePush {
        from.offset(0, us.pawn_direction())
    } else {
        None
    };

    let was_capture = direct_capture || m.flag() == MoveFlag::EnPassant;
    if kind == PieceKind::Pawn || was_capture {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock += 1;
    }
    if us == Color::Black {
        next.fullmove_number += 1;
    }
    next.side_to_move = us.opposite();

    next
}
