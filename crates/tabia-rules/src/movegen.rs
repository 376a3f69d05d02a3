//! Legal move generation.

use crate::apply::apply_unchecked;
use crate::board::{BISHOP_RAYS, KING_DELTAS, KNIGHT_DELTAS, ROOK_RAYS};
use crate::Position;
use tabia_core::{Color, Move, MoveFlag, PieceKind, Rank, Square};

/// Generates every legal move in the position.
///
/// Pseudo-legal moves are generated per piece, then filtered by
/// applying each one and discarding those that leave the mover's own
/// king attacked. The result is sorted by source square, destination
/// square, and flag so the ordering is deterministic.
pub fn legal_moves(position: &Position) -> Vec<Move> {
    let us = position.side_to_move;
    let mut moves = pseudo_legal_moves(position);
    moves.retain(|&m| !apply_unchecked(position, m).king_attacked(us));
    moves.sort_by_key(|m| (m.from().index(), m.to().index(), m.flag() as u8));
    moves
}

fn pseudo_legal_moves(position: &Position) -> Vec<Move> {
    let us = position.side_to_move;
    let mut moves = Vec::with_capacity(64);

    for from in Square::all() {
        let Some((color, kind)) = position.board.piece_at(from) else {
            continue;
        };
        if color != us {
            continue;
        }
        match kind {
            PieceKind::Pawn => pawn_moves(position, from, &mut moves),
            PieceKind::Knight => leaper_moves(position, from, &KNIGHT_DELTAS, &mut moves),
            PieceKind::Bishop => slider_moves(position, from, &BISHOP_RAYS, &mut moves),
            PieceKind::Rook => slider_moves(position, from, &ROOK_RAYS, &mut moves),
            PieceKind::Queen => slider_moves(position, from, &KING_DELTAS, &mut moves),
            PieceKind::King => leaper_moves(position, from, &KING_DELTAS, &mut moves),
        }
    }

    castling_moves(position, &mut moves);
    moves
}

fn pawn_moves(position: &Position, from: Square, moves: &mut Vec<Move>) {
    let us = position.side_to_move;
    let dir = us.pawn_direction();
    let start_rank = match us {
        Color::White => Rank::R2,
        Color::Black => Rank::R7,
    };
    let promotion_rank = us.opposite().back_rank();

    // Pushes.
    if let Some(one) = from.offset(0, dir) {
        if position.board.piece_at(one).is_none() {
            push_pawn_move(moves, from, one, promotion_rank);
            if from.rank() == start_rank {
                if let Some(two) = one.offset(0, dir) {
                    if position.board.piece_at(two).is_none() {
                        moves.push(Move::new(from, two, MoveFlag::DoublePush));
                    }
                }
            }
        }
    }

    // Diagonal captures, including en passant.
    for df in [-1, 1] {
        let Some(to) = from.offset(df, dir) else {
            continue;
        };
        match position.board.piece_at(to) {
            Some((color, _)) if color != us => push_pawn_move(moves, from, to, promotion_rank),
            None if position.en_passant == Some(to) => {
                moves.push(Move::new(from, to, MoveFlag::EnPassant));
            }
            _ => {}
        }
    }
}

/// Pushes a pawn move, expanding to the four promotion choices on the
/// last rank.
fn push_pawn_move(moves: &mut Vec<Move>, from: Square, to: Square, promotion_rank: Rank) {
    if to.rank() == promotion_rank {
        for kind in PieceKind::PROMOTION_TARGETS {
            if let Some(flag) = MoveFlag::promoting_to(kind) {
                moves.push(Move::new(from, to, flag));
            }
        }
    } else {
        moves.push(Move::normal(from, to));
    }
}

fn leaper_moves(position: &Position, from: Square, deltas: &[(i8, i8)], moves: &mut Vec<Move>) {
    let us = position.side_to_move;
    for &(df, dr) in deltas {
        let Some(to) = from.offset(df, dr) else {
            continue;
        };
        match position.board.piece_at(to) {
            Some((color, _)) if color == us => {}
            _ => moves.push(Move::normal(from, to)),
        }
    }
}

fn slider_moves(position: &Position, from: Square, rays: &[(i8, i8)], moves: &mut Vec<Move>) {
    let us = position.side_to_move;
    for &(df, dr) in rays {
        let mut cur = from;
        while let Some(to) = cur.offset(df, dr) {
            match position.board.piece_at(to) {
                None => {
                    moves.push(Move::normal(from, to));
                    cur = to;
                }
                Some((color, _)) => {
                    if color != us {
                        moves.push(Move::normal(from, to));
                    }
                    break;
                }
            }
        }
    }
}

fn castling_moves(position: &Position, moves: &mut Vec<Move>) {
    let us = position.side_to_move;
    let them = us.opposite();

    let (king_home, rook_kingside, rook_queenside) = match us {
        Color::White => (Square::E1, Square::H1, Square::A1),
        Color::Black => (Square::E8, Square::H8, Square::A8),
    };

    // Castling requires the king on its home square and out of check.
    if position.board.piece_at(king_home) != Some((us, PieceKind::King)) || position.in_check() {
        return;
    }

    if position.castling.kingside(us) {
        let (f_sq, g_sq) = match us {
            Color::White => (Square::F1, Square::G1),
            Color::Black => (Square::F8, Square::G8),
        };
        if position.board.piece_at(rook_kingside) == Some((us, PieceKind::Rook))
            && position.board.piece_at(f_sq).is_none()
            && position.board.piece_at(g_sq).is_none()
            && !position.board.is_square_attacked(f_sq, them)
        {
            // Landing on an attacked g-square is caught by the
            // check-safety filter.
            moves.push(Move::new(king_home, g_sq, MoveFlag::CastleKingside));
        }
    }

    if position.castling.queenside(us) {
        let (d_sq, c_sq, b_sq) = match us {
            Color::White => (Square::D1, Square::C1, Square::B1),
            Color::Black => (Square::D8, Square::C8, Square::B8),
        };
        if position.board.piece_at(rook_queenside) == Some((us, PieceKind::Rook))
            && position.board.piece_at(d_sq).is_none()
            && position.board.piece_at(c_sq).is_none()
            && position.board.piece_at(b_sq).is_none()
            && !position.board.is_square_attacked(d_sq, them)
        {
            moves.push(Move::new(king_home, c_sq, MoveFlag::CastleQueenside));
        }
    }
}
