//! Piece placement and attack detection.

use tabia_core::{Color, PieceKind, Square};

/// Knight jump offsets as (file, rank) deltas.
pub(crate) const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// The eight neighboring-square offsets; also the queen's ray directions.
pub(crate) const KING_DELTAS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Diagonal ray directions (bishop).
pub(crate) const BISHOP_RAYS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Orthogonal ray directions (rook).
pub(crate) const ROOK_RAYS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// An 8x8 grid of optional colored pieces.
///
/// `Board` is a pure data container: it answers occupancy and attack
/// queries but knows nothing about move legality, castling rights, or
/// whose turn it is.
///
/// Squares are indexed a1 = 0 through h8 = 63, matching [`Square`].
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Option<(Color, PieceKind)>; 64],
}

impl Board {
    /// A board with no pieces.
    pub const fn empty() -> Self {
        Board { cells: [None; 64] }
    }

    /// The piece on a square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, PieceKind)> {
        self.cells[sq.index() as usize]
    }

    /// Places a piece, replacing whatever was on the square.
    #[inline]
    pub fn set(&mut self, sq: Square, color: Color, kind: PieceKind) {
        self.cells[sq.index() as usize] = Some((color, kind));
    }

    /// Empties a square.
    #[inline]
    pub fn clear(&mut self, sq: Square) {
        self.cells[sq.index() as usize] = None;
    }

    /// The square the given side's king stands on.
    ///
    /// Returns `None` only for hand-built boards without a king; boards
    /// loaded from FEN always have one king per side.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        Square::all().find(|&sq| self.piece_at(sq) == Some((color, PieceKind::King)))
    }

    /// Whether any piece of `by` attacks `sq`.
    ///
    /// Scans fixed offset tables for pawns, knights, and kings and
    /// walks each of the eight rays to the first occupied square for
    /// sliders. Never generates moves, so it is safe to call from move
    /// generation itself.
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        // A pawn of `by` attacks sq if it stands one rank behind
        // (from `by`'s point of view) on an adjacent file.
        for df in [-1, 1] {
            if let Some(from) = sq.offset(df, -by.pawn_direction()) {
                if self.piece_at(from) == Some((by, PieceKind::Pawn)) {
                    return true;
                }
            }
        }

        for (df, dr) in KNIGHT_DELTAS {
            if let Some(from) = sq.offset(df, dr) {
                if self.piece_at(from) == Some((by, PieceKind::Knight)) {
                    return true;
                }
            }
        }

        for (df, dr) in KING_DELTAS {
            if let Some(from) = sq.offset(df, dr) {
                if self.piece_at(from) == Some((by, PieceKind::King)) {
                    return true;
                }
            }
        }

        for (df, dr) in BISHOP_RAYS {
            if let Some((color, kind)) = self.first_piece_along(sq, df, dr) {
                if color == by && matches!(kind, PieceKind::Bishop | PieceKind::Queen) {
                    return true;
                }
            }
        }

        for (df, dr) in ROOK_RAYS {
            if let Some((color, kind)) = self.first_piece_along(sq, df, dr) {
                if color == by && matches!(kind, PieceKind::Rook | PieceKind::Queen) {
                    return true;
                }
            }
        }

        false
    }

    /// The first piece met walking from `from` (exclusive) in the given
    /// direction.
    pub(crate) fn first_piece_along(
        &self,
        from: Square,
        df: i8,
        dr: i8,
    ) -> Option<(Color, PieceKind)> {
        let mut cur = from;
        while let Some(next) = cur.offset(df, dr) {
            if let Some(piece) = self.piece_at(next) {
                return Some(piece);
            }
            cur = next;
        }
        None
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Rank 8 at the top, dots for empty squares.
        for rank in (0..8).rev() {
            for file in 0..8 {
                let sq = Square::from_index(rank * 8 + file).expect("index in range");
                match self.piece_at(sq) {
                    Some((color, kind)) => write!(f, "{}", kind.to_fen_char(color))?,
                    None => write!(f, ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
