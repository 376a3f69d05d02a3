//! A full position: placement plus game bookkeeping.

use crate::Board;
use tabia_core::{Color, FenError, FenRecord, PieceKind, Square};

/// The four castling permissions, stored as a bitset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    const WHITE_KINGSIDE: u8 = 0b0001;
    const WHITE_QUEENSIDE: u8 = 0b0010;
    const BLACK_KINGSIDE: u8 = 0b0100;
    const BLACK_QUEENSIDE: u8 = 0b1000;

    /// No side may castle.
    pub const NONE: CastlingRights = CastlingRights(0);
    /// Both sides may castle both ways.
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    const fn kingside_flag(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        }
    }

    #[inline]
    const fn queenside_flag(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        }
    }

    /// Whether the given side may still castle kingside.
    #[inline]
    pub const fn kingside(self, color: Color) -> bool {
        self.0 & Self::kingside_flag(color) != 0
    }

    /// Whether the given side may still castle queenside.
    #[inline]
    pub const fn queenside(self, color: Color) -> bool {
        self.0 & Self::queenside_flag(color) != 0
    }

    /// Revokes kingside castling for a side.
    #[inline]
    pub fn revoke_kingside(&mut self, color: Color) {
        self.0 &= !Self::kingside_flag(color);
    }

    /// Revokes queenside castling for a side.
    #[inline]
    pub fn revoke_queenside(&mut self, color: Color) {
        self.0 &= !Self::queenside_flag(color);
    }

    /// Revokes both castling rights for a side.
    #[inline]
    pub fn revoke_all(&mut self, color: Color) {
        self.0 &= !(Self::kingside_flag(color) | Self::queenside_flag(color));
    }

    /// Parses the FEN castling field ("KQkq", "Kq", "-", ...).
    pub fn from_fen_field(field: &str) -> Self {
        let mut bits = 0u8;
        for c in field.chars() {
            bits |= match c {
                'K' => Self::WHITE_KINGSIDE,
                'Q' => Self::WHITE_QUEENSIDE,
                'k' => Self::BLACK_KINGSIDE,
                'q' => Self::BLACK_QUEENSIDE,
                _ => 0,
            };
        }
        CastlingRights(bits)
    }

    /// The FEN castling field for these rights.
    pub fn to_fen_field(self) -> String {
        if self.0 == 0 {
            return "-".to_string();
        }
        let mut field = String::new();
        if self.kingside(Color::White) {
            field.push('K');
        }
        if self.queenside(Color::White) {
            field.push('Q');
        }
        if self.kingside(Color::Black) {
            field.push('k');
        }
        if self.queenside(Color::Black) {
            field.push('q');
        }
        field
    }
}

/// A complete chess position.
///
/// `Position` is a plain value; nothing in this crate mutates one after
/// it has been handed out. Deriving a successor position goes through
/// [`GameState::apply`](crate::GameState::apply).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Piece placement.
    pub board: Board,
    /// Whose turn it is.
    pub side_to_move: Color,
    /// Castling availability.
    pub castling: CastlingRights,
    /// Square behind the pawn that just double-pushed, if any.
    pub en_passant: Option<Square>,
    /// Halfmoves since the last pawn move or capture (fifty-move rule).
    pub halfmove_clock: u32,
    /// Fullmove number, starting at 1, incremented after Black moves.
    pub fullmove_number: u32,
}

impl Position {
    /// The standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen(FenRecord::STARTPOS).expect("STARTPOS is valid")
    }

    /// Builds a position from a FEN string.
    ///
    /// Beyond the textual validation done by [`FenRecord`], this
    /// requires exactly one king per side.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let record = FenRecord::parse(fen)?;

        let mut board = Board::empty();
        // FEN lists rank 8 first.
        for (i, rank_text) in record.placement.split('/').enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for c in rank_text.chars() {
                if let Some(run) = c.to_digit(10) {
                    file += run as u8;
                } else if let Some((color, kind)) = PieceKind::from_fen_char(c) {
                    if let Some(sq) = Square::from_index(rank * 8 + file) {
                        board.set(sq, color, kind);
                    }
                    file += 1;
                }
            }
        }

        for color in [Color::White, Color::Black] {
            let kings = Square::all()
                .filter(|&sq| board.piece_at(sq) == Some((color, PieceKind::King)))
                .count();
            if kings != 1 {
                return Err(FenError::Placement(format!(
                    "expected exactly one {} king, found {}",
                    color, kings
                )));
            }
        }

        Ok(Position {
            board,
            side_to_move: record.side_to_move,
            castling: CastlingRights::from_fen_field(&record.castling),
            en_passant: record.en_passant,
            halfmove_clock: record.halfmove_clock,
            fullmove_number: record.fullmove_number,
        })
    }

    /// Serializes the position to FEN.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8).rev() {
            let mut empty_run = 0;
            for file in 0..8 {
                let sq = Square::from_index(rank * 8 + file).expect("index in range");
                match self.board.piece_at(sq) {
                    Some((color, kind)) => {
                        if empty_run > 0 {
                            fen.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        fen.push(kind.to_fen_char(color));
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                fen.push_str(&empty_run.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });
        fen.push(' ');
        fen.push_str(&self.castling.to_fen_field());
        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq.to_algebraic()),
            None => fen.push('-'),
        }
        fen.push(' ');
        fen.push_str(&self.halfmove_clock.to_string());
        fen.push(' ');
        fen.push_str(&self.fullmove_number.to_string());

        fen
    }

    /// Whether the given side's king is attacked.
    pub fn king_attacked(&self, color: Color) -> bool {
        match self.board.king_square(color) {
            Some(sq) => self.board.is_square_attacked(sq, color.opposite()),
            None => false,
        }
    }

    /// Whether the side to move is in check.
    #[inline]
    pub fn in_check(&self) -> bool {
        self.king_attacked(self.side_to_move)
    }

    /// Position identity for repetition detection: everything except
    /// the two move counters.
    pub fn same_placement(&self, other: &Position) -> bool {
        self.board == other.board
            && self.side_to_move == other.side_to_move
            && self.castling == other.castling
            && self.en_passant == other.en_passant
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabia_core::{File, Rank};

    #[test]
    fn startpos_roundtrip() {
        assert_eq!(Position::startpos().to_fen(), FenRecord::STARTPOS);
    }

    #[test]
    fn custom_fen_roundtrip() {
        for fen in [
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w - - 12 30",
            "8/8/4k3/8/8/4K3/8/8 w - - 0 1",
        ] {
            let pos = Position::from_fen(fen).unwrap();
            assert_eq!(pos.to_fen(), fen);
        }
    }

    #[test]
    fn rejects_wrong_king_count() {
        // No kings at all.
        assert!(matches!(
            Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::Placement(_))
        ));
        // Two white kings.
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/8/8/8/K3K3 w - - 0 1"),
            Err(FenError::Placement(_))
        ));
    }

    #[test]
    fn startpos_contents() {
        let pos = Position::startpos();
        assert_eq!(
            pos.board.piece_at(Square::E1),
            Some((Color::White, PieceKind::King))
        );
        assert_eq!(
            pos.board.piece_at(Square::D8),
            Some((Color::Black, PieceKind::Queen))
        );
        assert_eq!(pos.board.piece_at(Square::new(File::E, Rank::R4)), None);
        assert_eq!(pos.side_to_move, Color::White);
        assert!(pos.castling.kingside(Color::White));
        assert!(pos.castling.queenside(Color::Black));
        assert!(!pos.in_check());
    }

    #[test]
    fn castling_rights_revocation() {
        let mut rights = CastlingRights::ALL;
        rights.revoke_kingside(Color::White);
        assert!(!rights.kingside(Color::White));
        assert!(rights.queenside(Color::White));
        assert!(rights.kingside(Color::Black));

        rights.revoke_all(Color::Black);
        assert!(!rights.kingside(Color::Black));
        assert!(!rights.queenside(Color::Black));
        assert_eq!(rights.to_fen_field(), "Q");
    }

    #[test]
    fn castling_rights_fen_field() {
        assert_eq!(CastlingRights::ALL.to_fen_field(), "KQkq");
        assert_eq!(CastlingRights::NONE.to_fen_field(), "-");
        assert_eq!(CastlingRights::from_fen_field("Kq").to_fen_field(), "Kq");
        assert_eq!(CastlingRights::from_fen_field("-").to_fen_field(), "-");
    }

    #[test]
    fn same_placement_ignores_counters() {
        let a = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let b = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 40 60").unwrap();
        assert!(a.same_placement(&b));
        assert_ne!(a, b);

        let c = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert!(!a.same_placement(&c));
    }

    #[test]
    fn in_check_detected() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1").unwrap();
        assert!(pos.in_check());
        assert!(pos.king_attacked(Color::White));
        assert!(!pos.king_attacked(Color::Black));
    }
}
