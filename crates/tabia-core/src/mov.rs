//! Move encoding.

use crate::{PieceKind, Square};
use std::fmt;

/// Marker for special move behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveFlag {
    /// Plain move or capture.
    Normal = 0,
    /// Pawn double push from its starting rank.
    DoublePush = 1,
    /// Kingside castling (O-O).
    CastleKingside = 2,
    /// Queenside castling (O-O-O).
    CastleQueenside = 3,
    /// En-passant capture.
    EnPassant = 4,
    PromoteKnight = 5,
    PromoteBishop = 6,
    PromoteRook = 7,
    PromoteQueen = 8,
}

impl MoveFlag {
    /// The piece this move promotes to, if it is a promotion.
    #[inline]
    pub const fn promotion(self) -> Option<PieceKind> {
        match self {
            MoveFlag::PromoteKnight => Some(PieceKind::Knight),
            MoveFlag::PromoteBishop => Some(PieceKind::Bishop),
            MoveFlag::PromoteRook => Some(PieceKind::Rook),
            MoveFlag::PromoteQueen => Some(PieceKind::Queen),
            _ => None,
        }
    }

    /// The flag promoting to the given kind, if promotion to it is legal.
    #[inline]
    pub const fn promoting_to(kind: PieceKind) -> Option<MoveFlag> {
        match kind {
            PieceKind::Knight => Some(MoveFlag::PromoteKnight),
            PieceKind::Bishop => Some(MoveFlag::PromoteBishop),
            PieceKind::Rook => Some(MoveFlag::PromoteRook),
            PieceKind::Queen => Some(MoveFlag::PromoteQueen),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion().is_some()
    }

    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, MoveFlag::CastleKingside | MoveFlag::CastleQueenside)
    }
}

/// A move, packed into 16 bits: 6 bits source, 6 bits destination,
/// 4 bits flag.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    /// Creates a move with the given flag.
    #[inline]
    pub const fn new(from: Square, to: Square, flag: MoveFlag) -> Self {
        Move((from.index() as u16) | ((to.index() as u16) << 6) | ((flag as u16) << 12))
    }

    /// Creates a plain move.
    #[inline]
    pub const fn normal(from: Square, to: Square) -> Self {
        Self::new(from, to, MoveFlag::Normal)
    }

    /// Source square.
    #[inline]
    pub const fn from(self) -> Square {
        Square((self.0 & 0x3F) as u8)
    }

    /// Destination square.
    #[inline]
    pub const fn to(self) -> Square {
        Square(((self.0 >> 6) & 0x3F) as u8)
    }

    /// The move's flag.
    #[inline]
    pub const fn flag(self) -> MoveFlag {
        match (self.0 >> 12) as u8 {
            1 => MoveFlag::DoublePush,
            2 => MoveFlag::CastleKingside,
            3 => MoveFlag::CastleQueenside,
            4 => MoveFlag::EnPassant,
            5 => MoveFlag::PromoteKnight,
            6 => MoveFlag::PromoteBishop,
            7 => MoveFlag::PromoteRook,
            8 => MoveFlag::PromoteQueen,
            _ => MoveFlag::Normal,
        }
    }

    /// Long algebraic notation: source, destination, and promotion
    /// letter if any, e.g. "e2e4" or "e7e8q".
    pub fn to_long_algebraic(self) -> String {
        match self.flag().promotion() {
            Some(kind) => format!("{}{}{}", self.from(), self.to(), kind.letter()),
            None => format!("{}{}", self.from(), self.to()),
        }
    }

    /// Parses long algebraic notation.
    ///
    /// The result carries no `DoublePush`/`EnPassant`/castling flag;
    /// callers must match it against a generated legal move to recover
    /// the full encoding.
    pub fn from_long_algebraic(s: &str) -> Option<Self> {
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        let flag = match s[4..].chars().next() {
            None => MoveFlag::Normal,
            Some(c) => {
                let (_, kind) = PieceKind::from_fen_char(c)?;
                MoveFlag::promoting_to(kind)?
            }
        };
        Some(Move::new(from, to, flag))
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_long_algebraic())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_long_algebraic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{File, Rank};

    fn sq(file: File, rank: Rank) -> Square {
        Square::new(file, rank)
    }

    #[test]
    fn encoding_roundtrip() {
        let m = Move::new(sq(File::E, Rank::R2), sq(File::E, Rank::R4), MoveFlag::DoublePush);
        assert_eq!(m.from(), sq(File::E, Rank::R2));
        assert_eq!(m.to(), sq(File::E, Rank::R4));
        assert_eq!(m.flag(), MoveFlag::DoublePush);
    }

    #[test]
    fn long_algebraic() {
        let m = Move::normal(sq(File::G, Rank::R1), sq(File::F, Rank::R3));
        assert_eq!(m.to_long_algebraic(), "g1f3");

        let promo = Move::new(sq(File::E, Rank::R7), sq(File::E, Rank::R8), MoveFlag::PromoteQueen);
        assert_eq!(promo.to_long_algebraic(), "e7e8q");
    }

    #[test]
    fn parse_long_algebraic() {
        let m = Move::from_long_algebraic("e2e4").unwrap();
        assert_eq!(m.from().to_algebraic(), "e2");
        assert_eq!(m.to().to_algebraic(), "e4");
        assert_eq!(m.flag(), MoveFlag::Normal);

        for (text, flag) in [
            ("e7e8n", MoveFlag::PromoteKnight),
            ("e7e8b", MoveFlag::PromoteBishop),
            ("e7e8r", MoveFlag::PromoteRook),
            ("e7e8q", MoveFlag::PromoteQueen),
            ("e7e8Q", MoveFlag::PromoteQueen),
        ] {
            assert_eq!(Move::from_long_algebraic(text).unwrap().flag(), flag);
        }
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Move::from_long_algebraic("").is_none());
        assert!(Move::from_long_algebraic("e2").is_none());
        assert!(Move::from_long_algebraic("e2e9").is_none());
        assert!(Move::from_long_algebraic("e7e8x").is_none());
        assert!(Move::from_long_algebraic("e7e8k").is_none());
        assert!(Move::from_long_algebraic("e2e4e5").is_none());
    }

    #[test]
    fn encoding_roundtrip_exhaustive() {
        use proptest::prelude::*;

        proptest!(|(from_idx in 0u8..64, to_idx in 0u8..64, flag_idx in 0u8..9)| {
            let from = Square::from_index(from_idx).unwrap();
            let to = Square::from_index(to_idx).unwrap();
            let flag = [
                MoveFlag::Normal,
                MoveFlag::DoublePush,
                MoveFlag::CastleKingside,
                MoveFlag::CastleQueenside,
                MoveFlag::EnPassant,
                MoveFlag::PromoteKnight,
                MoveFlag::PromoteBishop,
                MoveFlag::PromoteRook,
                MoveFlag::PromoteQueen,
            ][flag_idx as usize];
            let m = Move::new(from, to, flag);
            prop_assert_eq!(m.from(), from);
            prop_assert_eq!(m.to(), to);
            prop_assert_eq!(m.flag(), flag);
        });
    }

    #[test]
    fn promotion_queries() {
        assert!(MoveFlag::PromoteRook.is_promotion());
        assert!(!MoveFlag::EnPassant.is_promotion());
        assert_eq!(MoveFlag::PromoteKnight.promotion(), Some(PieceKind::Knight));
        assert_eq!(MoveFlag::promoting_to(PieceKind::King), None);
        assert!(MoveFlag::CastleKingside.is_castling());
        assert!(MoveFlag::CastleQueenside.is_castling());
        assert!(!MoveFlag::Normal.is_castling());
    }
}
