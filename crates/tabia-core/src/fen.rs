//! FEN (Forsyth-Edwards Notation) parsing and validation.

use crate::{Color, Rank, Square};
use thiserror::Error;

/// Errors produced while parsing a FEN string, one variant per field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("expected 6 whitespace-separated fields, got {0}")]
    FieldCount(usize),

    #[error("invalid piece placement: {0}")]
    Placement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    ActiveColor(String),

    #[error("invalid castling availability: {0}")]
    Castling(String),

    #[error("invalid en passant square: {0}")]
    EnPassant(String),

    #[error("invalid halfmove clock: {0}")]
    HalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    FullmoveNumber(String),
}

/// A validated FEN string, split into its six fields.
///
/// The placement field is checked for shape (8 ranks of 8 squares,
/// known piece letters) but not interpreted; building an actual board
/// out of it is the rules crate's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenRecord {
    /// Piece placement, e.g. "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR".
    pub placement: String,
    /// The side to move.
    pub side_to_move: Color,
    /// Castling availability as written, e.g. "KQkq" or "-".
    pub castling: String,
    /// En-passant target square, if one was given.
    pub en_passant: Option<Square>,
    /// Halfmove clock for the fifty-move rule.
    pub halfmove_clock: u32,
    /// Fullmove number, starting at 1.
    pub fullmove_number: u32,
}

impl FenRecord {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses and validates a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        let [placement, active, castling, en_passant, halfmove, fullmove] = parts.as_slice()
        else {
            return Err(FenError::FieldCount(parts.len()));
        };

        validate_placement(placement)?;

        let side_to_move = match *active {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::ActiveColor(other.to_string())),
        };

        validate_castling(castling)?;

        let en_passant = parse_en_passant(en_passant)?;

        let halfmove_clock = halfmove
            .parse::<u32>()
            .map_err(|_| FenError::HalfmoveClock(halfmove.to_string()))?;
        let fullmove_number = fullmove
            .parse::<u32>()
            .map_err(|_| FenError::FullmoveNumber(fullmove.to_string()))?;

        Ok(FenRecord {
            placement: placement.to_string(),
            side_to_move,
            castling: castling.to_string(),
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    /// Reassembles the record into a FEN string.
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.placement,
            match self.side_to_move {
                Color::White => 'w',
                Color::Black => 'b',
            },
            self.castling,
            match self.en_passant {
                Some(sq) => sq.to_algebraic(),
                None => "-".to_string(),
            },
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

impl Default for FenRecord {
    fn default() -> Self {
        Self::parse(Self::STARTPOS).expect("STARTPOS is valid")
    }
}

fn validate_placement(placement: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::Placement(format!(
            "expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    for (i, rank) in ranks.iter().enumerate() {
        let mut squares = 0u32;
        for c in rank.chars() {
            if let Some(digit) = c.to_digit(10) {
                if digit == 0 || digit == 9 {
                    return Err(FenError::Placement(format!(
                        "invalid run length '{}' in rank {}",
                        c,
                        8 - i
                    )));
                }
                squares += digit;
            } else if "pnbrqkPNBRQK".contains(c) {
                squares += 1;
            } else {
                return Err(FenError::Placement(format!(
                    "invalid character '{}' in rank {}",
                    c,
                    8 - i
                )));
            }
        }
        if squares != 8 {
            return Err(FenError::Placement(format!(
                "rank {} covers {} squares, expected 8",
                8 - i,
                squares
            )));
        }
    }

    Ok(())
}

fn validate_castling(castling: &str) -> Result<(), FenError> {
    if castling == "-" {
        return Ok(());
    }
    if castling.is_empty() || castling.chars().any(|c| !"KQkq".contains(c)) {
        return Err(FenError::Castling(castling.to_string()));
    }
    Ok(())
}

fn parse_en_passant(field: &str) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    let sq =
        Square::from_algebraic(field).ok_or_else(|| FenError::EnPassant(field.to_string()))?;
    // Only the square behind a double-pushed pawn is a valid target.
    if sq.rank() != Rank::R3 && sq.rank() != Rank::R6 {
        return Err(FenError::EnPassant(field.to_string()));
    }
    Ok(Some(sq))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::File;

    #[test]
    fn parse_startpos() {
        let rec = FenRecord::parse(FenRecord::STARTPOS).unwrap();
        assert_eq!(rec.side_to_move, Color::White);
        assert_eq!(rec.castling, "KQkq");
        assert_eq!(rec.en_passant, None);
        assert_eq!(rec.halfmove_clock, 0);
        assert_eq!(rec.fullmove_number, 1);
    }

    #[test]
    fn roundtrip() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let rec = FenRecord::parse(fen).unwrap();
        assert_eq!(rec.en_passant, Some(Square::new(File::E, Rank::R3)));
        assert_eq!(rec.to_fen(), fen);
    }

    #[test]
    fn default_is_startpos() {
        assert_eq!(FenRecord::default().to_fen(), FenRecord::STARTPOS);
    }

    #[test]
    fn wrong_field_count() {
        assert_eq!(
            FenRecord::parse("only three fields here"),
            Err(FenError::FieldCount(4))
        );
    }

    #[test]
    fn bad_active_color() {
        assert!(matches!(
            FenRecord::parse("8/8/8/8/8/8/8/8 x KQkq - 0 1"),
            Err(FenError::ActiveColor(_))
        ));
    }

    #[test]
    fn bad_placement() {
        // Seven ranks.
        assert!(matches!(
            FenRecord::parse("8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::Placement(_))
        ));
        // Unknown letter.
        assert!(matches!(
            FenRecord::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::Placement(_))
        ));
        // Nine squares in a rank.
        assert!(matches!(
            FenRecord::parse("rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::Placement(_))
        ));
        // Zero-length run.
        assert!(matches!(
            FenRecord::parse("rnbqkbnr/pppppppp/08/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::Placement(_))
        ));
    }

    #[test]
    fn bad_castling() {
        assert!(matches!(
            FenRecord::parse("8/8/8/8/8/8/8/8 w XYZ - 0 1"),
            Err(FenError::Castling(_))
        ));
    }

    #[test]
    fn bad_en_passant() {
        for field in ["abc", "x3", "e4", "e9"] {
            let fen = format!("8/8/8/8/8/8/8/8 w - {} 0 1", field);
            assert!(
                matches!(FenRecord::parse(&fen), Err(FenError::EnPassant(_))),
                "accepted {}",
                field
            );
        }
    }

    #[test]
    fn bad_clocks() {
        assert!(matches!(
            FenRecord::parse("8/8/8/8/8/8/8/8 w - - abc 1"),
            Err(FenError::HalfmoveClock(_))
        ));
        assert!(matches!(
            FenRecord::parse("8/8/8/8/8/8/8/8 w - - 0 xyz"),
            Err(FenError::FullmoveNumber(_))
        ));
    }

    #[test]
    fn partial_castling_kept_verbatim() {
        let rec = FenRecord::parse("8/8/8/8/8/8/8/8 w Kq - 0 1").unwrap();
        assert_eq!(rec.castling, "Kq");
    }
}
