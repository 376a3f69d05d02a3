//! Standard Algebraic Notation (SAN).
//!
//! Examples: "e4", "Nf3", "exd5", "O-O", "e8=Q", "Nbd2", "R1e1",
//! "Qxf7#". Parsing is strict about identity: a string matching more
//! than one legal move is an error, never a guess.

use crate::apply::apply_unchecked;
use crate::movegen::legal_moves;
use crate::{GameError, GameState, Position};
use tabia_core::{File, Move, MoveFlag, PieceKind, Rank, Square};
use thiserror::Error;

/// Errors from SAN parsing and resolution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SanError {
    #[error("empty move text")]
    Empty,

    #[error("invalid move text: {0}")]
    InvalidFormat(String),

    #[error("no legal move matches {0}")]
    NoMatchingMove(String),

    #[error("{0} is ambiguous: more than one legal move matches")]
    AmbiguousMove(String),
}

/// Renders a legal move as SAN for the position it is played from.
pub fn move_to_san(position: &Position, m: Move) -> String {
    let mut san = String::new();

    if m.flag() == MoveFlag::CastleKingside {
        san.push_str("O-O");
        return with_check_suffix(position, m, san);
    }
    if m.flag() == MoveFlag::CastleQueenside {
        san.push_str("O-O-O");
        return with_check_suffix(position, m, san);
    }

    let from = m.from();
    let to = m.to();
    let Some((_, kind)) = position.board.piece_at(from) else {
        // Not reachable for legal moves; render something stable.
        return m.to_long_algebraic();
    };

    let is_capture = position.board.piece_at(to).is_some() || m.flag() == MoveFlag::EnPassant;

    if kind == PieceKind::Pawn {
        if is_capture {
            san.push(from.file().to_char());
        }
    } else {
        san.push(kind.letter().to_ascii_uppercase());
        san.push_str(&disambiguation(position, m, kind));
    }

    if is_capture {
        san.push('x');
    }

    san.push(to.file().to_char());
    san.push(to.rank().to_char());

    if let Some(promoted) = m.flag().promotion() {
        san.push('=');
        san.push(promoted.letter().to_ascii_uppercase());
    }

    with_check_suffix(position, m, san)
}

/// Resolves SAN text to the unique legal move it denotes.
pub fn san_to_move(position: &Position, san: &str) -> Result<Move, SanError> {
    let original = san.trim();
    if original.is_empty() {
        return Err(SanError::Empty);
    }

    // Check and mate suffixes carry no identity.
    let bare = original.trim_end_matches(|c| c == '+' || c == '#');

    if bare == "O-O" || bare == "0-0" {
        return castling_move(position, MoveFlag::CastleKingside, original);
    }
    if bare == "O-O-O" || bare == "0-0-0" {
        return castling_move(position, MoveFlag::CastleQueenside, original);
    }

    let pattern = parse_components(bare, original)?;
    resolve(position, &pattern, original)
}

/// Replays a textual move list from the starting position.
///
/// Each element may be SAN or long algebraic ("e4" or "e2e4"); the
/// first move that fails to parse or is not legal aborts the replay.
pub fn replay<'a, I>(moves: I) -> Result<GameState, GameError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut state = GameState::new();
    for text in moves {
        state = state.apply_text(text)?;
    }
    Ok(state)
}

/// The constraints a SAN string puts on a move.
struct SanPattern {
    kind: PieceKind,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    to: Square,
    promotion: Option<PieceKind>,
}

fn parse_components(bare: &str, original: &str) -> Result<SanPattern, SanError> {
    let chars: Vec<char> = bare.chars().collect();
    if chars.is_empty() {
        return Err(SanError::Empty);
    }

    let bad = || SanError::InvalidFormat(original.to_string());

    // Leading uppercase letter names the piece; otherwise a pawn moves.
    let (kind, rest) = match chars[0] {
        'N' => (PieceKind::Knight, &chars[1..]),
        'B' => (PieceKind::Bishop, &chars[1..]),
        'R' => (PieceKind::Rook, &chars[1..]),
        'Q' => (PieceKind::Queen, &chars[1..]),
        'K' => (PieceKind::King, &chars[1..]),
        _ => (PieceKind::Pawn, &chars[..]),
    };

    // Split off "=X" promotion.
    let (rest, promotion) = match rest.iter().position(|&c| c == '=') {
        Some(eq) => {
            if rest.len() != eq + 2 {
                return Err(bad());
            }
            let target = match rest[eq + 1] {
                'N' => PieceKind::Knight,
                'B' => PieceKind::Bishop,
                'R' => PieceKind::Rook,
                'Q' => PieceKind::Queen,
                _ => return Err(bad()),
            };
            (&rest[..eq], Some(target))
        }
        None => (rest, None),
    };

    // Drop the capture marker; it adds no identity beyond the rest.
    let rest: Vec<char> = rest.iter().copied().filter(|&c| c != 'x').collect();

    // The final two characters are the destination.
    if rest.len() < 2 {
        return Err(bad());
    }
    let to_file = File::from_char(rest[rest.len() - 2]).ok_or_else(bad)?;
    let to_rank = Rank::from_char(rest[rest.len() - 1]).ok_or_else(bad)?;

    // Whatever precedes the destination disambiguates the source.
    let (from_file, from_rank) = match &rest[..rest.len() - 2] {
        [] => (None, None),
        &[c] => {
            if let Some(f) = File::from_char(c) {
                (Some(f), None)
            } else if let Some(r) = Rank::from_char(c) {
                (None, Some(r))
            } else {
                return Err(bad());
            }
        }
        &[fc, rc] => (
            Some(File::from_char(fc).ok_or_else(bad)?),
            Some(Rank::from_char(rc).ok_or_else(bad)?),
        ),
        _ => return Err(bad()),
    };

    Ok(SanPattern {
        kind,
        from_file,
        from_rank,
        to: Square::new(to_file, to_rank),
        promotion,
    })
}

fn castling_move(position: &Position, flag: MoveFlag, original: &str) -> Result<Move, SanError> {
    legal_moves(position)
        .into_iter()
        .find(|m| m.flag() == flag)
        .ok_or_else(|| SanError::NoMatchingMove(original.to_string()))
}

fn resolve(position: &Position, pattern: &SanPattern, original: &str) -> Result<Move, SanError> {
    let mut matches = legal_moves(position).into_iter().filter(|m| {
        if m.to() != pattern.to || m.flag().is_castling() {
            return false;
        }
        match position.board.piece_at(m.from()) {
            Some((_, kind)) if kind == pattern.kind => {}
            _ => return false,
        }
        if pattern.from_file.is_some_and(|f| m.from().file() != f) {
            return false;
        }
        if pattern.from_rank.is_some_and(|r| m.from().rank() != r) {
            return false;
        }
        // A promotion must be written out, and "=X" must match it.
        m.flag().promotion() == pattern.promotion
    });

    match (matches.next(), matches.next()) {
        (None, _) => Err(SanError::NoMatchingMove(original.to_string())),
        (Some(only), None) => Ok(only),
        (Some(_), Some(_)) => Err(SanError::AmbiguousMove(original.to_string())),
    }
}

/// Minimal source coordinates needed to single out `m` among legal
/// moves of the same kind to the same destination.
fn disambiguation(position: &Position, m: Move, kind: PieceKind) -> String {
    let from = m.from();
    let rivals: Vec<Square> = legal_moves(position)
        .into_iter()
        .filter(|other| {
            other.to() == m.to()
                && other.from() != from
                && matches!(position.board.piece_at(other.from()), Some((_, k)) if k == kind)
        })
        .map(|other| other.from())
        .collect();

    if rivals.is_empty() {
        return String::new();
    }
    if rivals.iter().all(|sq| sq.file() != from.file()) {
        return from.file().to_char().to_string();
    }
    if rivals.iter().all(|sq| sq.rank() != from.rank()) {
        return from.rank().to_char().to_string();
    }
    format!("{}{}", from.file().to_char(), from.rank().to_char())
}

/// Appends "+" or "#" if the move gives check or mate.
fn with_check_suffix(position: &Position, m: Move, mut san: String) -> String {
    let next = apply_unchecked(position, m);
    if next.in_check() {
        if legal_moves(&next).is_empty() {
            san.push('#');
        } else {
            san.push('+');
        }
    }
    san
}
