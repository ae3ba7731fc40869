//! SAN resolution
//!
//! Turns a short algebraic move such as `Nbd7`, `exd5`, `O-O` or `c8=Q`
//! into an origin, destination and promotion for the side to move, using a
//! [`RulesEngine`] for legality. The board is only read.
//!
//! # Disambiguation
//!
//! File and rank hints filter the candidate origins. When more than one
//! piece still qualifies, the first one in row-major scan order (a1, b1,
//! ..., h1, a2, ..., h8) wins and the move is reported with
//! `candidates > 1`. Importers depend on this tie-break producing the same
//! move every time, so it is kept as is rather than turned into an error.

use crate::game::components::{Piece, PieceColor, PieceType};
use crate::game::rules::RulesEngine;
use crate::game::types::{sq, File, Rank, Square};
use crate::notation::error::{ResolutionError, ResolutionResult};
use tracing::warn;

/// A SAN move resolved against a position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
    /// Pieces that could have made the move; 1 unless the notation is ambiguous
    pub candidates: usize,
}

impl Resolution {
    pub fn is_ambiguous(&self) -> bool {
        self.candidates > 1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CastlingSide {
    King,
    Queen,
}

/// Resolve `notation` for `color` on `board`
///
/// # Errors
///
/// - [`ResolutionError::BadDestination`] when the last two characters are not a square
/// - [`ResolutionError::NoLegalOrigin`] when no matching piece can legally reach it
pub fn resolve<R: RulesEngine>(
    notation: &str,
    color: PieceColor,
    board: &R::Board,
    rules: &R,
) -> ResolutionResult<Resolution> {
    let cleaned = strip_annotations(notation.trim());

    if let Some(side) = castling_side(cleaned) {
        return Ok(castle(color, side));
    }

    let (piece_type, body) = match cleaned.chars().next().and_then(PieceType::from_san_letter) {
        Some(piece_type) => (piece_type, &cleaned[1..]),
        None => (PieceType::Pawn, cleaned),
    };
    let (body, promotion) = split_promotion(body, piece_type);

    let chars: Vec<char> = body.chars().collect();
    let bad_destination = || ResolutionError::BadDestination {
        notation: notation.to_string(),
    };
    if chars.len() < 2 {
        return Err(bad_destination());
    }
    let (hints, target) = chars.split_at(chars.len() - 2);
    let destination = File::from_char(target[0])
        .zip(Rank::from_char(target[1]))
        .map(|(file, rank)| Square::new(file, rank))
        .ok_or_else(bad_destination)?;

    let hints: Vec<char> = hints.iter().copied().filter(|&c| c != 'x').collect();
    let file_hint = hints.iter().find_map(|&c| File::from_char(c));
    let rank_hint = hints.iter().find_map(|&c| Rank::from_char(c));

    let wanted = Piece::new(color, piece_type);
    let candidates: Vec<Square> = Square::all()
        .filter(|square| file_hint.map_or(true, |file| square.file == file))
        .filter(|square| rank_hint.map_or(true, |rank| square.rank == rank))
        .filter(|&square| rules.piece_at(board, square) == Some(wanted))
        .filter(|&square| rules.legal_destinations(board, square).contains(&destination))
        .collect();

    let Some(&from) = candidates.first() else {
        return Err(ResolutionError::NoLegalOrigin {
            notation: notation.to_string(),
            color,
            destination,
        });
    };

    if candidates.len() > 1 {
        warn!(
            "[RESOLVE] {:?} is ambiguous between {} pieces, using {}",
            notation,
            candidates.len(),
            from
        );
    }

    Ok(Resolution {
        piece: wanted,
        from,
        to: destination,
        promotion,
        candidates: candidates.len(),
    })
}

/// Drop trailing check, mate and annotation glyphs (`+ # ! ?`)
fn strip_annotations(notation: &str) -> &str {
    notation.trim_end_matches(['+', '#', '!', '?'])
}

fn castling_side(notation: &str) -> Option<CastlingSide> {
    match notation {
        "O-O" | "0-0" | "o-o" => Some(CastlingSide::King),
        "O-O-O" | "0-0-0" | "o-o-o" => Some(CastlingSide::Queen),
        _ => None,
    }
}

/// Fixed king squares; the rules engine moves the rook when the move is applied
fn castle(color: PieceColor, side: CastlingSide) -> Resolution {
    let rank = color.back_rank();
    let to_file = match side {
        CastlingSide::King => 6,
        CastlingSide::Queen => 2,
    };
    Resolution {
        piece: Piece::new(color, PieceType::King),
        from: sq(4, rank),
        to: sq(to_file, rank),
        promotion: None,
        candidates: 1,
    }
}

/// Split off `=Q` style suffixes, or a bare trailing piece letter on pawn moves
///
/// An unrecognized letter after `=` promotes to a queen.
fn split_promotion(body: &str, piece_type: PieceType) -> (&str, Option<PieceType>) {
    if let Some(index) = body.find('=') {
        let promotion = body[index + 1..]
            .chars()
            .next()
            .and_then(PieceType::from_san_letter)
            .filter(|piece_type| piece_type.is_promotion_target())
            .unwrap_or(PieceType::Queen);
        return (&body[..index], Some(promotion));
    }

    if piece_type == PieceType::Pawn {
        if let Some(last) = body.chars().last() {
            if let Some(promotion) =
                PieceType::from_san_letter(last).filter(|piece_type| piece_type.is_promotion_target())
            {
                return (&body[..body.len() - last.len_utf8()], Some(promotion));
            }
        }
    }

    (body, None)
}
