//! Piece identity types
//!
//! Color, type and the combined [`Piece`] value used by the rules adapter,
//! the notation resolver and every recorded move.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side to move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PieceColor {
    #[default]
    White,
    Black,
}

impl PieceColor {
    /// The other side
    pub fn opposite(self) -> Self {
        match self {
            PieceColor::White => PieceColor::Black,
            PieceColor::Black => PieceColor::White,
        }
    }

    /// Back rank index (0-7) for this color
    pub fn back_rank(self) -> u8 {
        match self {
            PieceColor::White => 0,
            PieceColor::Black => 7,
        }
    }
}

impl fmt::Display for PieceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceColor::White => f.write_str("White"),
            PieceColor::Black => f.write_str("Black"),
        }
    }
}

/// Kind of chess piece
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PieceType {
    #[default]
    King,
    Queen,
    Bishop,
    Knight,
    Rook,
    Pawn,
}

impl PieceType {
    /// Parse a SAN piece letter (`K`, `Q`, `R`, `B`, `N`)
    ///
    /// Only uppercase letters name pieces; a lowercase `b` is the b-file.
    pub fn from_san_letter(c: char) -> Option<Self> {
        match c {
            'K' => Some(PieceType::King),
            'Q' => Some(PieceType::Queen),
            'R' => Some(PieceType::Rook),
            'B' => Some(PieceType::Bishop),
            'N' => Some(PieceType::Knight),
            _ => None,
        }
    }

    /// SAN letter for this piece, `None` for pawns
    pub fn san_letter(self) -> Option<char> {
        match self {
            PieceType::King => Some('K'),
            PieceType::Queen => Some('Q'),
            PieceType::Rook => Some('R'),
            PieceType::Bishop => Some('B'),
            PieceType::Knight => Some('N'),
            PieceType::Pawn => None,
        }
    }

    /// Pieces a pawn may promote to
    pub fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceType::Queen | PieceType::Rook | PieceType::Bishop | PieceType::Knight
        )
    }
}

/// A colored piece
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: PieceColor,
    pub piece_type: PieceType,
}

impl Piece {
    pub fn new(color: PieceColor, piece_type: PieceType) -> Self {
        Self { color, piece_type }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_san_letters_round_trip() {
        for piece_type in [
            PieceType::King,
            PieceType::Queen,
            PieceType::Rook,
            PieceType::Bishop,
            PieceType::Knight,
        ] {
            let letter = piece_type.san_letter().unwrap();
            assert_eq!(PieceType::from_san_letter(letter), Some(piece_type));
        }
        assert_eq!(PieceType::Pawn.san_letter(), None);
    }

    #[test]
    fn test_lowercase_b_is_not_a_bishop() {
        //! The b-file must never be mistaken for a bishop letter
        assert_eq!(PieceType::from_san_letter('b'), None);
        assert_eq!(PieceType::from_san_letter('B'), Some(PieceType::Bishop));
    }

    #[test]
    fn test_opposite_color() {
        assert_eq!(PieceColor::White.opposite(), PieceColor::Black);
        assert_eq!(PieceColor::Black.opposite(), PieceColor::White);
        assert_eq!(PieceColor::Black.back_rank(), 7);
    }
}
