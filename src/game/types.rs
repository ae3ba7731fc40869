//! Type definitions and utilities for chess game logic
//!
//! Provides newtype patterns for board coordinates plus the move-numbering
//! arithmetic shared by the notation serializer and the replayer.

use crate::game::components::PieceColor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Board coordinate representing a file (column) on the chessboard
///
/// Values range from 0 (file 'a') to 7 (file 'h').
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct File(u8);

impl File {
    /// Create a file from a character ('a'..='h')
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='h' => Some(File(c as u8 - b'a')),
            _ => None,
        }
    }

    /// Create a file from its index (0-7)
    pub fn from_index(index: u8) -> Option<Self> {
        (index < 8).then_some(File(index))
    }

    /// Convert file to character ('a'..='h')
    pub fn to_char(self) -> char {
        (b'a' + self.0) as char
    }

    /// Get the file index (0-7)
    pub fn index(self) -> u8 {
        self.0
    }
}

/// Board coordinate representing a rank (row) on the chessboard
///
/// Values range from 0 (rank 1) to 7 (rank 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rank(u8);

impl Rank {
    /// Create a rank from a character ('1'..='8')
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '1'..='8' => Some(Rank(c as u8 - b'1')),
            _ => None,
        }
    }

    /// Create a rank from its index (0-7)
    pub fn from_index(index: u8) -> Option<Self> {
        (index < 8).then_some(Rank(index))
    }

    /// Convert rank to number (1-8)
    pub fn to_number(self) -> u8 {
        self.0 + 1
    }

    /// Get the rank index (0-7)
    pub fn index(self) -> u8 {
        self.0
    }
}

/// Board square position (file, rank)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub file: File,
    pub rank: Rank,
}

impl Square {
    pub fn new(file: File, rank: Rank) -> Self {
        Square { file, rank }
    }

    /// Create a square from its row-major index (a1 = 0, h1 = 7, h8 = 63)
    pub fn from_index(index: u8) -> Option<Self> {
        if index >= 64 {
            return None;
        }
        Some(Square {
            file: File(index % 8),
            rank: Rank(index / 8),
        })
    }

    /// Row-major index (a1 = 0, h8 = 63)
    pub fn index(self) -> u8 {
        self.rank.0 * 8 + self.file.0
    }

    /// Create a square from algebraic notation (e.g., "e4")
    ///
    /// Anything other than exactly a file letter followed by a rank digit is rejected.
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let file = File::from_char(chars.next()?)?;
        let rank = Rank::from_char(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Square { file, rank })
    }

    /// Convert square to algebraic notation (e.g., "e4")
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file.to_char(), self.rank.to_number())
    }

    /// All 64 squares in row-major scan order: a1, b1, ..., h1, a2, ..., h8
    pub fn all() -> impl Iterator<Item = Square> {
        (0u8..64).filter_map(Square::from_index)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file.to_char(), self.rank.to_number())
    }
}

impl FromStr for Square {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s).ok_or_else(|| format!("invalid square: {s:?}"))
    }
}

/// Shorthand used by tests and fixed castling squares
pub(crate) fn sq(file: u8, rank: u8) -> Square {
    Square {
        file: File(file & 7),
        rank: Rank(rank & 7),
    }
}

// ============================================================================
// Move numbering
// ============================================================================
//
// Ply 1 is White's first move, ply 2 Black's reply, and so on. Ply 0 is the
// starting position.

/// Color that played the move at `ply` (odd = White, even = Black)
pub fn color_for_ply(ply: u32) -> PieceColor {
    if ply % 2 == 1 {
        PieceColor::White
    } else {
        PieceColor::Black
    }
}

/// Full-move number of the move at `ply`
pub fn move_number_for_ply(ply: u32) -> u32 {
    (ply + 1) / 2
}

/// Ply of the move written as `move_number` for `color`
///
/// Returns `None` for move number 0, which no move can carry, and for
/// numbers whose ply does not fit in a `u32`.
pub fn ply_for(move_number: u32, color: PieceColor) -> Option<u32> {
    let black_ply = move_number.checked_mul(2).filter(|&ply| ply > 0)?;
    match color {
        PieceColor::White => black_ply.checked_sub(1),
        PieceColor::Black => Some(black_ply),
    }
}

/// Move number and color as written in movetext, e.g. `"12."` or `"12..."`
pub fn move_number_prefix(ply: u32) -> String {
    let number = move_number_for_ply(ply);
    match color_for_ply(ply) {
        PieceColor::White => format!("{number}."),
        PieceColor::Black => format!("{number}..."),
    }
}
