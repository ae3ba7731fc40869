//! Error types for notation module
//!
//! Resolution, parsing and replay each get their own enum. Replay errors
//! carry the failing notation with its move number and color so callers can
//! show them verbatim.

use crate::game::components::PieceColor;
use crate::game::error::{RulesError, TreeError};
use crate::game::types::Square;
use thiserror::Error;

/// Errors turning a SAN string into a concrete move
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// Destination is missing or not a square
    #[error("Bad destination square in {notation:?}")]
    BadDestination { notation: String },

    /// No piece of the side to move can legally reach the destination
    #[error("No {color} piece can legally reach {destination} for {notation:?}")]
    NoLegalOrigin {
        notation: String,
        color: PieceColor,
        destination: Square,
    },
}

/// Errors in the structure of movetext or its tag block
///
/// Offsets are byte positions in the input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unterminated tag starting at byte {offset}")]
    UnterminatedTag { offset: usize },

    #[error("Malformed tag at byte {offset}: {text:?}")]
    MalformedTag { offset: usize, text: String },

    #[error("Unterminated comment starting at byte {offset}")]
    UnterminatedComment { offset: usize },

    #[error("Unbalanced parenthesis at byte {offset}")]
    UnbalancedParen { offset: usize },

    #[error("Variation at byte {offset} has no move to branch from")]
    VariationWithoutMove { offset: usize },

    #[error("Unexpected {token:?} at byte {offset}")]
    UnexpectedToken { token: String, offset: usize },
}

/// What went wrong while replaying one move
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayErrorKind {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Notation resolved but the rules engine refused the move
    #[error("Replay desync: {0}")]
    Desync(RulesError),

    /// Declared move number/color names no move on the enclosing line
    #[error("Unknown anchor: no move at ply {anchor_ply} on a line of {line_len} moves")]
    UnknownAnchor { anchor_ply: u32, line_len: usize },

    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// A replay failure with its position in the game
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{move_number}{} {notation}: {kind}", dots(.color))]
pub struct ReplayError {
    pub notation: String,
    pub move_number: u32,
    pub color: PieceColor,
    pub kind: ReplayErrorKind,
}

fn dots(color: &PieceColor) -> &'static str {
    match color {
        PieceColor::White => ".",
        PieceColor::Black => "...",
    }
}

/// Errors importing a complete game
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A broken main line leaves no anchors for variations, so import stops
    #[error("Mainline replay failed at {0}")]
    Mainline(#[from] ReplayError),
}

/// Result type alias for resolution
pub type ResolutionResult<T> = Result<T, ResolutionError>;

/// Result type alias for parsing
pub type ParseResult<T> = Result<T, ParseError>;
