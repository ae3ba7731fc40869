//! Error types for game module
//!
//! Covers the two stateful pieces of the game layer: the rules-engine
//! adapter and the move tree.

use crate::game::components::PieceType;
use crate::game::resources::MoveId;
use crate::game::types::Square;

/// Errors reported by a [`RulesEngine`](crate::game::rules::RulesEngine) when applying a move
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    /// The move is not legal in the current position
    #[error("Illegal move: {from}{to}{}", promotion_suffix(.promotion))]
    IllegalMove {
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    },

    /// No piece stands on the origin square
    #[error("No piece at {square}")]
    NoPieceAt { square: Square },
}

fn promotion_suffix(promotion: &Option<PieceType>) -> String {
    promotion
        .and_then(PieceType::san_letter)
        .map(|c| format!("={c}"))
        .unwrap_or_default()
}

/// Errors that can occur while editing the move tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Parent identity is neither the root sentinel nor a stored move
    #[error("Unknown parent move {0}")]
    UnknownParent(MoveId),

    /// Identity does not name a stored move
    #[error("Unknown move {0}")]
    UnknownNode(MoveId),

    /// Parent already has a mainline continuation
    #[error("Move {parent} already has a mainline continuation {existing}")]
    MainlineConflict { parent: MoveId, existing: MoveId },

    /// A mainline move can only follow the start or another mainline move
    #[error("Mainline move cannot follow variation move {parent}")]
    MainlineUnderVariation { parent: MoveId },

    /// A variation continuation must extend a move of the same variation
    #[error("Variation {root} cannot continue from move {parent}")]
    VariationRootMismatch { parent: MoveId, root: MoveId },

    /// The variation already continues from this move
    #[error("Move {parent} already continues its variation with {existing}")]
    ContinuationConflict { parent: MoveId, existing: MoveId },

    /// The starting position cannot be removed
    #[error("The starting position cannot be removed")]
    SentinelRemoval,
}

/// Result type alias for rules-engine operations
pub type RulesResult<T> = Result<T, RulesError>;

/// Result type alias for move tree operations
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors from editing a game through a [`GameCursor`](crate::game::resources::GameCursor)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Resolution(#[from] crate::notation::ResolutionError),

    #[error(transparent)]
    Rules(#[from] RulesError),

    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Result type alias for cursor operations
pub type GameResult<T> = Result<T, GameError>;
