//! Chess rules module - the legality capability consumed by the notation layer
//!
//! The move tree and the notation code never reimplement movement rules.
//! They talk to a [`RulesEngine`], which owns nothing but knows how to
//! inspect and mutate a board value of its associated `Board` type.
//!
//! # Module Structure
//!
//! - `board_state` - [`StandardRules`], the standard-chess engine backed by `shakmaty`

pub mod board_state;


use crate::game::components::{Piece, PieceType};
use crate::game::error::RulesResult;
use crate::game::types::Square;

// Re-export commonly used items
pub use board_state::StandardRules;

/// Legality and board-mutation capability
///
/// Implementations must be deterministic: replaying the same moves from
/// [`starting_position`](RulesEngine::starting_position) always yields the
/// same board. Variation replay relies on this to restore branch points.
pub trait RulesEngine {
    /// Board occupancy plus whatever side state the rules need
    type Board: Clone;

    /// A board set up at the starting position
    fn starting_position(&self) -> Self::Board;

    /// Piece standing on `square`, if any
    fn piece_at(&self, board: &Self::Board, square: Square) -> Option<Piece>;

    /// Squares the piece on `square` may legally move to
    ///
    /// Already filtered for king safety. Castling is reported as the king's
    /// destination square (g1/c1/g8/c8). Empty when the square is empty or
    /// the piece does not belong to the side to move.
    fn legal_destinations(&self, board: &Self::Board, square: Square) -> Vec<Square>;

    /// Apply a move, returning the captured piece type if any
    ///
    /// `promotion` of `None` on a promoting pawn move promotes to a queen.
    fn apply_move(
        &self,
        board: &mut Self::Board,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> RulesResult<Option<PieceType>>;
}
