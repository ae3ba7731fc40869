//! Chess game logic module - move records and the rules they are checked against
//!
//! # Module Organization
//!
//! - `components` - Plain piece data (PieceColor, PieceType, Piece)
//! - `types` - Board coordinates and move-number arithmetic
//! - `rules` - The [`RulesEngine`](rules::RulesEngine) capability and its `shakmaty` implementation
//! - `resources` - The move tree and the game cursor
//! - `error` - Error enums for the rules adapter, the tree and the cursor
//!
//! Nothing in this module parses or prints movetext; see [`crate::notation`].

pub mod components;
pub mod error;
pub mod resources;
pub mod rules;
pub mod types;

pub use error::{GameError, GameResult, RulesError, TreeError};
