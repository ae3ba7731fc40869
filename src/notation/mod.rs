//! Notation module - SAN resolution and PGN-style movetext
//!
//! Converts between text and the move tree. Nothing here knows chess rules;
//! legality always comes from a [`RulesEngine`](crate::game::rules::RulesEngine).
//!
//! # Module Structure
//!
//! - `resolver` - SAN string to origin, destination and promotion
//! - `parser` - movetext to [`ParsedGame`], no rules involved
//! - `replay` - [`ParsedGame`] to [`MoveTree`](crate::game::resources::MoveTree) through the rules engine
//! - `serializer` - tree back to canonical movetext
//! - `outcome` - result tokens
//! - `error` - error enums for each stage
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use xfchess_pgn::game::rules::StandardRules;
//! use xfchess_pgn::notation::{import_game, serialize, GameOutcome};
//!
//! let game = import_game("1. e4 e5 2. Nf3 (2. Bc4) 2... Nc6 *", &StandardRules::new())?;
//! let text = serialize(&game.tree, game.result.unwrap_or(GameOutcome::Unknown));
//! ```

pub mod error;
pub mod outcome;
pub mod parser;
pub mod replay;
pub mod resolver;
pub mod serializer;

pub use error::{
    ImportError, ParseError, ParseResult, ReplayError, ReplayErrorKind, ResolutionError,
    ResolutionResult,
};
pub use outcome::GameOutcome;
pub use parser::{parse_game, ParsedGame, ParsedMove, ParsedVariation, Tag};
pub use replay::{import_game, replay_mainline, replay_variations, ImportedGame};
pub use resolver::{resolve, Resolution};
pub use serializer::{serialize, PgnWriter};
