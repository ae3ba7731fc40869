//! XFChess game records
//!
//! Chess games as trees of variations: a move store with stable identities,
//! SAN resolution against a rules engine, and lossless conversion to and
//! from PGN-style movetext.
//!
//! - [`game`] - move tree, game cursor and the rules-engine capability
//! - [`notation`] - SAN resolver, movetext parser, replayer and serializer
//! - [`core`] - persisted output settings

pub mod core;
pub mod game;
pub mod notation;

pub use game::resources::{GameCursor, MoveId, MoveNode, MoveTree};
pub use game::rules::{RulesEngine, StandardRules};
pub use notation::{import_game, serialize, GameOutcome, ImportedGame, PgnWriter};
