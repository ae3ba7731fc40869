//! Chess game resources - game records and the position being edited
//!
//! # Resource Categories
//!
//! ## Game History
//! - [`MoveTree`] - Every recorded move, main line and variations, keyed by [`MoveId`]
//! - [`MoveNode`] - One recorded move with its parent link and ply
//!
//! ## Editing
//! - [`GameCursor`] - Active position, its board and move entry against a rules engine
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use xfchess_pgn::game::resources::GameCursor;
//! use xfchess_pgn::game::rules::StandardRules;
//!
//! let mut cursor = GameCursor::new(StandardRules::new());
//! cursor.play("e4")?;
//! cursor.play("e5")?;
//! cursor.back()?;
//! cursor.play("c5")?; // recorded as a variation to 1... e5
//! ```

pub mod cursor;
pub mod history;

pub use cursor::GameCursor;
pub use history::*;
