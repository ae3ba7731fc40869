//! Game history: the move tree and its node types

#[allow(clippy::module_inception)]
pub mod history;
pub mod node;

// Re-export all public items
pub use history::*;
pub use node::*;
