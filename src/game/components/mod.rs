//! Chess game components module
//!
//! Pure data shared by the rules adapter, the move tree and the notation code.

pub mod piece;

// Re-export all components for convenience
pub use piece::*;
