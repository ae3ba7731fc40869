//! Recorded move nodes and their identities

use crate::game::components::{Piece, PieceColor, PieceType};
use crate::game::types::{color_for_ply, move_number_for_ply, Square};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a recorded move
///
/// Allocated from a counter owned by the [`MoveTree`](super::MoveTree):
/// unique for the lifetime of the tree, increasing in creation order and
/// never reused. [`MoveId::ROOT`] stands for the starting position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveId(pub(crate) u64);

impl MoveId {
    /// Sentinel parent of every first move
    pub const ROOT: MoveId = MoveId(0);

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MoveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("root")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// Where a new move goes relative to its parent
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Extends the main line
    Mainline,
    /// Starts a new variation branching off the parent
    NewVariation,
    /// Extends the variation whose first move is `root`
    Continue { root: MoveId },
}

/// Move data supplied by callers of [`MoveTree::insert`](super::MoveTree::insert)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMove {
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    pub captured: Option<PieceType>,
    pub promotion: Option<PieceType>,
    pub notation: Option<String>,
    pub placement: Placement,
}

/// A move stored in the tree
///
/// Immutable once inserted; the tree only attaches children to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveNode {
    pub id: MoveId,
    pub parent: MoveId,
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    pub captured: Option<PieceType>,
    pub promotion: Option<PieceType>,
    /// Half-moves from the starting position, 1 for White's first move
    pub ply: u32,
    pub notation: Option<String>,
    pub is_variation: bool,
    /// First move of the variation this node belongs to; `None` on the main line
    pub variation_root: Option<MoveId>,
}

impl MoveNode {
    /// Full-move number as written in movetext
    pub fn move_number(&self) -> u32 {
        move_number_for_ply(self.ply)
    }

    /// Color that played this move
    pub fn color(&self) -> PieceColor {
        color_for_ply(self.ply)
    }

    /// True for the first move of a variation
    pub fn is_variation_root(&self) -> bool {
        self.variation_root == Some(self.id)
    }

    /// Notation, falling back to coordinate form for moves recorded without text
    pub fn display_notation(&self) -> String {
        match &self.notation {
            Some(text) => text.clone(),
            None => {
                let promotion = self
                    .promotion
                    .and_then(PieceType::san_letter)
                    .map(|c| c.to_ascii_lowercase().to_string())
                    .unwrap_or_default();
                format!("{}{}{}", self.from, self.to, promotion)
            }
        }
    }
}
