//! Move tree store
//!
//! Keeps every recorded move of a game, main line and variations alike, as
//! an arena of [`MoveNode`]s keyed by [`MoveId`]. Parent links are stored on
//! the nodes and child lists are kept per parent in creation order, so all
//! queries walk at most one line or one child list.
//!
//! # Shape of the tree
//!
//! ```text
//! root ── e4 ── e5 ── Nf3 ── Nc6        mainline (is_variation = false)
//!   │            ├── Bc4 ── Nf6         variation rooted at Bc4, anchored at e5
//!   │            │     └── Bc5          nested variation anchored at Bc4
//!   └── d4 ── d5                        variation anchored at the root
//! ```
//!
//! Siblings are alternatives: a parent has at most one mainline child and
//! any number of variation roots.
//!
//! # Caches
//!
//! The tree maintains a ply -> identity index of the main line on insert.
//! Removing a mainline node truncates that index.

use super::node::{MoveId, MoveNode, NewMove, Placement};
use crate::game::error::{TreeError, TreeResult};
use smallvec::SmallVec;
use std::collections::HashMap;
use tracing::debug;

type ChildList = SmallVec<[MoveId; 2]>;

/// All recorded moves of one game
#[derive(Debug, Clone, Default)]
pub struct MoveTree {
    nodes: HashMap<MoveId, MoveNode>,
    children: HashMap<MoveId, ChildList>,
    /// `mainline[ply - 1]` is the mainline move at `ply`
    mainline: Vec<MoveId>,
    last_id: u64,
}

impl MoveTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a move played after `parent` and return its fresh identity
    ///
    /// # Errors
    ///
    /// - [`TreeError::UnknownParent`] when `parent` is neither a stored move nor [`MoveId::ROOT`]
    /// - [`TreeError::MainlineConflict`] when the parent already has a mainline continuation
    /// - [`TreeError::MainlineUnderVariation`] when a mainline move would follow a variation move
    /// - [`TreeError::VariationRootMismatch`] when continuing a variation from a move outside it
    /// - [`TreeError::ContinuationConflict`] when that variation already continues from the parent
    pub fn insert(&mut self, parent: MoveId, new_move: NewMove) -> TreeResult<MoveId> {
        let parent_node = if parent.is_root() {
            None
        } else {
            Some(
                self.nodes
                    .get(&parent)
                    .ok_or(TreeError::UnknownParent(parent))?,
            )
        };
        let parent_ply = parent_node.map_or(0, |node| node.ply);

        let continued_root = match new_move.placement {
            Placement::Mainline => {
                if parent_node.is_some_and(|node| node.is_variation) {
                    return Err(TreeError::MainlineUnderVariation { parent });
                }
                if let Some(existing) = self.primary_child(parent) {
                    return Err(TreeError::MainlineConflict {
                        parent,
                        existing: existing.id,
                    });
                }
                None
            }
            Placement::NewVariation => None,
            Placement::Continue { root } => {
                if parent_node.and_then(|node| node.variation_root) != Some(root) {
                    return Err(TreeError::VariationRootMismatch { parent, root });
                }
                if let Some(existing) = self.primary_child(parent) {
                    return Err(TreeError::ContinuationConflict {
                        parent,
                        existing: existing.id,
                    });
                }
                Some(root)
            }
        };

        self.last_id += 1;
        let id = MoveId(self.last_id);
        let is_variation = new_move.placement != Placement::Mainline;
        let node = MoveNode {
            id,
            parent,
            piece: new_move.piece,
            from: new_move.from,
            to: new_move.to,
            captured: new_move.captured,
            promotion: new_move.promotion,
            ply: parent_ply + 1,
            notation: new_move.notation,
            is_variation,
            variation_root: is_variation.then(|| continued_root.unwrap_or(id)),
        };

        debug!(
            "[TREE] Insert {} after {} at ply {} ({:?})",
            id, parent, node.ply, new_move.placement
        );

        // Parent is the root or the last mainline move, so the index stays contiguous
        if !is_variation {
            self.mainline.push(id);
        }
        self.children.entry(parent).or_default().push(id);
        self.nodes.insert(id, node);
        Ok(id)
    }

    pub fn get(&self, id: MoveId) -> Option<&MoveNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: MoveId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of stored moves
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every move; identities keep increasing afterwards
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.children.clear();
        self.mainline.clear();
    }

    /// Children of `id` in creation order
    pub fn children_of(&self, id: MoveId) -> Vec<&MoveNode> {
        self.children
            .get(&id)
            .map(|ids| ids.iter().filter_map(|child| self.nodes.get(child)).collect())
            .unwrap_or_default()
    }

    /// The child continuing `id`'s own line
    ///
    /// For the root and mainline moves this is the mainline child; for a
    /// variation move it is the earliest child of the same variation.
    pub fn primary_child(&self, id: MoveId) -> Option<&MoveNode> {
        let line = if id.is_root() {
            None
        } else {
            self.nodes.get(&id)?.variation_root
        };
        self.children_of(id)
            .into_iter()
            .find(|child| child.variation_root == line)
    }

    /// Path from the starting position down to and including `id`
    ///
    /// Empty for [`MoveId::ROOT`] and for unknown identities.
    pub fn line_from(&self, id: MoveId) -> Vec<&MoveNode> {
        let mut line = Vec::new();
        let mut cursor = id;
        while let Some(node) = self.nodes.get(&cursor) {
            line.push(node);
            cursor = node.parent;
        }
        line.reverse();
        line
    }

    /// Moves of the line starting at `start`, following primary children
    ///
    /// Given a variation root this is the variation's own line; given the
    /// first mainline move it is the main line.
    pub fn line_of(&self, start: MoveId) -> Vec<&MoveNode> {
        let mut line = Vec::new();
        let mut current = self.nodes.get(&start);
        while let Some(node) = current {
            line.push(node);
            current = self.primary_child(node.id);
        }
        line
    }

    /// Parent of a variation's first move
    ///
    /// `None` when `variation_root` is not the first move of a variation.
    pub fn anchor_for(&self, variation_root: MoveId) -> Option<MoveId> {
        self.nodes
            .get(&variation_root)
            .filter(|node| node.is_variation_root())
            .map(|node| node.parent)
    }

    /// First moves of the variations branching off `anchor`
    pub fn variation_roots_at(&self, anchor: MoveId) -> Vec<&MoveNode> {
        self.children_of(anchor)
            .into_iter()
            .filter(|child| child.is_variation_root())
            .collect()
    }

    /// Variations offering an alternative to `id`
    ///
    /// These are the other variation roots among `id`'s siblings.
    pub fn alternatives_to(&self, id: MoveId) -> Vec<&MoveNode> {
        let Some(node) = self.nodes.get(&id) else {
            return Vec::new();
        };
        self.variation_roots_at(node.parent)
            .into_iter()
            .filter(|sibling| sibling.id != id)
            .collect()
    }

    /// Main line moves in order
    pub fn mainline(&self) -> Vec<&MoveNode> {
        self.mainline
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .collect()
    }

    /// Mainline move at `ply` (1-based)
    pub fn mainline_at(&self, ply: u32) -> Option<&MoveNode> {
        let index = usize::try_from(ply).ok()?.checked_sub(1)?;
        self.mainline.get(index).and_then(|id| self.nodes.get(id))
    }

    pub fn mainline_len(&self) -> usize {
        self.mainline.len()
    }

    /// Every move in creation order
    pub fn iter(&self) -> impl Iterator<Item = &MoveNode> {
        let mut nodes: Vec<&MoveNode> = self.nodes.values().collect();
        nodes.sort_by_key(|node| node.id);
        nodes.into_iter()
    }

    /// Remove `id` and everything played after it, returning the number of removed moves
    pub fn remove_subtree(&mut self, id: MoveId) -> TreeResult<usize> {
        if id.is_root() {
            return Err(TreeError::SentinelRemoval);
        }
        let node = self.nodes.get(&id).ok_or(TreeError::UnknownNode(id))?;
        let (parent, ply, is_variation) = (node.parent, node.ply, node.is_variation);

        if let Some(siblings) = self.children.get_mut(&parent) {
            siblings.retain(|child| *child != id);
            if siblings.is_empty() {
                self.children.remove(&parent);
            }
        }

        let mut removed = 0;
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if let Some(children) = self.children.remove(&current) {
                pending.extend(children);
            }
            if self.nodes.remove(&current).is_some() {
                removed += 1;
            }
        }

        if !is_variation {
            self.mainline.truncate(ply.saturating_sub(1) as usize);
        }

        debug!("[TREE] Removed {} moves from {}", removed, id);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::components::{Piece, PieceColor, PieceType};
    use crate::game::types::Square;

    fn new_move(notation: &str, placement: Placement) -> NewMove {
        NewMove {
            piece: Piece::new(PieceColor::White, PieceType::Pawn),
            from: Square::from_algebraic("a2").unwrap(),
            to: Square::from_algebraic("a3").unwrap(),
            captured: None,
            promotion: None,
            notation: Some(notation.to_string()),
            placement,
        }
    }

    /// root - e4 - e5 - Nf3 with (Bc4 Nf6) anchored at e5 and (d4) at the root
    fn sample_tree() -> (MoveTree, [MoveId; 6]) {
        let mut tree = MoveTree::new();
        let e4 = tree.insert(MoveId::ROOT, new_move("e4", Placement::Mainline)).unwrap();
        let e5 = tree.insert(e4, new_move("e5", Placement::Mainline)).unwrap();
        let nf3 = tree.insert(e5, new_move("Nf3", Placement::Mainline)).unwrap();
        let bc4 = tree.insert(e5, new_move("Bc4", Placement::NewVariation)).unwrap();
        let nf6 = tree
            .insert(bc4, new_move("Nf6", Placement::Continue { root: bc4 }))
            .unwrap();
        let d4 = tree
            .insert(MoveId::ROOT, new_move("d4", Placement::NewVariation))
            .unwrap();
        (tree, [e4, e5, nf3, bc4, nf6, d4])
    }

    fn notations(nodes: &[&MoveNode]) -> Vec<String> {
        nodes.iter().map(|n| n.display_notation()).collect()
    }

    #[test]
    fn test_move_tree_default() {
        //! Verifies a new tree starts empty
        let tree = MoveTree::default();

        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.mainline_len(), 0);
        assert!(tree.children_of(MoveId::ROOT).is_empty());
    }

    #[test]
    fn test_identities_increase_and_are_never_reused() {
        let (mut tree, [_, e5, nf3, ..]) = sample_tree();
        assert!(nf3 > e5);

        tree.remove_subtree(nf3).unwrap();
        let again = tree.insert(e5, new_move("Nf3", Placement::Mainline)).unwrap();
        assert!(again > nf3, "removed identities must not be handed out again");
    }

    #[test]
    fn test_ply_is_parent_ply_plus_one() {
        let (tree, [e4, e5, _, bc4, nf6, d4]) = sample_tree();

        assert_eq!(tree.get(e4).unwrap().ply, 1);
        assert_eq!(tree.get(e5).unwrap().ply, 2);
        assert_eq!(tree.get(bc4).unwrap().ply, 3);
        assert_eq!(tree.get(nf6).unwrap().ply, 4);
        assert_eq!(tree.get(d4).unwrap().ply, 1);
    }

    #[test]
    fn test_variation_root_identity() {
        let (tree, [_, e5, nf3, bc4, nf6, _]) = sample_tree();

        let root = tree.get(bc4).unwrap();
        assert!(root.is_variation);
        assert_eq!(root.variation_root, Some(bc4));
        assert_eq!(tree.get(nf6).unwrap().variation_root, Some(bc4));
        assert_eq!(tree.get(nf3).unwrap().variation_root, None);
        assert_eq!(tree.anchor_for(bc4), Some(e5));
        assert_eq!(tree.anchor_for(nf6), None, "only variation roots have anchors");
    }

    #[test]
    fn test_children_in_creation_order() {
        let (tree, [_, e5, nf3, bc4, ..]) = sample_tree();

        let children: Vec<MoveId> = tree.children_of(e5).iter().map(|n| n.id).collect();
        assert_eq!(children, vec![nf3, bc4]);
        assert_eq!(tree.primary_child(e5).map(|n| n.id), Some(nf3));
        assert_eq!(tree.primary_child(bc4).map(|n| n.notation.clone()), Some(Some("Nf6".into())));
    }

    #[test]
    fn test_line_from_and_line_of() {
        let (tree, [e4, _, _, bc4, nf6, d4]) = sample_tree();

        assert_eq!(notations(&tree.line_from(nf6)), ["e4", "e5", "Bc4", "Nf6"]);
        assert_eq!(notations(&tree.line_of(bc4)), ["Bc4", "Nf6"]);
        assert_eq!(notations(&tree.line_of(e4)), ["e4", "e5", "Nf3"]);
        assert_eq!(notations(&tree.line_of(d4)), ["d4"]);
        assert!(tree.line_from(MoveId::ROOT).is_empty());
    }

    #[test]
    fn test_mainline_index() {
        let (tree, [e4, _, nf3, ..]) = sample_tree();

        assert_eq!(tree.mainline_len(), 3);
        assert_eq!(tree.mainline_at(1).map(|n| n.id), Some(e4));
        assert_eq!(tree.mainline_at(3).map(|n| n.id), Some(nf3));
        assert!(tree.mainline_at(0).is_none());
        assert!(tree.mainline_at(4).is_none());
        assert_eq!(notations(&tree.mainline()), ["e4", "e5", "Nf3"]);
    }

    #[test]
    fn test_alternatives() {
        let (tree, [e4, _, nf3, bc4, _, d4]) = sample_tree();

        let alternatives: Vec<MoveId> = tree.alternatives_to(nf3).iter().map(|n| n.id).collect();
        assert_eq!(alternatives, vec![bc4]);
        let alternatives: Vec<MoveId> = tree.alternatives_to(e4).iter().map(|n| n.id).collect();
        assert_eq!(alternatives, vec![d4]);
    }

    #[test]
    fn test_insert_rejects_unknown_parent() {
        let mut tree = MoveTree::new();
        let err = tree
            .insert(MoveId(42), new_move("e4", Placement::Mainline))
            .unwrap_err();
        assert_eq!(err, TreeError::UnknownParent(MoveId(42)));
    }

    #[test]
    fn test_insert_rejects_second_mainline_child() {
        //! Siblings must include a variation: two mainline children are invalid
        let (mut tree, [_, e5, nf3, ..]) = sample_tree();
        let err = tree
            .insert(e5, new_move("Nc3", Placement::Mainline))
            .unwrap_err();
        assert_eq!(
            err,
            TreeError::MainlineConflict {
                parent: e5,
                existing: nf3
            }
        );
    }

    #[test]
    fn test_insert_rejects_mainline_after_variation() {
        let (mut tree, [.., nf6, _]) = sample_tree();
        let err = tree
            .insert(nf6, new_move("O-O", Placement::Mainline))
            .unwrap_err();
        assert_eq!(err, TreeError::MainlineUnderVariation { parent: nf6 });
    }

    #[test]
    fn test_insert_rejects_foreign_continuation() {
        let (mut tree, [_, _, nf3, bc4, nf6, _]) = sample_tree();

        let err = tree
            .insert(nf3, new_move("Nc6", Placement::Continue { root: bc4 }))
            .unwrap_err();
        assert_eq!(err, TreeError::VariationRootMismatch { parent: nf3, root: bc4 });

        let err = tree
            .insert(bc4, new_move("Nc6", Placement::Continue { root: bc4 }))
            .unwrap_err();
        assert_eq!(
            err,
            TreeError::ContinuationConflict {
                parent: bc4,
                existing: nf6
            }
        );
    }

    #[test]
    fn test_nested_variation_off_variation_move() {
        let (mut tree, [_, _, _, bc4, nf6, _]) = sample_tree();

        let bc5 = tree
            .insert(bc4, new_move("Bc5", Placement::NewVariation))
            .unwrap();
        assert_eq!(tree.anchor_for(bc5), Some(bc4));
        assert_eq!(tree.primary_child(bc4).map(|n| n.id), Some(nf6));
        let alternatives: Vec<MoveId> = tree.alternatives_to(nf6).iter().map(|n| n.id).collect();
        assert_eq!(alternatives, vec![bc5]);
    }

    #[test]
    fn test_remove_variation_subtree() {
        let (mut tree, [_, e5, nf3, bc4, nf6, _]) = sample_tree();
        tree.insert(bc4, new_move("Bc5", Placement::NewVariation)).unwrap();

        let removed = tree.remove_subtree(bc4).unwrap();
        assert_eq!(removed, 3);
        assert!(!tree.contains(bc4));
        assert!(!tree.contains(nf6));
        assert_eq!(tree.children_of(e5).len(), 1);
        assert_eq!(tree.primary_child(e5).map(|n| n.id), Some(nf3));
        assert_eq!(tree.mainline_len(), 3, "mainline is untouched");
    }

    #[test]
    fn test_remove_mainline_truncates_index() {
        //! Removing a mainline move must also drop it from the ply index
        let (mut tree, [e4, e5, ..]) = sample_tree();

        let removed = tree.remove_subtree(e5).unwrap();
        assert_eq!(removed, 4, "e5, Nf3, Bc4 and Nf6");
        assert_eq!(tree.mainline_len(), 1);
        assert!(tree.mainline_at(2).is_none());

        // The line can be extended again from e4
        let c5 = tree.insert(e4, new_move("c5", Placement::Mainline)).unwrap();
        assert_eq!(tree.mainline_at(2).map(|n| n.id), Some(c5));
    }

    #[test]
    fn test_remove_root_is_rejected() {
        let (mut tree, _) = sample_tree();
        assert_eq!(tree.remove_subtree(MoveId::ROOT), Err(TreeError::SentinelRemoval));
        assert_eq!(tree.remove_subtree(MoveId(999)), Err(TreeError::UnknownNode(MoveId(999))));
    }

    #[test]
    fn test_iter_in_creation_order() {
        let (tree, ids) = sample_tree();
        let order: Vec<MoveId> = tree.iter().map(|n| n.id).collect();
        assert_eq!(order, ids.to_vec());
    }
}
