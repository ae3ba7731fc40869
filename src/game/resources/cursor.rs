//! Game cursor - a position inside the move tree plus its board
//!
//! Playing a move records it relative to the cursor position:
//!
//! ```text
//! at the live edge of the main line     -> main line move
//! at the live edge of a variation       -> continues that variation
//! anywhere with a continuation already  -> new variation anchored here
//! ```
//!
//! A move identical to an existing child is not recorded twice; the cursor
//! just follows it.
//!
//! Moving backwards or jumping restores the board by replaying the path
//! from the starting position.

use super::history::{MoveId, MoveNode, MoveTree, NewMove, Placement};
use crate::game::components::{Piece, PieceColor};
use crate::game::error::{GameResult, TreeError};
use crate::game::rules::RulesEngine;
use crate::game::types::color_for_ply;
use crate::notation::replay::restore_to;
use crate::notation::{resolve, GameOutcome, ImportedGame, PgnWriter, Tag};
use tracing::debug;

/// Editable game: rules engine, board, move tree and the active position
#[derive(Debug, Clone)]
pub struct GameCursor<R: RulesEngine> {
    rules: R,
    board: R::Board,
    tree: MoveTree,
    position: MoveId,
    tags: Vec<Tag>,
    result: GameOutcome,
}

impl<R: RulesEngine> GameCursor<R> {
    pub fn new(rules: R) -> Self {
        let board = rules.starting_position();
        Self {
            rules,
            board,
            tree: MoveTree::new(),
            position: MoveId::ROOT,
            tags: Vec::new(),
            result: GameOutcome::Unknown,
        }
    }

    /// Take over an imported game, positioned at the end of its main line
    pub fn from_import(game: ImportedGame<R::Board>, rules: R) -> Self {
        let position = game
            .tree
            .mainline()
            .last()
            .map_or(MoveId::ROOT, |node| node.id);
        Self {
            rules,
            board: game.board,
            tree: game.tree,
            position,
            tags: game.tags,
            result: game.result.unwrap_or_default(),
        }
    }

    pub fn tree(&self) -> &MoveTree {
        &self.tree
    }

    pub fn board(&self) -> &R::Board {
        &self.board
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn position(&self) -> MoveId {
        self.position
    }

    /// The move leading to the current position; `None` at the start
    pub fn current(&self) -> Option<&MoveNode> {
        self.tree.get(self.position)
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn set_tag(&mut self, name: &str, value: &str) {
        match self.tags.iter_mut().find(|tag| tag.name == name) {
            Some(tag) => tag.value = value.to_string(),
            None => self.tags.push(Tag::new(name, value)),
        }
    }

    pub fn result(&self) -> GameOutcome {
        self.result
    }

    pub fn set_result(&mut self, result: GameOutcome) {
        self.result = result;
    }

    pub fn side_to_move(&self) -> PieceColor {
        let ply = self.current().map_or(0, |node| node.ply);
        color_for_ply(ply + 1)
    }

    /// Resolve `san` for the side to move, apply it and record it
    ///
    /// Returns the identity of the move now under the cursor.
    pub fn play(&mut self, san: &str) -> GameResult<MoveId> {
        let san = san.trim();
        let color = self.side_to_move();
        let resolution = resolve(san, color, &self.board, &self.rules)?;

        let existing = self
            .tree
            .children_of(self.position)
            .into_iter()
            .find(|child| {
                child.from == resolution.from
                    && child.to == resolution.to
                    && child.promotion == resolution.promotion
            })
            .map(|child| child.id);

        let captured =
            self.rules
                .apply_move(&mut self.board, resolution.from, resolution.to, resolution.promotion)?;

        if let Some(id) = existing {
            debug!("[CURSOR] {} already recorded as {}", san, id);
            self.position = id;
            return Ok(id);
        }

        let placement = match self.tree.primary_child(self.position) {
            Some(_) => Placement::NewVariation,
            None => self
                .current()
                .and_then(|node| node.variation_root)
                .map_or(Placement::Mainline, |root| Placement::Continue { root }),
        };

        let id = self.tree.insert(
            self.position,
            NewMove {
                piece: Piece::new(color, resolution.piece.piece_type),
                from: resolution.from,
                to: resolution.to,
                captured,
                promotion: resolution.promotion,
                notation: Some(san.to_string()),
                placement,
            },
        )?;
        self.position = id;
        Ok(id)
    }

    /// Step back one move; `false` at the starting position
    pub fn back(&mut self) -> GameResult<bool> {
        let Some(parent) = self.current().map(|node| node.parent) else {
            return Ok(false);
        };
        self.jump_to(parent)?;
        Ok(true)
    }

    /// Follow the current line one move; `false` at its live edge
    pub fn forward(&mut self) -> GameResult<bool> {
        let Some(next) = self.tree.primary_child(self.position) else {
            return Ok(false);
        };
        let (id, from, to, promotion) = (next.id, next.from, next.to, next.promotion);
        self.rules.apply_move(&mut self.board, from, to, promotion)?;
        self.position = id;
        Ok(true)
    }

    /// Move the cursor to `id` and rebuild the board from the start
    pub fn jump_to(&mut self, id: MoveId) -> GameResult<()> {
        if !id.is_root() && !self.tree.contains(id) {
            return Err(TreeError::UnknownNode(id).into());
        }
        restore_to(&self.rules, &mut self.board, &self.tree, id)?;
        self.position = id;
        Ok(())
    }

    /// Remove `id` and every move after it
    ///
    /// If the cursor was inside the removed part it moves to the move
    /// before `id`. Returns the number of removed moves.
    pub fn delete_variation(&mut self, id: MoveId) -> GameResult<usize> {
        let parent = self
            .tree
            .get(id)
            .map(|node| node.parent)
            .ok_or(TreeError::UnknownNode(id))?;
        let cursor_inside = self
            .tree
            .line_from(self.position)
            .iter()
            .any(|node| node.id == id);

        let removed = self.tree.remove_subtree(id)?;
        if cursor_inside {
            self.jump_to(parent)?;
        }
        Ok(removed)
    }

    pub fn to_pgn(&self, writer: &PgnWriter) -> String {
        writer.write(&self.tags, &self.tree, self.result)
    }
}
