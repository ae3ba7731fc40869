//! Replaying parsed movetext into a move tree
//!
//! Every SAN string goes through the resolver and the rules engine, so the
//! tree only ever holds legal moves with concrete squares.
//!
//! # Main line
//!
//! Replayed first, from the starting position. The first failure aborts the
//! import: without a complete main line no variation can be anchored.
//!
//! # Variations
//!
//! Replayed afterwards, best effort. For each variation:
//!
//! 1. The anchor is the move at `origin_ply - 1` on the enclosing line (the
//!    main line, or for a nested variation the full path from the start
//!    through its parent variation). Ply 0 is the starting position.
//! 2. The board is reset and the anchor's path replayed from the start.
//! 3. The variation's moves are resolved, applied and inserted.
//! 4. Variations nested inside it run next, each restoring its own anchor.
//! 5. The board is put back where it was before the variation.
//!
//! A failing move abandons the rest of its variation and everything nested
//! in it. Moves already inserted stay. The error is collected and sibling
//! variations carry on.

use crate::game::components::Piece;
use crate::game::error::RulesResult;
use crate::game::resources::{MoveId, MoveTree, NewMove, Placement};
use crate::game::rules::RulesEngine;
use crate::game::types::{color_for_ply, move_number_for_ply};
use crate::notation::error::{ImportError, ReplayError, ReplayErrorKind};
use crate::notation::outcome::GameOutcome;
use crate::notation::parser::{parse_game, ParsedGame, ParsedVariation, Tag};
use crate::notation::resolver::resolve;
use tracing::{debug, info, warn};

/// A game read from text and replayed into a tree
#[derive(Debug, Clone)]
pub struct ImportedGame<B> {
    pub tags: Vec<Tag>,
    pub tree: MoveTree,
    pub result: Option<GameOutcome>,
    /// Position after the last main line move
    pub board: B,
    /// Variations that could not be replayed completely
    pub variation_errors: Vec<ReplayError>,
}

impl<B> ImportedGame<B> {
    pub fn is_clean(&self) -> bool {
        self.variation_errors.is_empty()
    }
}

/// Parse and replay a complete game
///
/// # Errors
///
/// Fails on malformed text or on the first main line move that cannot be
/// replayed. Variation failures are returned in
/// [`ImportedGame::variation_errors`] instead.
pub fn import_game<R: RulesEngine>(
    text: &str,
    rules: &R,
) -> Result<ImportedGame<R::Board>, ImportError> {
    let game = parse_game(text)?;
    let mut board = rules.starting_position();
    let mut tree = MoveTree::new();

    replay_mainline(&game, rules, &mut board, &mut tree)?;
    let variation_errors = replay_variations(&game, rules, &mut board, &mut tree);

    info!(
        "[REPLAY] Imported {} moves ({} on the main line), {} variation errors",
        tree.len(),
        tree.mainline_len(),
        variation_errors.len()
    );

    Ok(ImportedGame {
        tags: game.tags,
        tree,
        result: game.result,
        board,
        variation_errors,
    })
}

/// Replay the main line from the starting position into an empty tree
///
/// On error the tree keeps the moves before the failing one.
pub fn replay_mainline<R: RulesEngine>(
    game: &ParsedGame,
    rules: &R,
    board: &mut R::Board,
    tree: &mut MoveTree,
) -> Result<(), ReplayError> {
    *board = rules.starting_position();
    let mut parent = MoveId::ROOT;
    for parsed in &game.mainline {
        parent = play_into_tree(rules, board, tree, parent, &parsed.san, Placement::Mainline)?;
    }
    debug!("[REPLAY] Main line replayed: {} moves", game.mainline.len());
    Ok(())
}

/// Replay every variation of `game` into a tree holding its main line
///
/// Leaves the board at the end of the main line.
pub fn replay_variations<R: RulesEngine>(
    game: &ParsedGame,
    rules: &R,
    board: &mut R::Board,
    tree: &mut MoveTree,
) -> Vec<ReplayError> {
    let mainline: Vec<MoveId> = tree.mainline().iter().map(|node| node.id).collect();
    let resume = mainline.last().copied().unwrap_or(MoveId::ROOT);

    let mut replay = VariationReplay {
        rules,
        board,
        tree,
        errors: Vec::new(),
    };

    for variation in &game.root_variations {
        replay.variation(variation, &mainline, resume);
    }
    for parsed in &game.mainline {
        for variation in &parsed.variations {
            replay.variation(variation, &mainline, resume);
        }
    }
    replay.errors
}

struct VariationReplay<'a, R: RulesEngine> {
    rules: &'a R,
    board: &'a mut R::Board,
    tree: &'a mut MoveTree,
    errors: Vec<ReplayError>,
}

impl<R: RulesEngine> VariationReplay<'_, R> {
    /// Replay one variation and its nested ones, then restore the board to `resume`
    ///
    /// `enclosing` is the path from the start through the line the variation
    /// appears in; `enclosing[ply - 1]` is the move at `ply`.
    fn variation(&mut self, variation: &ParsedVariation, enclosing: &[MoveId], resume: MoveId) {
        let Some(first) = variation.moves.first() else {
            return;
        };

        let anchor_ply = variation.anchor_ply();
        let anchor = match anchor_ply {
            0 => Some(MoveId::ROOT),
            ply => enclosing.get(ply as usize - 1).copied(),
        };
        let Some(anchor) = anchor else {
            let error = replay_error(
                &first.san,
                first.ply,
                ReplayErrorKind::UnknownAnchor {
                    anchor_ply,
                    line_len: enclosing.len(),
                },
            );
            warn!("[REPLAY] Skipping variation: {}", error);
            self.errors.push(error);
            return;
        };

        if let Err(error) = restore_to(self.rules, self.board, self.tree, anchor) {
            self.errors
                .push(replay_error(&first.san, first.ply, ReplayErrorKind::Desync(error)));
            return;
        }

        let mut path = enclosing[..anchor_ply as usize].to_vec();
        let mut parent = anchor;
        let mut placement = Placement::NewVariation;
        let mut complete = true;
        for parsed in &variation.moves {
            match play_into_tree(self.rules, self.board, self.tree, parent, &parsed.san, placement) {
                Ok(id) => {
                    if placement == Placement::NewVariation {
                        placement = Placement::Continue { root: id };
                    }
                    path.push(id);
                    parent = id;
                }
                Err(error) => {
                    warn!("[REPLAY] Variation abandoned at {}", error);
                    self.errors.push(error);
                    complete = false;
                    break;
                }
            }
        }

        if complete {
            for parsed in &variation.moves {
                for nested in &parsed.variations {
                    self.variation(nested, &path, parent);
                }
            }
        }

        if let Err(error) = restore_to(self.rules, self.board, self.tree, resume) {
            warn!("[REPLAY] Could not restore position after variation: {}", error);
        }
    }
}

/// Reset `board` and replay the path from the start to `id`
pub(crate) fn restore_to<R: RulesEngine>(
    rules: &R,
    board: &mut R::Board,
    tree: &MoveTree,
    id: MoveId,
) -> RulesResult<()> {
    *board = rules.starting_position();
    for node in tree.line_from(id) {
        rules.apply_move(board, node.from, node.to, node.promotion)?;
    }
    Ok(())
}

/// Resolve `san` for the side to move after `parent`, apply it and record it
fn play_into_tree<R: RulesEngine>(
    rules: &R,
    board: &mut R::Board,
    tree: &mut MoveTree,
    parent: MoveId,
    san: &str,
    placement: Placement,
) -> Result<MoveId, ReplayError> {
    let ply = tree.get(parent).map_or(0, |node| node.ply) + 1;
    let color = color_for_ply(ply);

    let resolution =
        resolve(san, color, board, rules).map_err(|e| replay_error(san, ply, e.into()))?;
    let captured = rules
        .apply_move(board, resolution.from, resolution.to, resolution.promotion)
        .map_err(|e| replay_error(san, ply, ReplayErrorKind::Desync(e)))?;

    tree.insert(
        parent,
        NewMove {
            piece: Piece::new(color, resolution.piece.piece_type),
            from: resolution.from,
            to: resolution.to,
            captured,
            promotion: resolution.promotion,
            notation: Some(san.to_string()),
            placement,
        },
    )
    .map_err(|e| replay_error(san, ply, e.into()))
}

fn replay_error(san: &str, ply: u32, kind: ReplayErrorKind) -> ReplayError {
    ReplayError {
        notation: san.to_string(),
        move_number: move_number_for_ply(ply),
        color: color_for_ply(ply),
        kind,
    }
}
