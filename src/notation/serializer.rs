//! Move tree to movetext
//!
//! Writes the main line as numbered moves, placing each variation in
//! parentheses right after the move it is an alternative to. Variations
//! recurse with the same rules. Alternatives to White's first move have no
//! earlier move to follow and are written after the main line, before the
//! result.
//!
//! White moves always carry their number. A Black move carries `N...` when
//! it opens a line or follows a variation:
//!
//! ```text
//! 1. e4 e5 2. Nf3 (2. Bc4 Nf6) 2... Nc6 (1. d4) *
//! ```
//!
//! The output is canonical: parsing and serializing it again gives the same
//! text.

use crate::core::NotationSettings;
use crate::game::components::PieceColor;
use crate::game::resources::{MoveId, MoveNode, MoveTree};
use crate::game::types::move_number_prefix;
use crate::notation::outcome::GameOutcome;
use crate::notation::parser::Tag;

/// Movetext for `tree` on a single line, ending with the result token
pub fn serialize(tree: &MoveTree, result: GameOutcome) -> String {
    let mut tokens = movetext_tokens(tree);
    tokens.push(result.token().to_string());
    tokens.join(" ")
}

fn movetext_tokens(tree: &MoveTree) -> Vec<String> {
    let mut tokens = Vec::new();
    write_line(tree, &tree.mainline(), &mut tokens);
    for root in tree.variation_roots_at(MoveId::ROOT) {
        if let Some(text) = variation_text(tree, root.id) {
            tokens.push(text);
        }
    }
    tokens
}

/// Append one line's moves with the variations branching off it
fn write_line(tree: &MoveTree, line: &[&MoveNode], tokens: &mut Vec<String>) {
    let mut needs_number = true;
    for (index, node) in line.iter().enumerate() {
        let san = node.display_notation();
        if needs_number || node.color() == PieceColor::White {
            tokens.push(format!("{} {}", move_number_prefix(node.ply), san));
        } else {
            tokens.push(san);
        }
        needs_number = false;

        // The first move's alternatives share its anchor and belong to the enclosing line
        if index > 0 {
            for alternative in tree.alternatives_to(node.id) {
                if let Some(text) = variation_text(tree, alternative.id) {
                    tokens.push(text);
                    needs_number = true;
                }
            }
        }
    }

    // Variations hanging off the last move have no move to follow
    if let Some(last) = line.last() {
        for root in tree.variation_roots_at(last.id) {
            if let Some(text) = variation_text(tree, root.id) {
                tokens.push(text);
            }
        }
    }
}

fn variation_text(tree: &MoveTree, root: MoveId) -> Option<String> {
    let line = tree.line_of(root);
    if line.is_empty() {
        return None;
    }
    let mut tokens = Vec::new();
    write_line(tree, &line, &mut tokens);
    Some(format!("({})", tokens.join(" ")))
}

/// Full game writer: tag block, wrapped movetext and result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PgnWriter {
    /// Wrap movetext at this many characters; 0 keeps it on one line
    pub line_width: usize,
    pub include_tags: bool,
}

impl Default for PgnWriter {
    fn default() -> Self {
        Self {
            line_width: 80,
            include_tags: true,
        }
    }
}

impl PgnWriter {
    pub fn from_settings(settings: &NotationSettings) -> Self {
        Self {
            line_width: settings.line_width,
            include_tags: settings.include_tags,
        }
    }

    pub fn write(&self, tags: &[Tag], tree: &MoveTree, result: GameOutcome) -> String {
        let mut out = String::new();
        if self.include_tags && !tags.is_empty() {
            for tag in tags {
                out.push_str(&format!("[{} \"{}\"]\n", tag.name, escape_tag_value(&tag.value)));
            }
            out.push('\n');
        }
        let movetext = serialize(tree, result);
        out.push_str(&wrap(&movetext, self.line_width));
        out.push('\n');
        out
    }
}

fn escape_tag_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Greedy word wrap; words longer than `width` get a line of their own
fn wrap(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut line_len = 0;
    for word in text.split(' ').filter(|word| !word.is_empty()) {
        let word_len = word.chars().count();
        if line_len > 0 && line_len + 1 + word_len > width {
            out.push('\n');
            line_len = 0;
        } else if line_len > 0 {
            out.push(' ');
            line_len += 1;
        }
        out.push_str(word);
        line_len += word_len;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::components::{Piece, PieceType};
    use crate::game::resources::{NewMove, Placement};
    use crate::game::types::Square;

    /// Tree nodes only need notation and structure here; squares are placeholders
    fn add(tree: &mut MoveTree, parent: MoveId, san: &str, placement: Placement) -> MoveId {
        let square = Square::from_algebraic("a1").unwrap();
        tree.insert(
            parent,
            NewMove {
                piece: Piece::new(PieceColor::White, PieceType::Pawn),
                from: square,
                to: square,
                captured: None,
                promotion: None,
                notation: Some(san.to_string()),
                placement,
            },
        )
        .unwrap()
    }

    fn mainline(tree: &mut MoveTree, sans: &[&str]) -> Vec<MoveId> {
        let mut parent = MoveId::ROOT;
        sans.iter()
            .map(|san| {
                parent = add(tree, parent, san, Placement::Mainline);
                parent
            })
            .collect()
    }

    fn variation(tree: &mut MoveTree, anchor: MoveId, sans: &[&str]) -> Vec<MoveId> {
        let mut ids = Vec::new();
        let mut parent = anchor;
        for san in sans {
            let placement = match ids.first() {
                Some(&root) => Placement::Continue { root },
                None => Placement::NewVariation,
            };
            parent = add(tree, parent, san, placement);
            ids.push(parent);
        }
        ids
    }

    // ============================================================================
    // Main Line Tests
    // ============================================================================

    #[test]
    fn test_empty_tree_is_result_only() {
        let tree = MoveTree::new();
        assert_eq!(serialize(&tree, GameOutcome::Unknown), "*");
        assert_eq!(serialize(&tree, GameOutcome::Draw), "1/2-1/2");
    }

    #[test]
    fn test_mainline_numbering() {
        let mut tree = MoveTree::new();
        mainline(&mut tree, &["e4", "e5", "Nf3", "Nc6", "Bb5"]);
        assert_eq!(
            serialize(&tree, GameOutcome::WhiteWins),
            "1. e4 e5 2. Nf3 Nc6 3. Bb5 1-0"
        );
    }

    // ============================================================================
    // Variation Tests
    // ============================================================================

    #[test]
    fn test_variation_after_white_move_numbers_black_reply() {
        let mut tree = MoveTree::new();
        let ids = mainline(&mut tree, &["e4", "e5", "Nf3", "Nc6"]);
        variation(&mut tree, ids[1], &["Bc4"]);
        assert_eq!(
            serialize(&tree, GameOutcome::Unknown),
            "1. e4 e5 2. Nf3 (2. Bc4) 2... Nc6 *"
        );
    }

    #[test]
    fn test_variation_on_black_move() {
        let mut tree = MoveTree::new();
        let ids = mainline(&mut tree, &["e4", "e5", "Nf3"]);
        variation(&mut tree, ids[0], &["c5", "Nf3", "d6"]);
        assert_eq!(
            serialize(&tree, GameOutcome::Unknown),
            "1. e4 e5 (1... c5 2. Nf3 d6) 2. Nf3 *"
        );
    }

    #[test]
    fn test_root_variations_follow_mainline() {
        let mut tree = MoveTree::new();
        mainline(&mut tree, &["e4", "e5"]);
        variation(&mut tree, MoveId::ROOT, &["d4", "d5"]);
        variation(&mut tree, MoveId::ROOT, &["c4"]);
        assert_eq!(
            serialize(&tree, GameOutcome::Unknown),
            "1. e4 e5 (1. d4 d5) (1. c4) *"
        );
    }

    #[test]
    fn test_nested_variation() {
        let mut tree = MoveTree::new();
        let ids = mainline(&mut tree, &["e4", "e5", "Nf3", "Nc6"]);
        let outer = variation(&mut tree, ids[1], &["Bc4", "Nf6", "d3"]);
        variation(&mut tree, outer[0], &["Bc5", "c3"]);
        assert_eq!(
            serialize(&tree, GameOutcome::Unknown),
            "1. e4 e5 2. Nf3 (2. Bc4 Nf6 (2... Bc5 3. c3) 3. d3) 2... Nc6 *"
        );
    }

    #[test]
    fn test_variation_off_last_move() {
        //! A variation anchored at the final move is written after it with its own number
        let mut tree = MoveTree::new();
        let ids = mainline(&mut tree, &["e4", "e5"]);
        variation(&mut tree, ids[1], &["Nf3"]);
        assert_eq!(serialize(&tree, GameOutcome::Unknown), "1. e4 e5 (2. Nf3) *");
    }

    #[test]
    fn test_moves_without_notation_use_coordinates() {
        let mut tree = MoveTree::new();
        tree.insert(
            MoveId::ROOT,
            NewMove {
                piece: Piece::new(PieceColor::White, PieceType::Pawn),
                from: Square::from_algebraic("e2").unwrap(),
                to: Square::from_algebraic("e4").unwrap(),
                captured: None,
                promotion: None,
                notation: None,
                placement: Placement::Mainline,
            },
        )
        .unwrap();
        assert_eq!(serialize(&tree, GameOutcome::Unknown), "1. e2e4 *");
    }

    // ============================================================================
    // Writer Tests
    // ============================================================================

    #[test]
    fn test_writer_tags_and_escaping() {
        let mut tree = MoveTree::new();
        mainline(&mut tree, &["e4"]);
        let tags = vec![Tag::new("Event", "Club \"Open\""), Tag::new("Round", "1")];

        let text = PgnWriter::default().write(&tags, &tree, GameOutcome::Unknown);
        assert_eq!(text, "[Event \"Club \\\"Open\\\"\"]\n[Round \"1\"]\n\n1. e4 *\n");

        let writer = PgnWriter {
            include_tags: false,
            ..PgnWriter::default()
        };
        assert_eq!(writer.write(&tags, &tree, GameOutcome::Unknown), "1. e4 *\n");
    }

    #[test]
    fn test_writer_wraps_movetext() {
        let mut tree = MoveTree::new();
        mainline(&mut tree, &["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"]);
        let writer = PgnWriter {
            line_width: 12,
            include_tags: true,
        };
        let text = writer.write(&[], &tree, GameOutcome::Unknown);
        assert_eq!(text, "1. e4 e5 2.\nNf3 Nc6 3.\nBb5 a6 *\n");
        assert!(text.lines().all(|line| line.len() <= 12));
    }

    #[test]
    fn test_wrap_width_zero_keeps_one_line() {
        assert_eq!(wrap("1. e4 e5 *", 0), "1. e4 e5 *");
        assert_eq!(wrap("abcdefgh ij", 4), "abcdefgh\nij");
    }
}
