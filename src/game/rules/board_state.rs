//! Standard chess rules backed by `shakmaty`
//!
//! The board value is a [`shakmaty::Chess`] position. Squares, pieces and
//! moves are translated at this boundary so nothing above it sees
//! `shakmaty` types.

use super::RulesEngine;
use crate::game::components::{Piece, PieceColor, PieceType};
use crate::game::error::{RulesError, RulesResult};
use crate::game::types::Square;
use shakmaty::{Chess, Move, Position, Role};
use tracing::trace;

/// Rules engine for orthodox chess from the standard starting position
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRules;

impl StandardRules {
    pub fn new() -> Self {
        Self
    }
}

impl RulesEngine for StandardRules {
    type Board = Chess;

    fn starting_position(&self) -> Chess {
        Chess::default()
    }

    fn piece_at(&self, board: &Chess, square: Square) -> Option<Piece> {
        board
            .board()
            .piece_at(to_engine_square(square))
            .map(|piece| Piece::new(from_engine_color(piece.color), from_role(piece.role)))
    }

    fn legal_destinations(&self, board: &Chess, square: Square) -> Vec<Square> {
        let origin = to_engine_square(square);
        let mut destinations = Vec::new();
        for mv in board.legal_moves().iter() {
            if mv.from() != Some(origin) {
                continue;
            }
            // Promotions list one move per piece type, all to the same square
            if let Some(to) = destination_of(mv) {
                if !destinations.contains(&to) {
                    destinations.push(to);
                }
            }
        }
        destinations
    }

    fn apply_move(
        &self,
        board: &mut Chess,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> RulesResult<Option<PieceType>> {
        let origin = to_engine_square(from);
        if board.board().piece_at(origin).is_none() {
            return Err(RulesError::NoPieceAt { square: from });
        }

        let mv = board
            .legal_moves()
            .iter()
            .find(|mv| {
                mv.from() == Some(origin)
                    && destination_of(mv) == Some(to)
                    && promotion_matches(mv.promotion(), promotion)
            })
            .cloned()
            .ok_or(RulesError::IllegalMove {
                from,
                to,
                promotion,
            })?;

        let captured = mv.capture().map(from_role);
        trace!("[RULES] {}{} captured={:?}", from, to, captured);
        board.play_unchecked(&mv);
        Ok(captured)
    }
}

/// Square the moving piece lands on
///
/// `shakmaty` encodes castling as king-takes-rook; callers of the rules
/// engine speak in king destinations instead.
fn destination_of(mv: &Move) -> Option<Square> {
    match mv {
        Move::Castle { king, rook } => {
            let king = *king as u8;
            let rook = *rook as u8;
            let file = if rook % 8 > king % 8 { 6 } else { 2 };
            Square::from_index(king / 8 * 8 + file)
        }
        other => Square::from_index(other.to() as u8),
    }
}

fn promotion_matches(engine: Option<Role>, wanted: Option<PieceType>) -> bool {
    match (engine, wanted) {
        (None, None) => true,
        (None, Some(_)) => false,
        (Some(role), None) => role == Role::Queen,
        (Some(role), Some(piece_type)) => role == to_role(piece_type),
    }
}

fn to_engine_square(square: Square) -> shakmaty::Square {
    shakmaty::Square::new(u32::from(square.index()))
}

fn from_engine_color(color: shakmaty::Color) -> PieceColor {
    match color {
        shakmaty::Color::White => PieceColor::White,
        shakmaty::Color::Black => PieceColor::Black,
    }
}

fn from_role(role: Role) -> PieceType {
    match role {
        Role::Pawn => PieceType::Pawn,
        Role::Knight => PieceType::Knight,
        Role::Bishop => PieceType::Bishop,
        Role::Rook => PieceType::Rook,
        Role::Queen => PieceType::Queen,
        Role::King => PieceType::King,
    }
}

fn to_role(piece_type: PieceType) -> Role {
    match piece_type {
        PieceType::Pawn => Role::Pawn,
        PieceType::Knight => Role::Knight,
        PieceType::Bishop => Role::Bishop,
        PieceType::Rook => Role::Rook,
        PieceType::Queen => Role::Queen,
        PieceType::King => Role::King,
    }
}
