//! Click-driven turn controller
//!
//! States: no selection, or one of the current player's pieces selected along
//! with its legal moves. Clicks drive every transition.

use serde::{Deserialize, Serialize};

use super::board::{Board, Cell, Player};
use super::rules::{self, Move};
use crate::error::MoveError;

/// The active selection and the moves it allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub cell: Cell,
    pub moves: Vec<Move>,
}

impl Selection {
    pub fn destinations(&self) -> impl Iterator<Item = Cell> + '_ {
        self.moves.iter().map(|m| m.to)
    }

    fn find(&self, to: Cell) -> Option<Move> {
        self.moves.iter().copied().find(|m| m.to == to)
    }
}

/// A completed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub mv: Move,
    pub player: Player,
    pub captured: Option<Cell>,
    pub promoted: bool,
}

/// What a click did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A piece of the player to move is now selected
    Selected(Cell),
    /// The selected piece moved and the turn passed
    Moved(MoveRecord),
    /// An empty non-destination cell was clicked; selection dropped
    Cleared,
    /// Nothing changed
    Ignored,
}

/// Informational board status. The controller never stops on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckersStatus {
    InProgress,
    /// The named player has no piece that can move
    NoMoves(Player),
}

/// A checkers session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckersGame {
    pub board: Board,
    pub turn: Player,
    pub selection: Option<Selection>,
    pub move_count: u32,
}

impl Default for CheckersGame {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckersGame {
    pub fn new() -> Self {
        Self::with_board(Board::new(), Player::Red)
    }

    /// Start from an arbitrary position.
    pub fn with_board(board: Board, turn: Player) -> Self {
        Self {
            board,
            turn,
            selection: None,
            move_count: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
        log::info!("Checkers reset");
    }

    /// Handle a click on `cell`.
    pub fn click(&mut self, cell: Cell) -> ClickOutcome {
        if self.board.get(cell).is_some_and(|p| p.owner == self.turn) {
            let moves = rules::legal_moves(&self.board, cell);
            log::debug!("{} selected {} ({} moves)", self.turn, cell, moves.len());
            self.selection = Some(Selection { cell, moves });
            return ClickOutcome::Selected(cell);
        }

        let Some(selection) = &self.selection else {
            return ClickOutcome::Ignored;
        };

        if let Some(mv) = selection.find(cell) {
            return ClickOutcome::Moved(self.perform(mv));
        }

        if self.board.is_empty(cell) {
            self.selection = None;
            ClickOutcome::Cleared
        } else {
            ClickOutcome::Ignored
        }
    }

    /// Click by raw coordinates from the presentation layer.
    pub fn click_at(&mut self, row: u8, col: u8) -> Result<ClickOutcome, MoveError> {
        let cell = Cell::new(row, col).ok_or(MoveError::OutOfBounds { row, col })?;
        Ok(self.click(cell))
    }

    /// Apply a move directly, validating it against the rule engine.
    pub fn apply_move(&mut self, from: Cell, to: Cell) -> Result<MoveRecord, MoveError> {
        let piece = self.board.get(from).ok_or(MoveError::NoPiece(from))?;
        if piece.owner != self.turn {
            return Err(MoveError::NotYourPiece(from));
        }
        let mv = rules::legal_moves(&self.board, from)
            .into_iter()
            .find(|m| m.to == to)
            .ok_or(MoveError::IllegalDestination { from, to })?;
        Ok(self.perform(mv))
    }

    /// Legal destinations of the current selection.
    pub fn highlighted(&self) -> Vec<Cell> {
        self.selection
            .as_ref()
            .map(|s| s.destinations().collect())
            .unwrap_or_default()
    }

    pub fn status(&self) -> CheckersStatus {
        if rules::has_any_move(&self.board, self.turn) {
            CheckersStatus::InProgress
        } else {
            CheckersStatus::NoMoves(self.turn)
        }
    }

    fn perform(&mut self, mv: Move) -> MoveRecord {
        let player = self.turn;
        let mut promoted = false;

        if let Some(mut piece) = self.board.take(mv.from) {
            if mv.to.row() == piece.owner.back_rank() {
                promoted = piece.promote();
            }
            self.board.set(mv.to, Some(piece));
        }

        let captured = mv.captured();
        if let Some(cell) = captured {
            self.board.set(cell, None);
        }

        self.turn = player.opponent();
        self.selection = None;
        self.move_count += 1;

        let record = MoveRecord {
            mv,
            player,
            captured,
            promoted,
        };
        log::debug!("{} moved {} -> {} {:?}", player, mv.from, mv.to, record);
        record
    }
}
