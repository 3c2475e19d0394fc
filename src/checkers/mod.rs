//! Checkers engine
//!
//! Pure board model, single-ply move rules and a click-driven turn
//! controller. No rendering or platform dependencies.

pub mod board;
pub mod rules;
pub mod turn;

pub use board::{BOARD_SIZE, Board, Cell, Piece, Player};
pub use rules::{Move, MoveKind, has_any_move, legal_destinations, legal_moves};
pub use turn::{CheckersGame, CheckersStatus, ClickOutcome, MoveRecord, Selection};
