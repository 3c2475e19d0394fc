use std::fmt;

use serde::{Deserialize, Serialize};

pub const BOARD_SIZE: usize = 8;
/// Rows of pieces each side starts with
const START_ROWS: usize = 3;

/// One of the two checkers sides. Red sits at the bottom and moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Red,
    Black,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Red => Player::Black,
            Player::Black => Player::Red,
        }
    }

    /// Row delta of a non-king step toward the opponent's side.
    pub fn forward(self) -> i8 {
        match self {
            Player::Red => -1,
            Player::Black => 1,
        }
    }

    /// Row on which this player's pieces are crowned.
    pub fn back_rank(self) -> u8 {
        match self {
            Player::Red => 0,
            Player::Black => (BOARD_SIZE - 1) as u8,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Red => f.write_str("red"),
            Player::Black => f.write_str("black"),
        }
    }
}

/// A checkers piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub owner: Player,
    pub is_king: bool,
}

impl Piece {
    pub fn man(owner: Player) -> Self {
        Self {
            owner,
            is_king: false,
        }
    }

    pub fn king(owner: Player) -> Self {
        Self {
            owner,
            is_king: true,
        }
    }

    /// Crown the piece. Returns true only the first time.
    pub fn promote(&mut self) -> bool {
        let was_king = self.is_king;
        self.is_king = true;
        !was_king
    }
}

/// A board coordinate. Only built through [`Cell::new`] and [`Cell::offset`],
/// though a deserialized one may still be off the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    row: u8,
    col: u8,
}

impl Cell {
    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    /// Returns `None` when the coordinate is off the board.
    pub fn new(row: u8, col: u8) -> Option<Self> {
        in_bounds(row as i16, col as i16).then_some(Self { row, col })
    }

    /// The cell `dr` rows and `dc` columns away, if it is on the board.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let row = self.row as i16 + dr as i16;
        let col = self.col as i16 + dc as i16;
        in_bounds(row, col).then(|| Self {
            row: row as u8,
            col: col as u8,
        })
    }

    /// Dark squares are the only playable ones.
    pub fn is_dark(self) -> bool {
        (self.row ^ self.col) & 1 == 1
    }

    /// Cell halfway between two cells two diagonal steps apart.
    pub fn midpoint(self, other: Cell) -> Cell {
        Cell {
            row: ((self.row as u16 + other.row as u16) / 2) as u8,
            col: ((self.col as u16 + other.col as u16) / 2) as u8,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// 8x8 checkers board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates the starting position: Black on the dark squares of rows 0-2,
    /// Red on the dark squares of rows 5-7.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let cell = Cell {
                    row: row as u8,
                    col: col as u8,
                };
                if !cell.is_dark() {
                    continue;
                }
                if row < START_ROWS {
                    board.set(cell, Some(Piece::man(Player::Black)));
                } else if row >= BOARD_SIZE - START_ROWS {
                    board.set(cell, Some(Piece::man(Player::Red)));
                }
            }
        }
        board
    }

    pub fn empty() -> Self {
        Self {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    fn slot(&self, cell: Cell) -> Option<&Option<Piece>> {
        self.cells.get(cell.row as usize)?.get(cell.col as usize)
    }

    fn slot_mut(&mut self, cell: Cell) -> Option<&mut Option<Piece>> {
        self.cells.get_mut(cell.row as usize)?.get_mut(cell.col as usize)
    }

    /// The piece on `cell`; off-board cells are always empty.
    pub fn get(&self, cell: Cell) -> Option<Piece> {
        self.slot(cell).copied().flatten()
    }

    pub fn is_empty(&self, cell: Cell) -> bool {
        self.get(cell).is_none()
    }

    /// Places or clears a piece. Light squares never hold pieces; placing one
    /// there, or anywhere off the board, is refused and returns false.
    pub fn set(&mut self, cell: Cell, piece: Option<Piece>) -> bool {
        if piece.is_some() && !cell.is_dark() {
            log::warn!("refusing to place piece on light square {cell}");
            return false;
        }
        match self.slot_mut(cell) {
            Some(slot) => {
                *slot = piece;
                true
            }
            None => false,
        }
    }

    pub(crate) fn take(&mut self, cell: Cell) -> Option<Piece> {
        self.slot_mut(cell).and_then(Option::take)
    }

    /// All occupied cells in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (Cell, Piece)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cols)| {
            cols.iter().enumerate().filter_map(move |(col, piece)| {
                piece.map(|p| {
                    (
                        Cell {
                            row: row as u8,
                            col: col as u8,
                        },
                        p,
                    )
                })
            })
        })
    }

    pub fn pieces(&self, player: Player) -> impl Iterator<Item = (Cell, Piece)> + '_ {
        self.occupied().filter(move |(_, p)| p.owner == player)
    }

    pub fn count(&self, player: Player) -> usize {
        self.pieces(player).count()
    }
}

fn in_bounds(row: i16, col: i16) -> bool {
    (0..BOARD_SIZE as i16).contains(&row) && (0..BOARD_SIZE as i16).contains(&col)
}
