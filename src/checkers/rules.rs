//! Move generation
//!
//! One ply only: every piece is considered in isolation, captures are not
//! mandatory and a jump never chains into another jump.

use serde::{Deserialize, Serialize};

use super::board::{Board, Cell, Piece, Player};

/// Diagonal directions in a fixed order so generated moves are stable.
const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    /// One diagonal step onto an empty cell
    Step,
    /// Two diagonal steps over an opposing piece
    Jump { captured: Cell },
}

/// A candidate move for one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Cell,
    pub to: Cell,
    pub kind: MoveKind,
}

impl Move {
    pub fn is_jump(&self) -> bool {
        matches!(self.kind, MoveKind::Jump { .. })
    }

    pub fn captured(&self) -> Option<Cell> {
        match self.kind {
            MoveKind::Jump { captured } => Some(captured),
            MoveKind::Step => None,
        }
    }
}

/// Directions a piece may travel: forward only for men, all four for kings.
pub fn directions(piece: Piece) -> impl Iterator<Item = (i8, i8)> {
    let forward = piece.owner.forward();
    DIAGONALS
        .into_iter()
        .filter(move |&(dr, _)| piece.is_king || dr == forward)
}

/// Legal moves for the piece on `from`. Empty when the cell is empty.
pub fn legal_moves(board: &Board, from: Cell) -> Vec<Move> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };

    let mut moves = Vec::with_capacity(4);
    for (dr, dc) in directions(piece) {
        let Some(adjacent) = from.offset(dr, dc) else {
            continue;
        };
        match board.get(adjacent) {
            None => moves.push(Move {
                from,
                to: adjacent,
                kind: MoveKind::Step,
            }),
            Some(other) if other.owner != piece.owner => {
                if let Some(landing) = adjacent.offset(dr, dc) {
                    if board.is_empty(landing) {
                        moves.push(Move {
                            from,
                            to: landing,
                            kind: MoveKind::Jump { captured: adjacent },
                        });
                    }
                }
            }
            Some(_) => {}
        }
    }
    moves
}

/// Destination cells of [`legal_moves`].
pub fn legal_destinations(board: &Board, from: Cell) -> Vec<Cell> {
    legal_moves(board, from).into_iter().map(|m| m.to).collect()
}

/// Whether any piece of `player` has at least one legal move.
pub fn has_any_move(board: &Board, player: Player) -> bool {
    board
        .pieces(player)
        .any(|(cell, _)| !legal_moves(board, cell).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cell(row: u8, col: u8) -> Cell {
        Cell::new(row, col).unwrap()
    }

    #[test]
    fn test_red_man_steps_forward_from_start() {
        let board = Board::new();
        let dests = legal_destinations(&board, cell(5, 0));
        assert_eq!(dests, vec![cell(4, 1)]);
    }

    #[test]
    fn test_jump_over_opponent_is_the_only_move_when_blocked() {
        let mut board = Board::new();
        board.set(cell(4, 1), Some(Piece::man(Player::Black)));
        let moves = legal_moves(&board, cell(5, 0));
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to, cell(3, 2));
        assert_eq!(moves[0].captured(), Some(cell(4, 1)));
    }

    #[test]
    fn test_cannot_jump_own_piece_or_into_occupied_cell() {
        let mut board = Board::empty();
        board.set(cell(5, 2), Some(Piece::man(Player::Red)));
        board.set(cell(4, 1), Some(Piece::man(Player::Red)));
        board.set(cell(4, 3), Some(Piece::man(Player::Black)));
        board.set(cell(3, 4), Some(Piece::man(Player::Black)));
        assert!(legal_moves(&board, cell(5, 2)).is_empty());
    }

    #[test]
    fn test_jump_landing_off_board_is_excluded() {
        let mut board = Board::empty();
        board.set(cell(2, 1), Some(Piece::man(Player::Red)));
        board.set(cell(1, 0), Some(Piece::man(Player::Black)));
        let dests = legal_destinations(&board, cell(2, 1));
        assert_eq!(dests, vec![cell(1, 2)]);
    }

    #[test]
    fn test_king_moves_in_all_directions() {
        let mut board = Board::empty();
        board.set(cell(3, 4), Some(Piece::king(Player::Black)));
        let mut dests = legal_destinations(&board, cell(3, 4));
        dests.sort_by_key(|c| (c.row(), c.col()));
        assert_eq!(dests, vec![cell(2, 3), cell(2, 5), cell(4, 3), cell(4, 5)]);
    }

    #[test]
    fn test_black_man_moves_down() {
        let board = Board::new();
        let dests = legal_destinations(&board, cell(2, 1));
        assert_eq!(dests, vec![cell(3, 0), cell(3, 2)]);
    }

    #[test]
    fn test_both_sides_have_moves_at_start() {
        let board = Board::new();
        assert!(has_any_move(&board, Player::Red));
        assert!(has_any_move(&board, Player::Black));
        assert!(!has_any_move(&Board::empty(), Player::Red));
    }

    fn arb_board() -> impl Strategy<Value = Board> {
        // Each of the 32 dark squares: empty, red/black man, red/black king
        prop::collection::vec(0u8..5, 32).prop_map(|codes| {
            let mut board = Board::empty();
            let dark = (0..8u8)
                .flat_map(|r| (0..8u8).map(move |c| Cell::new(r, c).unwrap()))
                .filter(|c| c.is_dark());
            for (cell, code) in dark.zip(codes) {
                let piece = match code {
                    1 => Some(Piece::man(Player::Red)),
                    2 => Some(Piece::man(Player::Black)),
                    3 => Some(Piece::king(Player::Red)),
                    4 => Some(Piece::king(Player::Black)),
                    _ => None,
                };
                board.set(cell, piece);
            }
            board
        })
    }

    proptest! {
        #[test]
        fn test_men_only_move_forward_kings_any_diagonal(board in arb_board()) {
            for (from, piece) in board.occupied() {
                for mv in legal_moves(&board, from) {
                    let dr = mv.to.row() as i8 - from.row() as i8;
                    let dc = mv.to.col() as i8 - from.col() as i8;
                    prop_assert_eq!(dr.abs(), dc.abs());
                    prop_assert!(dr.abs() == 1 || dr.abs() == 2);
                    if !piece.is_king {
                        prop_assert_eq!(dr.signum(), piece.owner.forward());
                    }
                    prop_assert!(board.is_empty(mv.to));
                    prop_assert!(mv.to.is_dark());
                }
            }
        }

        #[test]
        fn test_jumps_capture_an_adjacent_opponent(board in arb_board()) {
            for (from, piece) in board.occupied() {
                for mv in legal_moves(&board, from) {
                    if let Some(captured) = mv.captured() {
                        prop_assert_eq!(captured, from.midpoint(mv.to));
                        let victim = board.get(captured);
                        prop_assert!(victim.is_some_and(|v| v.owner != piece.owner));
                    } else {
                        prop_assert_eq!((mv.to.row() as i8 - from.row() as i8).abs(), 1);
                    }
                }
            }
        }
    }
}
