use std::ops::RangeInclusive;

use crate::error::{DraughtsError, Result};
use crate::game::Player;

/// A playable (dark) square, numbered from 1 in reading order.
pub type Square = usize;

/// The smallest board that still leaves an empty row between the two camps.
pub const MIN_BOARD_SIZE: usize = 4;

/// The standard English draughts board size.
pub const STANDARD_BOARD_SIZE: usize = 8;

/// What stands on a square.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Default)]
pub enum CheckerType {
    #[default]
    Empty,
    WhiteMan,
    BlackMan,
    WhiteKing,
    BlackKing,
}

impl CheckerType {
    /// The side owning this checker, `None` for an empty square.
    pub fn owner(self) -> Option<Player> {
        match self {
            CheckerType::WhiteMan | CheckerType::WhiteKing => Some(Player::One),
            CheckerType::BlackMan | CheckerType::BlackKing => Some(Player::Two),
            CheckerType::Empty => None,
        }
    }

    /// `true` for the kings of either colour.
    pub fn is_king(self) -> bool {
        matches!(self, CheckerType::WhiteKing | CheckerType::BlackKing)
    }

    /// The king of the same colour. Kings and empty squares are returned unchanged.
    pub fn crowned(self) -> Self {
        match self {
            CheckerType::WhiteMan => CheckerType::WhiteKing,
            CheckerType::BlackMan => CheckerType::BlackKing,
            other => other,
        }
    }

    /// Directions this checker may step or jump in.
    ///
    /// Men only go forward: whites up the board, blacks down. Kings go everywhere.
    pub fn directions(self) -> &'static [Direction] {
        match self {
            CheckerType::WhiteMan => &Direction::UP,
            CheckerType::BlackMan => &Direction::DOWN,
            CheckerType::WhiteKing | CheckerType::BlackKing => &Direction::ALL,
            CheckerType::Empty => &[],
        }
    }
}

/// The four diagonals, "up" being towards square 1.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Direction {
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];
    pub const UP: [Direction; 2] = [Direction::UpLeft, Direction::UpRight];
    pub const DOWN: [Direction; 2] = [Direction::DownLeft, Direction::DownRight];

    /// `(row, column)` offset of one step.
    fn offsets(self) -> (isize, isize) {
        match self {
            Direction::UpLeft => (-1, -1),
            Direction::UpRight => (-1, 1),
            Direction::DownLeft => (1, -1),
            Direction::DownRight => (1, 1),
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::UpLeft => Direction::DownRight,
            Direction::UpRight => Direction::DownLeft,
            Direction::DownLeft => Direction::UpRight,
            Direction::DownRight => Direction::UpLeft,
        }
    }
}

/// A square draughts board storing only its dark squares.
///
/// Row 0 is the top of the board. Dark squares sit on odd columns of even rows and on even
/// columns of odd rows, so square 1 is the second cell of the top row, as on a standard
/// English draughts board seen from the whites.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CheckerBoard {
    size: usize,
    squares: Vec<CheckerType>,
}

impl Default for CheckerBoard {
    /// The standard 8x8 opening position.
    fn default() -> Self {
        Self::with_opening(STANDARD_BOARD_SIZE)
    }
}

impl CheckerBoard {
    /// Creates a `size` x `size` board set up for the opening.
    ///
    /// Each side fills `size / 2 - 1` rows: the blacks at the top, the whites at the bottom.
    pub fn new(size: usize) -> Result<Self> {
        Self::validate_size(size)?;
        Ok(Self::with_opening(size))
    }

    /// Creates a `size` x `size` board with no checker on it.
    pub fn empty(size: usize) -> Result<Self> {
        Self::validate_size(size)?;
        Ok(Self::without_checkers(size))
    }

    fn validate_size(size: usize) -> Result<()> {
        if size < MIN_BOARD_SIZE || size % 2 != 0 {
            return Err(DraughtsError::InvalidBoardSize(size));
        }
        Ok(())
    }

    fn without_checkers(size: usize) -> Self {
        Self {
            size,
            squares: vec![CheckerType::Empty; size * size / 2],
        }
    }

    fn with_opening(size: usize) -> Self {
        let mut board = Self::without_checkers(size);
        let camp_rows = size / 2 - 1;
        for square in board.squares() {
            let row = board.row_of(square);
            if row < camp_rows {
                board.set(square, CheckerType::BlackMan);
            } else if row >= size - camp_rows {
                board.set(square, CheckerType::WhiteMan);
            }
        }
        board
    }

    /// Number of rows (and columns) of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of playable squares.
    pub fn square_count(&self) -> usize {
        self.squares.len()
    }

    /// All playable squares in ascending order.
    pub fn squares(&self) -> RangeInclusive<Square> {
        1..=self.square_count()
    }

    /// `true` when `square` is a playable square of this board.
    pub fn tile_exists(&self, square: Square) -> bool {
        (1..=self.square_count()).contains(&square)
    }

    /// Row of a square, 0 being the top row.
    ///
    /// # Panics
    ///
    /// Panics if `square` is not on the board.
    pub fn row_of(&self, square: Square) -> usize {
        assert!(self.tile_exists(square), "square {square} is off the board");
        (square - 1) / (self.size / 2)
    }

    fn coordinates(&self, square: Square) -> (usize, usize) {
        let row = self.row_of(square);
        let rank = (square - 1) % (self.size / 2);
        let column = if row % 2 == 0 { 2 * rank + 1 } else { 2 * rank };
        (row, column)
    }

    fn square_at(&self, row: isize, column: isize) -> Option<Square> {
        let size = self.size as isize;
        if !(0..size).contains(&row) || !(0..size).contains(&column) || (row + column) % 2 == 0 {
            return None;
        }
        Some(row as usize * (self.size / 2) + column as usize / 2 + 1)
    }

    /// The diagonal neighbour of `square`, `None` when it falls off the board.
    pub fn neighbor(&self, square: Square, direction: Direction) -> Option<Square> {
        if !self.tile_exists(square) {
            return None;
        }
        let (row, column) = self.coordinates(square);
        let (d_row, d_column) = direction.offsets();
        self.square_at(row as isize + d_row, column as isize + d_column)
    }

    pub fn neighbor_up_left(&self, square: Square) -> Option<Square> {
        self.neighbor(square, Direction::UpLeft)
    }

    pub fn neighbor_up_right(&self, square: Square) -> Option<Square> {
        self.neighbor(square, Direction::UpRight)
    }

    pub fn neighbor_down_left(&self, square: Square) -> Option<Square> {
        self.neighbor(square, Direction::DownLeft)
    }

    pub fn neighbor_down_right(&self, square: Square) -> Option<Square> {
        self.neighbor(square, Direction::DownRight)
    }

    /// `true` when `to` is one diagonal step away from `from`.
    pub fn is_adjacent(&self, from: Square, to: Square) -> bool {
        Direction::ALL
            .iter()
            .any(|&direction| self.neighbor(from, direction) == Some(to))
    }

    /// The square jumped over when going from `from` to `to` in two steps along one diagonal.
    pub fn square_between(&self, from: Square, to: Square) -> Option<Square> {
        Direction::ALL.iter().find_map(|&direction| {
            let middle = self.neighbor(from, direction)?;
            (self.neighbor(middle, direction)? == to).then_some(middle)
        })
    }

    /// Squares off the board read as empty.
    pub fn get(&self, square: Square) -> CheckerType {
        square
            .checked_sub(1)
            .and_then(|index| self.squares.get(index))
            .copied()
            .unwrap_or_default()
    }

    /// Puts `checker` on `square`.
    ///
    /// # Panics
    ///
    /// Panics if `square` is not on the board.
    pub fn set(&mut self, square: Square, checker: CheckerType) {
        assert!(self.tile_exists(square), "square {square} is off the board");
        self.squares[square - 1] = checker;
    }

    /// Empties `square`.
    pub fn remove_pawn(&mut self, square: Square) {
        self.set(square, CheckerType::Empty);
    }

    /// Moves whatever stands on `from` to `to`, overwriting it.
    pub fn move_pawn(&mut self, from: Square, to: Square) {
        let checker = self.get(from);
        self.set(from, CheckerType::Empty);
        self.set(to, checker);
    }

    /// Turns a man into a king in place.
    pub fn crown_pawn(&mut self, square: Square) {
        let checker = self.get(square).crowned();
        self.set(square, checker);
    }

    /// `true` when nothing stands on `square`, or it is off the board.
    pub fn is_empty(&self, square: Square) -> bool {
        self.get(square) == CheckerType::Empty
    }

    /// `true` when a white man or king stands on `square`.
    pub fn is_white(&self, square: Square) -> bool {
        self.get(square).owner() == Some(Player::One)
    }

    /// `true` when a black man or king stands on `square`.
    pub fn is_black(&self, square: Square) -> bool {
        self.get(square).owner() == Some(Player::Two)
    }

    /// `true` when a king of either colour stands on `square`.
    pub fn is_king(&self, square: Square) -> bool {
        self.get(square).is_king()
    }

    /// Squares holding a checker of `player`, in ascending order.
    pub fn pawns_of(&self, player: Player) -> Vec<Square> {
        self.squares()
            .filter(|&square| self.get(square).owner() == Some(player))
            .collect()
    }

    /// Squares holding a white checker, in ascending order.
    pub fn white_pawns(&self) -> Vec<Square> {
        self.pawns_of(Player::One)
    }

    /// Squares holding a black checker, in ascending order.
    pub fn black_pawns(&self) -> Vec<Square> {
        self.pawns_of(Player::Two)
    }

    /// Number of checkers `player` still has on the board.
    pub fn count(&self, player: Player) -> usize {
        self.squares
            .iter()
            .filter(|checker| checker.owner() == Some(player))
            .count()
    }

    /// Removes every checker.
    pub fn clear(&mut self) {
        self.squares.fill(CheckerType::Empty);
    }
}

#[cfg(test)]
mod tests {
    use crate::boards::checkerboard::{CheckerBoard, CheckerType, Direction};
    use crate::error::DraughtsError;
    use crate::game::Player;

    #[test]
    fn opening_fills_three_rows_per_side() {
        let board = CheckerBoard::default();

        assert_eq!(board.square_count(), 32);
        assert_eq!(board.black_pawns(), (1..=12).collect::<Vec<_>>());
        assert_eq!(board.white_pawns(), (21..=32).collect::<Vec<_>>());
        assert!((13..=20).all(|square| board.is_empty(square)));
    }

    #[test]
    fn larger_boards_fill_more_rows() {
        let board = CheckerBoard::new(10).unwrap();

        assert_eq!(board.square_count(), 50);
        assert_eq!(board.count(Player::One), 20);
        assert_eq!(board.count(Player::Two), 20);
        assert!((21..=30).all(|square| board.is_empty(square)));
    }

    #[test]
    fn rejects_odd_and_tiny_sizes() {
        assert_eq!(CheckerBoard::new(7), Err(DraughtsError::InvalidBoardSize(7)));
        assert_eq!(CheckerBoard::empty(2), Err(DraughtsError::InvalidBoardSize(2)));
    }

    #[test]
    fn neighbors_follow_the_diagonals() {
        let board = CheckerBoard::default();

        assert_eq!(board.neighbor_up_left(22), Some(17));
        assert_eq!(board.neighbor_up_right(22), Some(18));
        assert_eq!(board.neighbor_down_left(22), Some(25));
        assert_eq!(board.neighbor_down_right(22), Some(26));
        assert_eq!(board.neighbor_up_left(21), None);
        assert_eq!(board.neighbor_up_right(4), None);
        assert_eq!(board.neighbor_down_right(12), None);
        assert_eq!(board.neighbor_down_left(29), None);
        assert_eq!(board.neighbor_up_left(0), None);
        assert_eq!(board.neighbor_up_left(33), None);
    }

    #[test]
    fn going_back_and_forth_returns_home() {
        for size in [4, 8, 10, 12] {
            let board = CheckerBoard::empty(size).unwrap();
            for square in board.squares() {
                for direction in Direction::ALL {
                    if let Some(next) = board.neighbor(square, direction) {
                        assert_eq!(board.neighbor(next, direction.reversed()), Some(square));
                    }
                }
            }
        }
    }

    #[test]
    fn square_between_needs_a_straight_jump() {
        let board = CheckerBoard::default();

        assert_eq!(board.square_between(18, 11), Some(15));
        assert_eq!(board.square_between(11, 18), Some(15));
        assert_eq!(board.square_between(19, 10), Some(15));
        assert_eq!(board.square_between(22, 17), None);
        assert_eq!(board.square_between(22, 13), None);
        assert!(board.is_adjacent(22, 17));
        assert!(!board.is_adjacent(18, 11));
    }

    #[test]
    fn rows_are_counted_from_the_top() {
        let board = CheckerBoard::default();

        assert_eq!(board.row_of(1), 0);
        assert_eq!(board.row_of(4), 0);
        assert_eq!(board.row_of(5), 1);
        assert_eq!(board.row_of(32), 7);
    }

    #[test]
    #[should_panic(expected = "square 0 is off the board")]
    fn row_of_rejects_square_zero() {
        CheckerBoard::default().row_of(0);
    }

    #[test]
    #[should_panic(expected = "square 33 is off the board")]
    fn row_of_rejects_squares_past_the_end() {
        CheckerBoard::default().row_of(33);
    }

    #[test]
    fn move_and_crown_keep_one_checker_per_square() {
        let mut board = CheckerBoard::empty(8).unwrap();
        board.set(9, CheckerType::WhiteMan);

        board.move_pawn(9, 5);
        board.crown_pawn(5);

        assert!(board.is_empty(9));
        assert_eq!(board.get(5), CheckerType::WhiteKing);
        assert!(board.is_white(5) && board.is_king(5) && !board.is_black(5));
        assert_eq!(board.count(Player::One), 1);

        board.remove_pawn(5);
        assert_eq!(board.count(Player::One), 0);
        assert_eq!(board.get(99), CheckerType::Empty);
    }
}
