use crate::game::{Game, GameOutcome, Player};

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// An implementation of the `Game` trait for the game of Tic-Tac-Toe.
///
/// The board is represented by a 9-element array, where each element corresponds to a cell.
/// A move is represented by a `u8` from 0 to 8. [`Player::One`] plays the crosses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TicTacToeBoard {
    field: [Option<Player>; 9],
    moves_played: u8,
}

impl TicTacToeBoard {
    /// A board with crosses on `ones` and noughts on `twos`.
    ///
    /// The player to move is derived from the number of marks, crosses moving first.
    pub fn from_marks(ones: &[u8], twos: &[u8]) -> Self {
        let mut board = Self::default();
        for &cell in ones {
            board.field[cell as usize] = Some(Player::One);
        }
        for &cell in twos {
            board.field[cell as usize] = Some(Player::Two);
        }
        board.moves_played = (ones.len() + twos.len()) as u8;
        board
    }

    fn line_owner(&self) -> Option<Player> {
        LINES.iter().find_map(|&[a, b, c]| {
            let owner = self.field[a]?;
            (self.field[b] == Some(owner) && self.field[c] == Some(owner)).then_some(owner)
        })
    }
}

impl Game for TicTacToeBoard {
    type Move = u8;

    fn get_current_player(&self) -> Player {
        if self.moves_played % 2 == 0 {
            Player::One
        } else {
            Player::Two
        }
    }

    fn get_outcome(&self) -> GameOutcome {
        match self.line_owner() {
            Some(player) => GameOutcome::Win(player),
            None if self.field.iter().all(Option::is_some) => GameOutcome::Draw,
            None => GameOutcome::InProgress,
        }
    }

    fn get_available_moves(&self) -> Vec<Self::Move> {
        if self.get_outcome().is_terminal() {
            return Vec::new();
        }

        self.field
            .iter()
            .enumerate()
            .filter(|(_, x)| x.is_none())
            .map(|(i, _)| i as u8)
            .collect()
    }

    fn perform_move(&mut self, b_move: &Self::Move) {
        self.field[*b_move as usize] = Some(self.get_current_player());
        self.moves_played += 1;
    }
}
