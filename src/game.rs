use std::fmt::Debug;

/// The central trait of the library, defining the interface for a game state.
///
/// To use the MCTS algorithm with a custom game, this trait must be implemented.
/// It provides the MCTS engine with the necessary methods to understand and interact with the game logic.
/// `Clone` must produce a fully independent copy: the engine hands clones to sibling branches
/// and rollouts and expects them never to observe each other's moves.
pub trait Game: Default + Clone {
    /// The type representing a move in the game. This could be a simple `u8` for a board position
    /// or a more complex struct for games with intricate actions.
    type Move: Clone + Debug + PartialEq;

    /// Returns the player whose turn it is to make a move.
    fn get_current_player(&self) -> Player;

    /// Returns the current outcome of the game.
    ///
    /// An in-progress state must have at least one available move.
    fn get_outcome(&self) -> GameOutcome;

    /// Returns a list of all legal moves available from the current state.
    fn get_available_moves(&self) -> Vec<Self::Move>;

    /// Applies a given move to the board, modifying its state.
    ///
    /// The move must be one of [`Game::get_available_moves`]; anything else is a caller bug
    /// and leaves the state unspecified.
    fn perform_move(&mut self, game_move: &Self::Move);
}

/// One of the two sides of a two-player game.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Player {
    /// The side that moves first (the whites in draughts).
    One,
    /// The side that moves second (the blacks in draughts).
    Two,
}

impl Player {
    /// Returns the other side.
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

/// Represents the possible outcomes of a game.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum GameOutcome {
    /// The game is still ongoing.
    InProgress,
    /// The given player has won.
    Win(Player),
    /// The game has ended and nobody won.
    Draw,
}

impl GameOutcome {
    /// `true` once the game has ended, whatever the result.
    pub fn is_terminal(self) -> bool {
        self != GameOutcome::InProgress
    }

    /// The winning player, if there is one.
    pub fn winner(self) -> Option<Player> {
        match self {
            GameOutcome::Win(player) => Some(player),
            _ => None,
        }
    }
}
