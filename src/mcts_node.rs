use crate::game::{Game, GameOutcome, Player};
use crate::rollout::RolloutResults;

/// Represents a single node in the Monte Carlo search tree.
///
/// Each node owns its own copy of the game state, statistics about the outcomes of simulations,
/// and the moves from that state that have no child yet.
#[derive(Debug, Clone)]
pub struct MctsNode<T: Game> {
    /// The depth of the node in the tree.
    pub height: u32,
    /// The game state that this node represents.
    pub board: Box<T>,
    /// The move that led to this node's state from its parent. `None` for the root node.
    pub prev_move: Option<T::Move>,
    /// The player whose turn it is in this node's game state.
    pub current_player: Player,
    /// The outcome of the game at this node, if it is terminal.
    pub outcome: GameOutcome,
    /// The number of simulations run through this node.
    pub visits: u32,
    /// Wins of `current_player` over those simulations, draws counting half.
    pub wins: f64,
    /// The number of simulations through this node that ended in a draw.
    pub draws: u32,
    /// Legal moves not yet represented by a child.
    pub untried_moves: Vec<T::Move>,
}

impl<T: Game> Default for MctsNode<T> {
    fn default() -> Self {
        MctsNode::new(Box::new(T::default()))
    }
}

impl<T: Game> MctsNode<T> {
    /// Creates a new `MctsNode` for the given board state.
    pub fn new(boxed_board: Box<T>) -> Self {
        let current_player = boxed_board.get_current_player();
        let outcome = boxed_board.get_outcome();
        let untried_moves = if outcome.is_terminal() {
            Vec::new()
        } else {
            boxed_board.get_available_moves()
        };
        MctsNode {
            height: 0,
            board: boxed_board,
            prev_move: None,
            current_player,
            outcome,
            visits: 0,
            wins: 0.0,
            draws: 0,
            untried_moves,
        }
    }

    /// Estimated probability that `current_player` wins from here; 0 before any visit.
    pub fn score(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins / (self.visits as f64)
        }
    }

    /// Same as [`Self::score`], seen from `player`.
    pub fn score_for(&self, player: Player) -> f64 {
        if player == self.current_player {
            self.score()
        } else {
            1.0 - self.score()
        }
    }

    /// Calculates the draw rate of this node.
    pub fn draws_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            (self.draws as f64) / (self.visits as f64)
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Adds `results` to the statistics, crediting the player to move here.
    pub fn update_stats(&mut self, results: &RolloutResults) {
        self.visits += results.playouts();
        self.wins += results.wins(self.current_player);
        self.draws += results.draws();
    }
}
