use crate::game::{Game, GameOutcome};
use crate::mcts_node::MctsNode;
use crate::random::{RandomGenerator, StandardRandomGenerator};
use crate::rollout::RolloutResults;
use ego_tree::{NodeId, NodeRef, Tree};
use log::{debug, trace, warn};
use std::fmt::Write;
use std::time::{Duration, Instant};

/// The number of nodes the search tree reserves room for up front.
pub const DEFAULT_NODE_CAPACITY: usize = 1024;

/// The exploration constant of UCT; `√2` gives the classical `sqrt(2·ln N / n)` term.
pub const DEFAULT_EXPLORATION_CONSTANT: f64 = std::f64::consts::SQRT_2;

/// Stand-in for the visit ratio of nodes that were never visited, or whose parent never was.
const UNVISITED_VISIT_RATIO: f64 = 1.0;

/// The main struct for running the Monte Carlo Tree Search algorithm.
///
/// It holds the search tree, the random number generator, and the configuration for the search.
/// The tree is an arena owned by the search: every node owns its own copy of the game state and
/// children are only reachable from their parent. A new search is built for every real move.
pub struct MonteCarloTreeSearch<T: Game, K: RandomGenerator> {
    tree: Tree<MctsNode<T>>,
    root_id: NodeId,
    random: K,
    exploration_constant: f64,
    rollouts_per_iteration: u32,
    backpropagate_terminal_nodes: bool,
    iterations: u64,
    next_action: MctsAction,
}

impl<T: Game, K: RandomGenerator> Default for MonteCarloTreeSearch<T, K> {
    fn default() -> Self {
        MonteCarloTreeSearchBuilder::new(T::default()).build()
    }
}

/// A builder for creating instances of `MonteCarloTreeSearch`.
///
/// This provides a convenient way to configure the MCTS search with different parameters.
pub struct MonteCarloTreeSearchBuilder<T: Game, K: RandomGenerator> {
    board: T,
    random_generator: K,
    node_capacity: usize,
    exploration_constant: f64,
    rollouts_per_iteration: u32,
    backpropagate_terminal_nodes: bool,
}

impl<T: Game, K: RandomGenerator> MonteCarloTreeSearchBuilder<T, K> {
    /// Creates a new builder with the given initial board state.
    pub fn new(board: T) -> Self {
        Self {
            board,
            random_generator: K::default(),
            node_capacity: DEFAULT_NODE_CAPACITY,
            exploration_constant: DEFAULT_EXPLORATION_CONSTANT,
            rollouts_per_iteration: 1,
            backpropagate_terminal_nodes: false,
        }
    }

    /// Sets the random number generator for the MCTS search.
    pub fn with_random_generator(mut self, rg: K) -> Self {
        self.random_generator = rg;
        self
    }

    /// Sets how many nodes the tree allocates room for before growing.
    pub fn with_node_capacity(mut self, capacity: usize) -> Self {
        self.node_capacity = capacity;
        self
    }

    /// Sets the weight of the exploration term of UCT.
    pub fn with_exploration_constant(mut self, constant: f64) -> Self {
        self.exploration_constant = constant;
        self
    }

    /// Sets the number of random playouts run from every new node. Zero is bumped to one.
    pub fn with_rollouts_per_iteration(mut self, rollouts: u32) -> Self {
        self.rollouts_per_iteration = rollouts.max(1);
        self
    }

    /// Whether reaching an already finished game counts its known outcome along the path.
    ///
    /// Disabled by default: such an iteration then leaves the tree untouched. Enabling it lets
    /// the statistics keep converging once a branch is fully expanded down to won positions.
    pub fn with_terminal_backpropagation(mut self, enabled: bool) -> Self {
        self.backpropagate_terminal_nodes = enabled;
        self
    }

    /// Builds the `MonteCarloTreeSearch` instance with the configured parameters.
    pub fn build(self) -> MonteCarloTreeSearch<T, K> {
        let mut mcts =
            MonteCarloTreeSearch::new(self.board, self.random_generator, self.node_capacity);
        mcts.exploration_constant = self.exploration_constant;
        mcts.rollouts_per_iteration = self.rollouts_per_iteration;
        mcts.backpropagate_terminal_nodes = self.backpropagate_terminal_nodes;
        mcts
    }
}

/// Statistics of one root child, for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildStats<M> {
    pub game_move: M,
    pub visits: u32,
    /// Wins of the player to move in the child, draws counting half.
    pub wins: f64,
    /// `wins / visits`, 0 before any visit.
    pub score: f64,
}

impl<T: Game, K: RandomGenerator> MonteCarloTreeSearch<T, K> {
    /// Returns a new builder for `MonteCarloTreeSearch`.
    pub fn builder(board: T) -> MonteCarloTreeSearchBuilder<T, K> {
        MonteCarloTreeSearchBuilder::new(board)
    }

    /// Creates a new `MonteCarloTreeSearch` instance with the default settings.
    ///
    /// It is recommended to use the builder pattern via `MonteCarloTreeSearch::builder()` instead.
    pub fn new(board: T, rg: K, node_capacity: usize) -> Self {
        let tree = Tree::with_capacity(MctsNode::new(Box::new(board)), node_capacity.max(1));
        let root_id = tree.root().id();
        let next_action = Self::initial_action(&tree, root_id);

        Self {
            tree,
            root_id,
            random: rg,
            exploration_constant: DEFAULT_EXPLORATION_CONSTANT,
            rollouts_per_iteration: 1,
            backpropagate_terminal_nodes: false,
            iterations: 0,
            next_action,
        }
    }

    fn initial_action(tree: &Tree<MctsNode<T>>, root_id: NodeId) -> MctsAction {
        if tree.root().value().is_terminal() {
            MctsAction::EverythingIsCalculated
        } else {
            MctsAction::Selection {
                R: root_id,
                RP: vec![],
            }
        }
    }

    /// Returns an immutable reference to the underlying search tree.
    pub fn get_tree(&self) -> &Tree<MctsNode<T>> {
        &self.tree
    }

    /// Returns the next MCTS action to be performed. Useful for debugging and visualization.
    pub fn get_next_mcts_action(&self) -> &MctsAction {
        &self.next_action
    }

    /// The number of completed iterations.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Executes a single step of the MCTS algorithm (Selection, Expansion, Simulation, or Backpropagation).
    pub fn execute_action(&mut self) {
        match std::mem::replace(&mut self.next_action, MctsAction::EverythingIsCalculated) {
            MctsAction::Selection { R, RP: _ } => {
                let path = self.select_path(R);
                self.next_action = MctsAction::Expansion { L: path };
            }
            MctsAction::Expansion { L } => match self.expand_node(L) {
                Some(path) => self.next_action = MctsAction::Simulation { C: path },
                None => {
                    self.iterations += 1;
                    self.next_action = MctsAction::Selection {
                        R: self.root_id,
                        RP: vec![],
                    };
                }
            },
            MctsAction::Simulation { C } => {
                let result = self.simulate(C.last().copied().unwrap_or(self.root_id));
                self.next_action = MctsAction::Backpropagation { C, result };
            }
            MctsAction::Backpropagation { C, result } => {
                self.backpropagate(&C, &result);
                self.iterations += 1;
                self.next_action = MctsAction::Selection {
                    R: self.root_id,
                    RP: C,
                }
            }
            MctsAction::EverythingIsCalculated => {}
        }
    }

    /// Performs one full iteration of the MCTS algorithm (Selection, Expansion, Simulation, Backpropagation).
    /// Returns the path of nodes that were updated during backpropagation.
    pub fn do_iteration(&mut self) -> Vec<NodeId> {
        self.execute_action();
        while !matches!(
            self.next_action,
            MctsAction::Selection { .. } | MctsAction::EverythingIsCalculated
        ) {
            self.execute_action();
        }

        match &self.next_action {
            MctsAction::Selection { R: _, RP: rp } => rp.clone(),
            _ => vec![],
        }
    }

    /// Runs the MCTS search for a specified number of iterations.
    pub fn iterate_n_times(&mut self, n: u32) {
        for _ in 0..n {
            if self.next_action == MctsAction::EverythingIsCalculated {
                break;
            }
            self.do_iteration();
        }
    }

    /// Runs full iterations until `budget` has elapsed.
    ///
    /// The clock is only checked between iterations, so the last one may overrun the budget by
    /// the length of one playout. Returns immediately when the root game is already over.
    pub fn iterate_for(&mut self, budget: Duration) {
        let start = Instant::now();
        let iterations_before = self.iterations;
        while start.elapsed() < budget {
            if self.next_action == MctsAction::EverythingIsCalculated {
                break;
            }
            self.do_iteration();
        }

        let root = self.tree.root().value();
        debug!(
            "Stopped search after {} ms and {} iterations. Root stats is {}/{} ({:.2}% win for the side to move)",
            start.elapsed().as_millis(),
            self.iterations - iterations_before,
            root.wins,
            root.visits,
            root.score() * 100.0
        );
    }

    /// Same as [`Self::iterate_for`] with a budget in milliseconds.
    pub fn iterate_for_millis(&mut self, millis: u64) {
        self.iterate_for(Duration::from_millis(millis));
    }

    /// Returns a reference to the root node of the search tree.
    pub fn get_root(&self) -> NodeRef<'_, MctsNode<T>> {
        self.tree.root()
    }

    /// The move leading to the root child with the best score for the player to move at the root.
    ///
    /// In an alternating game that is the child with the lowest stored score, since a child
    /// scores the wins of the opponent. Unvisited children are only considered when no child has
    /// been visited. Ties go to the earliest created child. `None` before the first expansion.
    pub fn get_best_move(&self) -> Option<&T::Move> {
        let root = self.tree.root();
        let player = root.value().current_player;
        let any_visited = root.children().any(|child| child.value().visits > 0);

        let mut best: Option<(f64, NodeRef<'_, MctsNode<T>>)> = None;
        for child in root.children() {
            if any_visited && child.value().visits == 0 {
                continue;
            }
            let score = child.value().score_for(player);
            if best.as_ref().is_none_or(|(best_score, _)| score > *best_score) {
                best = Some((score, child));
            }
        }

        best.and_then(|(_, child)| child.value().prev_move.as_ref())
    }

    /// Returns the child of the root node that was visited the most, the root itself when it
    /// has no children. Ties go to the earliest created child.
    pub fn get_most_perspective_move(&self) -> NodeRef<'_, MctsNode<T>> {
        let root = self.tree.root();
        let mut best_node: Option<NodeRef<'_, MctsNode<T>>> = None;
        for child in root.children() {
            if best_node.is_none_or(|best| child.value().visits > best.value().visits) {
                best_node = Some(child);
            }
        }

        best_node.unwrap_or(root)
    }

    /// Move, visits, wins and score of every root child, in creation order.
    pub fn children_stats(&self) -> Vec<ChildStats<T::Move>> {
        self.tree
            .root()
            .children()
            .filter_map(|child| {
                let node = child.value();
                Some(ChildStats {
                    game_move: node.prev_move.clone()?,
                    visits: node.visits,
                    wins: node.wins,
                    score: node.score(),
                })
            })
            .collect()
    }

    /// A short human-readable summary of the root and its children.
    pub fn stats(&self) -> String {
        let root = self.tree.root().value();
        let mut text = format!(
            "MCTS with {} iterations, root {}/{}\n",
            self.iterations, root.wins, root.visits
        );
        for child in self.children_stats() {
            let _ = writeln!(
                text,
                "{:?} : {:.4} ({}/{})",
                child.game_move, child.score, child.wins, child.visits
            );
        }
        text
    }

    /// UCT value of `child` as seen by the player to move at its parent.
    fn ucb_value(&self, parent: &MctsNode<T>, child: &MctsNode<T>) -> f64 {
        if parent.visits == 0 || child.visits == 0 {
            // an unvisited node is assumed to win
            let parent_visits = f64::from(parent.visits).max(std::f64::consts::E);
            return 1.0
                + self.exploration_constant
                    * f64::sqrt(f64::ln(parent_visits) / UNVISITED_VISIT_RATIO);
        }

        child.score_for(parent.current_player)
            + self.exploration_constant
                * f64::sqrt(f64::ln(f64::from(parent.visits)) / f64::from(child.visits))
    }

    /// Walks down from `root_id` and returns the visited path, the selected node last.
    ///
    /// The walk stops at a leaf or at the first node that still has a move without a child.
    fn select_path(&self, root_id: NodeId) -> Vec<NodeId> {
        let mut path = vec![root_id];
        let mut node = match self.tree.get(root_id) {
            Some(node) => node,
            None => return path,
        };

        while node.has_children() && node.value().untried_moves.is_empty() {
            let mut best_child: Option<NodeRef<'_, MctsNode<T>>> = None;
            let mut max_ucb = f64::MIN;
            for child in node.children() {
                let current_ucb = self.ucb_value(node.value(), child.value());
                if current_ucb > max_ucb {
                    max_ucb = current_ucb;
                    best_child = Some(child);
                }
            }

            match best_child {
                Some(child) => {
                    path.push(child.id());
                    node = child;
                }
                None => break,
            }
        }

        path
    }

    /// Adds one child for a random untried move of the last node of `path` and appends it.
    ///
    /// A finished game is not expanded: its path is returned as is when its outcome should still
    /// be counted, and `None` when the iteration is to be dropped.
    fn expand_node(&mut self, mut path: Vec<NodeId>) -> Option<Vec<NodeId>> {
        let node_id = *path.last()?;
        let mut node = self.tree.get_mut(node_id)?;
        let mcts_node = node.value();

        if mcts_node.is_terminal() {
            return self.backpropagate_terminal_nodes.then_some(path);
        }
        if mcts_node.untried_moves.is_empty() {
            warn!("an unfinished game at depth {} has no legal move", mcts_node.height);
            return Some(path);
        }

        let index = self.random.next_range(0, mcts_node.untried_moves.len());
        let game_move = mcts_node.untried_moves.swap_remove(index);
        let height = mcts_node.height + 1;
        let mut board = mcts_node.board.clone();
        board.perform_move(&game_move);

        trace!("expanding {game_move:?} at depth {height}");
        let mut child = MctsNode::new(board);
        child.prev_move = Some(game_move);
        child.height = height;
        let child_id = node.append(child).id();
        path.push(child_id);
        Some(path)
    }

    /// Plays random games from `node_id` until they end.
    ///
    /// A finished game only yields its known outcome.
    fn simulate(&mut self, node_id: NodeId) -> RolloutResults {
        let Some(node) = self.tree.get(node_id) else {
            return RolloutResults::new();
        };
        let node = node.value();
        if node.is_terminal() {
            return RolloutResults::repeated(node.outcome, self.rollouts_per_iteration);
        }

        let board = node.board.as_ref().clone();
        let mut results = RolloutResults::new();
        for _ in 0..self.rollouts_per_iteration {
            results.update(play_randomly_to_end(board.clone(), &mut self.random));
        }
        results
    }

    /// Adds `results` to every node of `path`.
    fn backpropagate(&mut self, path: &[NodeId], results: &RolloutResults) {
        for &node_id in path {
            if let Some(mut node) = self.tree.get_mut(node_id) {
                node.value().update_stats(results);
            }
        }
    }
}

/// Plays uniformly random moves on `board` until the game is over.
///
/// A game that claims to be in progress without any legal move counts as a draw.
pub fn play_randomly_to_end<T: Game, K: RandomGenerator>(
    mut board: T,
    random: &mut K,
) -> GameOutcome {
    let mut outcome = board.get_outcome();
    while outcome == GameOutcome::InProgress {
        let moves = board.get_available_moves();
        let Some(random_move) = random.choose(&moves) else {
            warn!("an unfinished game has no legal move, counting it as a draw");
            return GameOutcome::Draw;
        };
        board.perform_move(random_move);
        outcome = board.get_outcome();
    }
    outcome
}

impl<T: Game> MonteCarloTreeSearch<T, StandardRandomGenerator> {
    pub fn from_board(board: T) -> Self {
        MonteCarloTreeSearchBuilder::new(board).build()
    }
}

/// Represents the four main stages of the MCTS algorithm.
///
/// This enum is used to manage the state of the search process.
#[allow(non_snake_case)]
#[derive(Debug, PartialEq, Clone)]
pub enum MctsAction {
    /// **Selection**: Start from the root `R` and walk down the tree until a node to expand is found.
    Selection {
        /// The root of the current selection phase.
        R: NodeId,
        /// The path of nodes updated during the last backpropagation phase.
        RP: Vec<NodeId>,
    },
    /// **Expansion**: Add one child to the last node of the selected path `L`.
    Expansion {
        /// The path from the root to the node to be expanded.
        L: Vec<NodeId>,
    },
    /// **Simulation**: Run random playouts from the last node of the path `C`.
    Simulation {
        /// The path from the root to the new child.
        C: Vec<NodeId>,
    },
    /// **Backpropagation**: Update the statistics of every node of the path `C`.
    Backpropagation {
        /// The path from the root to the simulated node.
        C: Vec<NodeId>,
        /// The results of the simulation.
        result: RolloutResults,
    },
    /// The game at the root is over, there is nothing to search.
    EverythingIsCalculated,
}

impl MctsAction {
    /// Returns the name of the current MCTS action as a string.
    pub fn get_name(&self) -> String {
        match self {
            MctsAction::Selection { .. } => "Selection".to_string(),
            MctsAction::Expansion { .. } => "Expansion".to_string(),
            MctsAction::Simulation { .. } => "Simulation".to_string(),
            MctsAction::Backpropagation { .. } => "Backpropagation".to_string(),
            MctsAction::EverythingIsCalculated => "EverythingIsCalculated".to_string(),
        }
    }
}
