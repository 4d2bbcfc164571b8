//! English draughts and a small Monte Carlo tree search planner to play it.
//!
//! The search engine is generic: it only relies on the [`game::Game`] trait, so any two-player
//! game with perfect information can be plugged in. [`boards::english_draughts::EnglishDraughts`]
//! implements it with mandatory captures, multi-jump chains, promotion and the 25 king moves
//! draw rule.
//!
//! # Example
//!
//! ```rust
//! use draughts_mcts::boards::english_draughts::EnglishDraughts;
//! use draughts_mcts::mcts::{MonteCarloTreeSearch, DEFAULT_NODE_CAPACITY};
//! use draughts_mcts::random::SeededRandomGenerator;
//!
//! let mut game = EnglishDraughts::default();
//!
//! // Create and configure a new MCTS search instance using the builder
//! let mut mcts = MonteCarloTreeSearch::builder(game.clone())
//!     .with_random_generator(SeededRandomGenerator::new(42))
//!     .with_node_capacity(DEFAULT_NODE_CAPACITY)
//!     .build();
//!
//! // Search for 50 milliseconds, then play the recommended move
//! mcts.iterate_for_millis(50);
//! let best_move = mcts.get_best_move().cloned().expect("the opening has moves");
//!
//! println!("Playing {}", game.notation(&best_move));
//! game.play(&best_move)?;
//! # Ok::<(), draughts_mcts::error::DraughtsError>(())
//! ```

/// Contains pre-made implementations of the `Game` trait.
pub mod boards;
/// Typed errors of the rules engine.
pub mod error;
/// Contains the `Game` trait and related enums that define the interface for a game.
pub mod game;
/// The core module of the library, containing the `MonteCarloTreeSearch` implementation.
pub mod mcts;
/// Contains the `MctsNode` struct, which represents a node in the search tree.
pub mod mcts_node;
/// Contains traits and implementations for random number generation.
pub mod random;
/// Tally of random playout results.
pub mod rollout;

pub use error::{DraughtsError, Result};
