//! Contains implementations of the `Game` trait.

/// The draughts board: geometry of the dark squares and what stands on them.
pub mod checkerboard;
/// The move type of draughts games.
pub mod draughts_move;
/// A `Game` implementation for English draughts.
pub mod english_draughts;
/// A `Game` implementation for the game of Tic-Tac-Toe.
pub mod tic_tac_toe;
