use crate::boards::checkerboard::Square;
use crate::boards::draughts_move::DraughtsMove;

/// Errors surfaced by the draughts rules engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraughtsError {
    #[error("board size {0} is not supported, expected an even size of at least 4")]
    InvalidBoardSize(usize),

    #[error("square {0} does not exist on this board")]
    InvalidSquare(Square),

    #[error("a move needs at least 2 squares, got {0}")]
    MalformedMove(usize),

    #[error("cannot parse move `{0}`")]
    UnparsableMove(String),

    #[error("illegal move {0:?}")]
    IllegalMove(DraughtsMove),

    #[error("the game is already over")]
    GameOver,
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, DraughtsError>;
