use std::str::FromStr;

use crate::boards::checkerboard::Square;
use crate::error::{DraughtsError, Result};

/// A draughts move: the square the checker starts from followed by every square it lands on.
///
/// Consecutive squares are either one diagonal step apart or a two-square jump over a captured
/// checker. The shape (at least two squares) is checked on construction; legality is checked
/// by [`EnglishDraughts::play`](crate::boards::english_draughts::EnglishDraughts::play).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DraughtsMove {
    squares: Vec<Square>,
}

impl DraughtsMove {
    pub fn new(squares: Vec<Square>) -> Result<Self> {
        if squares.len() < 2 {
            return Err(DraughtsError::MalformedMove(squares.len()));
        }
        Ok(Self { squares })
    }

    /// Builds a move from a path the generator knows has at least two squares.
    pub(crate) fn from_path(squares: Vec<Square>) -> Self {
        debug_assert!(squares.len() >= 2);
        Self { squares }
    }

    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    pub fn start(&self) -> Square {
        self.squares[0]
    }

    pub fn end(&self) -> Square {
        self.squares[self.squares.len() - 1]
    }

    /// Every `(from, to)` pair of the path, in order.
    pub fn steps(&self) -> impl Iterator<Item = (Square, Square)> + '_ {
        self.squares.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

impl FromStr for DraughtsMove {
    type Err = DraughtsError;

    /// Parses `22-17` or `18x11x4`; the separators are interchangeable.
    fn from_str(text: &str) -> Result<Self> {
        let squares = text
            .trim()
            .split(['-', 'x', 'X'])
            .map(|part| part.trim().parse::<Square>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| DraughtsError::UnparsableMove(text.to_string()))?;
        Self::new(squares)
    }
}
