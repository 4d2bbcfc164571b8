use crate::game::{GameOutcome, Player};

/// Tally of finished playouts, counted for both players.
///
/// A draw credits half a win to each side.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct RolloutResults {
    wins_one: f64,
    wins_two: f64,
    draws: u32,
    playouts: u32,
}

impl RolloutResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one playout ending in `outcome`.
    ///
    /// An unfinished game is recorded as a draw.
    pub fn update(&mut self, outcome: GameOutcome) {
        self.playouts += 1;
        match outcome {
            GameOutcome::Win(Player::One) => self.wins_one += 1.0,
            GameOutcome::Win(Player::Two) => self.wins_two += 1.0,
            GameOutcome::Draw | GameOutcome::InProgress => {
                self.wins_one += 0.5;
                self.wins_two += 0.5;
                self.draws += 1;
            }
        }
    }

    /// `playouts` results that all ended in `outcome`.
    pub fn repeated(outcome: GameOutcome, playouts: u32) -> Self {
        let mut results = Self::new();
        for _ in 0..playouts {
            results.update(outcome);
        }
        results
    }

    pub fn add(&mut self, other: &RolloutResults) {
        self.wins_one += other.wins_one;
        self.wins_two += other.wins_two;
        self.draws += other.draws;
        self.playouts += other.playouts;
    }

    /// Wins credited to `player`, draws counting half.
    pub fn wins(&self, player: Player) -> f64 {
        match player {
            Player::One => self.wins_one,
            Player::Two => self.wins_two,
        }
    }

    pub fn draws(&self) -> u32 {
        self.draws
    }

    pub fn playouts(&self) -> u32 {
        self.playouts
    }
}
