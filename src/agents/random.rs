//! Uniformly random player

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{Error, Result, ports::Agent, tictactoe::BoardState};

/// Picks any legal move with equal probability
#[derive(Debug, Clone)]
pub struct RandomAgent {
    name: String,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn with_seed(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn select_move(&mut self, board: &BoardState) -> Result<usize> {
        board
            .legal_moves()
            .choose(&mut self.rng)
            .copied()
            .ok_or(Error::GameOver)
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}
