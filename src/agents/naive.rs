//! One-ply tactical player

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{Error, Result, ports::Agent, tictactoe::BoardState};

/// Wins when it can, blocks when it must, otherwise plays at random
#[derive(Debug, Clone)]
pub struct NaiveAgent {
    name: String,
    rng: StdRng,
}

impl NaiveAgent {
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

impl Agent for NaiveAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn select_move(&mut self, board: &BoardState) -> Result<usize> {
        let mover = board.to_move().ok_or(Error::GameOver)?;
        let wins = board.winning_moves_for(mover);
        let candidates = if !wins.is_empty() {
            wins
        } else {
            let blocks = board.winning_moves_for(mover.opponent());
            if blocks.is_empty() {
                board.legal_moves()
            } else {
                blocks
            }
        };
        candidates
            .choose(&mut self.rng)
            .copied()
            .ok_or(Error::GameOver)
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}
