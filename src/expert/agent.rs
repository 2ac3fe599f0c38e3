//! Expert agent: the rule cascade behind the agent port

use log::debug;
use rand::{SeedableRng, rngs::StdRng};

use super::strategy::ExpertStrategy;
use crate::{Result, ports::Agent, tictactoe::BoardState};

fn build_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Rule-based player that never loses
#[derive(Debug, Clone)]
pub struct ExpertAgent {
    name: String,
    rng: StdRng,
}

impl ExpertAgent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rng: build_rng(None),
        }
    }

    /// Create an agent whose tie-breaking is reproducible
    pub fn with_seed(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: build_rng(Some(seed)),
        }
    }
}

impl Agent for ExpertAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn select_move(&mut self, board: &BoardState) -> Result<usize> {
        let (pos, class) = ExpertStrategy::select(board, &mut self.rng)?;
        debug!("{} plays {pos} ({class})", self.name);
        Ok(pos)
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = build_rng(Some(seed));
        Ok(())
    }
}
