//! Self-play learning agent
//!
//! The agent scores candidate moves with a [`FeedForwardEvaluator`], records
//! every position it creates during a game, and trains on those positions
//! (with all their symmetric images) once the outcome is known.

use log::{debug, trace};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use super::encoding::{VIEWER_LOSS, outcome_label, relative_cells, to_batch};
use crate::{
    Error, Result,
    config::LearnerConfig,
    network::FeedForwardEvaluator,
    ports::{Agent, GameEvent},
    tictactoe::{BoardState, CELLS, GameOutcome, Player, expand_symmetries},
};

/// Where the agent is in its game lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Between games; moves are not recorded
    Idle,
    /// Inside a game; every chosen position is kept for training
    Recording,
}

/// A position the agent produced, tagged with the side that produced it.
///
/// In self-play one buffer holds both sides' moves, so the mover decides
/// how the final outcome is labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeStep {
    pub state: BoardState,
    pub mover: Player,
}

/// Why a move was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reason {
    Win,
    Block,
    Explore,
    Evaluated,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Learning agent backed by a neural position evaluator
///
/// # Examples
///
/// ```
/// use noughts::{
///     config::{EvaluatorConfig, LearnerConfig},
///     learning::LearningAgent,
///     ports::{Agent, GameEvent},
///     tictactoe::{BoardState, GameOutcome, Player},
/// };
///
/// let config = LearnerConfig::default()
///     .with_evaluator(EvaluatorConfig::default().with_hidden_layers(vec![16]))
///     .with_seed(3);
/// let mut agent = LearningAgent::new("learner", config).unwrap();
///
/// agent.notify(GameEvent::Begin).unwrap();
/// let board = BoardState::new();
/// let pos = agent.select_move(&board).unwrap();
/// assert!(board.verify(pos));
/// agent.notify(GameEvent::Finish(GameOutcome::Win(Player::X))).unwrap();
/// assert_eq!(agent.evaluator().cost_history().len(), 1);
/// ```
#[derive(Debug)]
pub struct LearningAgent {
    name: String,
    config: LearnerConfig,
    evaluator: FeedForwardEvaluator,
    rng: StdRng,
    phase: Phase,
    episode: Vec<EpisodeStep>,
    games_trained: usize,
}

impl LearningAgent {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `config` does not validate.
    pub fn new(name: impl Into<String>, config: LearnerConfig) -> Result<Self> {
        config.validate()?;
        let evaluator = FeedForwardEvaluator::new(config.evaluator.clone())?;
        Ok(Self {
            name: name.into(),
            rng: build_rng(config.seed),
            config,
            evaluator,
            phase: Phase::Idle,
            episode: Vec::new(),
            games_trained: 0,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Positions recorded in the current game
    pub fn episode(&self) -> &[EpisodeStep] {
        &self.episode
    }

    pub fn evaluator(&self) -> &FeedForwardEvaluator {
        &self.evaluator
    }

    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    /// Games that ended in a training update
    pub fn games_trained(&self) -> usize {
        self.games_trained
    }

    pub fn is_learning(&self) -> bool {
        self.config.learning
    }

    /// Switch between training mode and greedy evaluation mode
    pub fn set_learning(&mut self, learning: bool) {
        self.config.learning = learning;
    }

    /// Start a game: clear the buffer and begin recording
    pub fn begin(&mut self) {
        self.episode.clear();
        self.phase = Phase::Recording;
    }

    /// End a game, training on it when learning is enabled.
    ///
    /// Returns the training loss, or `None` if nothing was trained.
    pub fn finish(&mut self, outcome: GameOutcome) -> Result<Option<f64>> {
        let loss = if self.config.learning {
            self.learn(outcome)?
        } else {
            None
        };
        self.episode.clear();
        self.phase = Phase::Idle;
        Ok(loss)
    }

    /// Train the evaluator on the recorded episode.
    ///
    /// Each position is labelled from its own mover's side, expanded with its
    /// symmetric images and deduplicated before the update. An empty episode
    /// is a no-op.
    pub fn learn(&mut self, outcome: GameOutcome) -> Result<Option<f64>> {
        if self.episode.is_empty() {
            return Ok(None);
        }
        let samples: Vec<([i8; CELLS], usize)> = self
            .episode
            .iter()
            .map(|step| {
                (
                    relative_cells(&step.state, step.mover),
                    outcome_label(outcome, step.mover),
                )
            })
            .collect();
        let expanded = expand_symmetries(&samples);
        let (rows, labels): (Vec<_>, Vec<_>) = expanded.into_iter().unzip();
        let batch = to_batch(&rows)?;
        let loss = self.evaluator.update(&batch, &labels)?;
        self.games_trained += 1;
        debug!(
            "{} trained on {} positions ({} recorded), loss {loss:.5}",
            self.name,
            labels.len(),
            samples.len()
        );
        Ok(Some(loss))
    }

    /// Estimated probability that `mover` loses after playing each move.
    ///
    /// Returned pairs follow `board.legal_moves()` order.
    pub fn loss_estimates(&self, board: &BoardState) -> Result<Vec<(usize, f64)>> {
        let mover = board.to_move().ok_or(Error::GameOver)?;
        let moves = board.legal_moves();
        let rows = moves
            .iter()
            .map(|&pos| Ok(relative_cells(&board.after(pos)?, mover)))
            .collect::<Result<Vec<_>>>()?;
        let log_probs = self.evaluator.predict(&to_batch(&rows)?)?;
        Ok(moves
            .into_iter()
            .zip(log_probs.rows())
            .map(|(pos, row)| (pos, row[VIEWER_LOSS].exp()))
            .collect())
    }

    fn choose(&mut self, board: &BoardState, mover: Player) -> Result<(usize, Reason)> {
        let wins = board.winning_moves_for(mover);
        if let Some(&pos) = wins.choose(&mut self.rng) {
            return Ok((pos, Reason::Win));
        }
        let blocks = board.winning_moves_for(mover.opponent());
        if let Some(&pos) = blocks.choose(&mut self.rng) {
            return Ok((pos, Reason::Block));
        }
        if self.config.learning && self.rng.random::<f64>() < self.config.exploration {
            if let Some(&pos) = board.legal_moves().choose(&mut self.rng) {
                return Ok((pos, Reason::Explore));
            }
        }

        let estimates = self.loss_estimates(board)?;
        let best = estimates
            .into_iter()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .ok_or(Error::GameOver)?;
        trace!("{}: best estimate {:.4} at {}", self.name, best.1, best.0);
        Ok((best.0, Reason::Evaluated))
    }
}

impl Agent for LearningAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn select_move(&mut self, board: &BoardState) -> Result<usize> {
        let mover = board.to_move().ok_or(Error::GameOver)?;
        let (pos, reason) = self.choose(board, mover)?;
        debug!("{} plays {pos} ({reason:?})", self.name);
        if self.phase == Phase::Recording {
            self.episode.push(EpisodeStep {
                state: board.after(pos)?,
                mover,
            });
        }
        Ok(pos)
    }

    fn notify(&mut self, event: GameEvent) -> Result<()> {
        match event {
            GameEvent::Begin => self.begin(),
            GameEvent::Finish(outcome) => {
                self.finish(outcome)?;
            }
        }
        Ok(())
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = build_rng(Some(seed));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EvaluatorConfig;

    fn agent(seed: u64) -> LearningAgent {
        let config = LearnerConfig::default()
            .with_evaluator(EvaluatorConfig::default().with_hidden_layers(vec![16]))
            .with_seed(seed);
        LearningAgent::new("learner", config).unwrap()
    }

    #[test]
    fn test_lifecycle_phases() {
        let mut agent = agent(1);
        assert_eq!(agent.phase(), Phase::Idle);
        agent.begin();
        assert_eq!(agent.phase(), Phase::Recording);
        agent.select_move(&BoardState::new()).unwrap();
        assert_eq!(agent.episode().len(), 1);
        let loss = agent.finish(GameOutcome::Draw).unwrap();
        assert!(loss.is_some());
        assert_eq!(agent.phase(), Phase::Idle);
        assert!(agent.episode().is_empty());
        assert_eq!(agent.games_trained(), 1);
    }

    #[test]
    fn test_idle_agent_does_not_record() {
        let mut agent = agent(2);
        agent.select_move(&BoardState::new()).unwrap();
        assert!(agent.episode().is_empty());
        assert_eq!(agent.learn(GameOutcome::Draw).unwrap(), None);
    }

    #[test]
    fn test_takes_win_before_block() {
        let mut agent = agent(3);
        // X to move, both sides have a live row
        let board = BoardState::from_string("XX.OO....").unwrap();
        assert_eq!(agent.select_move(&board).unwrap(), 2);
    }

    #[test]
    fn test_blocks_immediate_loss() {
        let mut agent = agent(4);
        let board = BoardState::from_string("OO.X....X").unwrap();
        assert_eq!(board.to_move(), Some(Player::X));
        assert_eq!(agent.select_move(&board).unwrap(), 2);
    }

    #[test]
    fn test_records_mover_in_self_play() {
        let mut agent = agent(5);
        agent.begin();
        let mut board = BoardState::new();
        for _ in 0..2 {
            let pos = agent.select_move(&board).unwrap();
            board.play(pos).unwrap();
        }
        let movers: Vec<_> = agent.episode().iter().map(|s| s.mover).collect();
        assert_eq!(movers, vec![Player::X, Player::O]);
        assert_eq!(agent.episode()[1].state, board);
    }

    #[test]
    fn test_greedy_mode_skips_training() {
        let mut agent = agent(6);
        agent.set_learning(false);
        agent.notify(GameEvent::Begin).unwrap();
        agent.select_move(&BoardState::new()).unwrap();
        agent.notify(GameEvent::Finish(GameOutcome::Draw)).unwrap();
        assert!(agent.evaluator().cost_history().is_empty());
        assert_eq!(agent.phase(), Phase::Idle);
    }

    #[test]
    fn test_loss_estimates_cover_legal_moves() {
        let agent = agent(7);
        let board = BoardState::from_string("X...O....").unwrap();
        let estimates = agent.loss_estimates(&board).unwrap();
        let moves: Vec<_> = estimates.iter().map(|e| e.0).collect();
        assert_eq!(moves, board.legal_moves());
        assert!(estimates.iter().all(|e| (0.0..=1.0).contains(&e.1)));
    }
}
