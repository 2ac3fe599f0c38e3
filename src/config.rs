//! Configuration types for evaluators, learning agents and sessions.
//!
//! Every type deserializes from JSON with per-field defaults, so a config
//! file only needs the values it changes.

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, tictactoe::CELLS};

/// Width of the evaluator's output layer: draw, side-A win, side-B win
pub const OUTCOME_CLASSES: usize = 3;

/// Hyperparameters of a [`FeedForwardEvaluator`](crate::network::FeedForwardEvaluator).
///
/// # Examples
///
/// ```
/// use noughts::config::EvaluatorConfig;
///
/// let config = EvaluatorConfig::default()
///     .with_hidden_layers(vec![18])
///     .with_learning_rate(0.1)
///     .with_seed(7);
/// assert_eq!(config.layer_sizes(), vec![9, 18, 3]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Widths of the ReLU hidden layers, input side first
    pub hidden_layers: Vec<usize>,
    /// Gradient descent step size
    pub learning_rate: f64,
    /// L2 penalty on weight matrices
    pub regularizer: f64,
    /// Seed for weight initialisation
    pub seed: Option<u64>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            hidden_layers: vec![36, 36],
            learning_rate: 0.05,
            regularizer: 1e-4,
            seed: None,
        }
    }
}

impl EvaluatorConfig {
    pub fn with_hidden_layers(mut self, hidden_layers: Vec<usize>) -> Self {
        self.hidden_layers = hidden_layers;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_regularizer(mut self, regularizer: f64) -> Self {
        self.regularizer = regularizer;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Full layer widths: board cells, hidden layers, outcome classes
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden_layers.len() + 2);
        sizes.push(CELLS);
        sizes.extend_from_slice(&self.hidden_layers);
        sizes.push(OUTCOME_CLASSES);
        sizes
    }

    /// Check that the hyperparameters describe a trainable network.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for a zero-width hidden layer,
    /// a non-positive learning rate or a negative regularizer.
    pub fn validate(&self) -> Result<()> {
        if let Some(idx) = self.hidden_layers.iter().position(|&w| w == 0) {
            return Err(Error::InvalidConfiguration {
                message: format!("hidden layer {idx} has zero width"),
            });
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidConfiguration {
                message: format!("learning rate {} must be positive", self.learning_rate),
            });
        }
        if !(self.regularizer.is_finite() && self.regularizer >= 0.0) {
            return Err(Error::InvalidConfiguration {
                message: format!("regularizer {} must be non-negative", self.regularizer),
            });
        }
        Ok(())
    }
}

/// Configuration of a [`LearningAgent`](crate::learning::LearningAgent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerConfig {
    pub evaluator: EvaluatorConfig,
    /// Probability of a random move when no immediate win or block exists
    pub exploration: f64,
    /// Train after each game and explore; off means greedy play only
    pub learning: bool,
    /// Seed for move selection
    pub seed: Option<u64>,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            evaluator: EvaluatorConfig::default(),
            exploration: 0.1,
            learning: true,
            seed: None,
        }
    }
}

impl LearnerConfig {
    pub fn with_evaluator(mut self, evaluator: EvaluatorConfig) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    pub fn with_learning(mut self, learning: bool) -> Self {
        self.learning = learning;
        self
    }

    /// Seed both move selection and weight initialisation
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self.evaluator.seed = Some(seed.wrapping_add(1));
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.evaluator.validate()?;
        if !(0.0..=1.0).contains(&self.exploration) {
            return Err(Error::InvalidConfiguration {
                message: format!("exploration {} must be in [0, 1]", self.exploration),
            });
        }
        Ok(())
    }

    /// Load a JSON config file; missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_json(path.as_ref())
    }

    /// Write the config as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_json(self, path.as_ref())
    }
}

/// Who opens each game of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirstMove {
    /// The seats take turns opening, first seat opens game 0
    #[default]
    Alternate,
    /// A coin flip per game
    Random,
    /// The first registered seat always opens
    First,
    /// The second registered seat always opens
    Second,
}

impl std::str::FromStr for FirstMove {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alternate" => Ok(FirstMove::Alternate),
            "random" => Ok(FirstMove::Random),
            "first" => Ok(FirstMove::First),
            "second" => Ok(FirstMove::Second),
            other => Err(Error::InvalidConfiguration {
                message: format!(
                    "unknown first-move rule '{other}' (expected alternate, random, first or second)"
                ),
            }),
        }
    }
}

/// Configuration for a [`Session`](crate::pipeline::Session) of games.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of games to play
    pub games: usize,
    /// Seed for the table's own coin flips and for reseeding agents
    pub seed: Option<u64>,
    pub first_move: FirstMove,
    /// Consecutive invalid moves tolerated from one agent before aborting
    pub max_invalid_moves: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            games: 100,
            seed: None,
            first_move: FirstMove::default(),
            max_invalid_moves: 10,
        }
    }
}

impl SessionConfig {
    pub fn with_games(mut self, games: usize) -> Self {
        self.games = games;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_first_move(mut self, first_move: FirstMove) -> Self {
        self.first_move = first_move;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_invalid_moves == 0 {
            return Err(Error::InvalidConfiguration {
                message: "max_invalid_moves must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_json(path.as_ref())
    }
}

fn load_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|source| Error::Io {
        operation: format!("open config {}", path.display()),
        source,
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

pub(crate) fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::Io {
        operation: format!("create {}", path.display()),
        source,
    })?;
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(EvaluatorConfig::default().validate().is_ok());
        assert!(LearnerConfig::default().validate().is_ok());
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_layer_sizes() {
        let config = EvaluatorConfig::default().with_hidden_layers(vec![5, 4]);
        assert_eq!(config.layer_sizes(), vec![9, 5, 4, 3]);
        let linear = EvaluatorConfig::default().with_hidden_layers(Vec::new());
        assert_eq!(linear.layer_sizes(), vec![9, 3]);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(
            EvaluatorConfig::default()
                .with_hidden_layers(vec![4, 0])
                .validate()
                .is_err()
        );
        assert!(
            EvaluatorConfig::default()
                .with_learning_rate(0.0)
                .validate()
                .is_err()
        );
        assert!(
            EvaluatorConfig::default()
                .with_regularizer(f64::NAN)
                .validate()
                .is_err()
        );
        assert!(
            LearnerConfig::default()
                .with_exploration(1.5)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: LearnerConfig =
            serde_json::from_str(r#"{"exploration": 0.0, "evaluator": {"learning_rate": 0.2}}"#)
                .unwrap();
        assert_eq!(config.exploration, 0.0);
        assert_eq!(config.evaluator.learning_rate, 0.2);
        assert_eq!(config.evaluator.hidden_layers, vec![36, 36]);
        assert!(config.learning);
    }

    #[test]
    fn test_first_move_parsing() {
        assert_eq!("Random".parse::<FirstMove>().unwrap(), FirstMove::Random);
        assert!("sometimes".parse::<FirstMove>().is_err());
        let config: SessionConfig = serde_json::from_str(r#"{"first_move": "second"}"#).unwrap();
        assert_eq!(config.first_move, FirstMove::Second);
    }
}
