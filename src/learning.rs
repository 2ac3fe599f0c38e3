//! Self-play learning with a neural evaluator

pub mod agent;
pub mod encoding;

pub use agent::{EpisodeStep, LearningAgent, Phase};
