//! Command-line interface for playing, matching and training agents

pub mod agents;
pub mod commands;
pub mod output;
