//! Noughts and crosses agents, from a random mover to a self-taught network
//!
//! This crate provides:
//! - Tic-Tac-Toe board, line analysis and the eight board symmetries
//! - A rule-based expert that sorts moves into priority classes
//! - A learning agent that trains a small feed-forward evaluator by play
//! - Random, naive and human baseline players
//! - A table that runs games between agents, and multi-game sessions with observers

pub mod agents;
pub mod cli;
pub mod config;
pub mod error;
pub mod expert;
pub mod learning;
pub mod network;
pub mod pipeline;
pub mod ports;
pub mod tictactoe;

pub use error::{Error, Result};
