//! Rule-based expert player
//!
//! [`ExpertStrategy`] sorts the legal moves into nine priority classes
//! (win, block, fork, threat, spoon, centre, opposite corner, corner, edge)
//! and [`ExpertAgent`] plays from the best non-empty class.

pub mod agent;
pub mod strategy;

pub use agent::ExpertAgent;
pub use strategy::{ExpertStrategy, MoveClass, MoveClassification};
