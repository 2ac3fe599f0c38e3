//! Baseline players: random, one-ply tactical, and human

pub mod human;
pub mod naive;
pub mod random;

pub use human::HumanAgent;
pub use naive::NaiveAgent;
pub use random::RandomAgent;
