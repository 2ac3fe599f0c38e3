//! Ports (trait boundaries) between the game core and its players.
//!
//! Agents plug into the game loop through [`Agent`]; session reporting plugs
//! in through [`Observer`].

pub mod agent;
pub mod observer;

pub use agent::{Agent, GameEvent};
pub use observer::Observer;
