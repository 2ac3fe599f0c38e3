//! Agent port - the capability every player implements
//!
//! The game loop only talks to players through this trait, so human,
//! rule-based, learning and baseline agents are interchangeable at a table.

use crate::{
    Result,
    tictactoe::{BoardState, GameOutcome},
};

/// Lifecycle notifications delivered by the game loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A new game is starting
    Begin,
    /// The game has ended with this outcome
    Finish(GameOutcome),
}

/// Agent trait - unified interface for everything that can take a seat
///
/// # Examples
///
/// ```
/// use noughts::{ports::Agent, tictactoe::BoardState, Result};
///
/// struct FirstEmpty;
///
/// impl Agent for FirstEmpty {
///     fn name(&self) -> &str {
///         "first-empty"
///     }
///
///     fn select_move(&mut self, board: &BoardState) -> Result<usize> {
///         board
///             .legal_moves()
///             .first()
///             .copied()
///             .ok_or(noughts::Error::GameOver)
///     }
/// }
///
/// let mut agent = FirstEmpty;
/// assert_eq!(agent.select_move(&BoardState::new()).unwrap(), 0);
/// ```
pub trait Agent {
    /// Name used for registration and reporting. Must be unique at a table.
    fn name(&self) -> &str;

    /// Choose a cell (0-8) for the side to move.
    ///
    /// The board belongs to the game loop; agents simulate on their own copies.
    ///
    /// # Errors
    ///
    /// Returns an error if the board is terminal or the agent cannot decide.
    fn select_move(&mut self, board: &BoardState) -> Result<usize>;

    /// Receive a lifecycle notification.
    ///
    /// The default implementation ignores every event, which suits agents
    /// without per-game state.
    fn notify(&mut self, _event: GameEvent) -> Result<()> {
        Ok(())
    }

    /// Reseed the agent's random source, if it has one.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn select_move(&mut self, board: &BoardState) -> Result<usize> {
        (**self).select_move(board)
    }

    fn notify(&mut self, event: GameEvent) -> Result<()> {
        (**self).notify(event)
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        (**self).set_rng_seed(seed)
    }
}
