//! Observer port - watching a session without coupling to its loop
//!
//! Progress bars, tallies and log output all attach to a session through
//! this trait.

use crate::{
    Result,
    tictactoe::{BoardState, GameRecord},
};

/// Observer trait for monitoring a session of games
///
/// # Event Sequence
///
/// 1. `on_session_start(total_games)` - once
/// 2. For each game:
///    - `on_game_start(game_num)`
///    - `on_move(...)` for each accepted move
///    - `on_game_end(game_num, record)`
/// 3. `on_session_end()` - once
///
/// # Examples
///
/// ```
/// use noughts::{ports::Observer, tictactoe::GameRecord};
///
/// struct Counter {
///     games: usize,
/// }
///
/// impl Observer for Counter {
///     fn on_game_end(&mut self, _game_num: usize, _record: &GameRecord) -> noughts::Result<()> {
///         self.games += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer {
    /// Called once before the first game.
    fn on_session_start(&mut self, _total_games: usize) -> Result<()> {
        Ok(())
    }

    /// Called when a game starts.
    fn on_game_start(&mut self, _game_num: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each accepted move.
    ///
    /// # Parameters
    ///
    /// * `game_num` - Index of the current game
    /// * `player_name` - Name of the agent that moved
    /// * `before` - Board state before the move
    /// * `position` - Cell the agent played
    fn on_move(
        &mut self,
        _game_num: usize,
        _player_name: &str,
        _before: &BoardState,
        _position: usize,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when a game ends, after every agent has been notified.
    fn on_game_end(&mut self, _game_num: usize, _record: &GameRecord) -> Result<()> {
        Ok(())
    }

    /// Called once after the last game.
    fn on_session_end(&mut self) -> Result<()> {
        Ok(())
    }
}
