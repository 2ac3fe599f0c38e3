//! Game outcomes and move history

use serde::{Deserialize, Serialize};

use super::board::{BoardState, GameStatus, Player};
use crate::{Error, Result};

/// Outcome of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

impl GameOutcome {
    /// Outcome of a terminal status, `None` while the game is running
    pub fn from_status(status: GameStatus) -> Option<Self> {
        match status {
            GameStatus::InProgress => None,
            GameStatus::Won(player) => Some(GameOutcome::Win(player)),
            GameStatus::Draw => Some(GameOutcome::Draw),
        }
    }

    /// Swap the winner perspective (X ↔ O).
    pub fn swap_players(self) -> Self {
        match self {
            GameOutcome::Win(player) => GameOutcome::Win(player.opponent()),
            GameOutcome::Draw => GameOutcome::Draw,
        }
    }
}

/// A move in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub position: usize,
    pub player: Player,
}

/// Names of the agents holding each side in one game
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Seats {
    pub x: String,
    pub o: String,
}

impl Seats {
    pub fn new(x: impl Into<String>, o: impl Into<String>) -> Self {
        Seats {
            x: x.into(),
            o: o.into(),
        }
    }

    /// Name of the agent playing `player`
    pub fn name_of(&self, player: Player) -> &str {
        match player {
            Player::X => &self.x,
            Player::O => &self.o,
        }
    }

    /// Whether one agent played both sides
    pub fn is_self_play(&self) -> bool {
        self.x == self.o
    }
}

/// A complete game with history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub first_player: Player,
    pub seats: Seats,
    pub moves: Vec<Move>,
    pub outcome: Option<GameOutcome>,
}

impl GameRecord {
    /// Start an empty record
    pub fn new(first_player: Player, seats: Seats) -> Self {
        GameRecord {
            first_player,
            seats,
            moves: Vec::new(),
            outcome: None,
        }
    }

    /// Name of the winning agent, `None` for a draw or unfinished game
    pub fn winner_name(&self) -> Option<&str> {
        match self.outcome {
            Some(GameOutcome::Win(player)) => Some(self.seats.name_of(player)),
            _ => None,
        }
    }

    /// Append a move that has already been applied to the live board
    pub fn push(&mut self, position: usize, player: Player, status: GameStatus) {
        self.moves.push(Move { position, player });
        self.outcome = GameOutcome::from_status(status);
    }

    /// Replay the record from an empty board.
    ///
    /// # Errors
    ///
    /// Returns error if any recorded move is illegal, which means the record
    /// is corrupted.
    pub fn replay(&self) -> Result<BoardState> {
        let mut state = BoardState::new_with_player(self.first_player);
        for mv in &self.moves {
            if state.to_move() != Some(mv.player) {
                return Err(Error::InvalidConfiguration {
                    message: format!(
                        "recorded move at {} by {} is out of turn",
                        mv.position, mv.player
                    ),
                });
            }
            state.play(mv.position)?;
        }
        Ok(state)
    }

    /// Positions only, in play order
    pub fn positions(&self) -> Vec<usize> {
        self.moves.iter().map(|m| m.position).collect()
    }
}
