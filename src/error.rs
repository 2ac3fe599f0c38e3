//! Error types for the noughts crate

use thiserror::Error;

/// Main error type for the noughts crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move: game already over")]
    GameOver,

    #[error("invalid move: position {position} is out of bounds (must be 0-8)")]
    InvalidPosition { position: usize },

    #[error("invalid move: position {position} is already occupied")]
    CellOccupied { position: usize },

    #[error("invalid board '{input}': {reason}")]
    InvalidBoardString { input: String, reason: String },

    #[error("internal consistency error: both players completed a line in the same state")]
    SimultaneousWin,

    #[error("internal consistency error: no appropriate move found by the expert strategy")]
    NoStrategyMatch,

    #[error("numerical instability: non-finite gradient in layer {layer}")]
    NonFiniteGradient { layer: usize },

    #[error("batch shape mismatch: expected {expected} columns, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("invalid training labels: {message}")]
    InvalidLabel { message: String },

    #[error("batch has no rows")]
    EmptyBatch,

    #[error("a table seats at most {limit} players")]
    PlayerLimitExceeded { limit: usize },

    #[error("player '{name}' is already seated at this table")]
    DuplicatePlayer { name: String },

    #[error("no players are seated at this table")]
    NoPlayers,

    #[error("player '{name}' made {attempts} invalid moves in a row")]
    TooManyInvalidMoves { name: String, attempts: usize },

    #[error("input closed while waiting for a move")]
    InputClosed,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

impl Error {
    /// Whether this error rejects a single move rather than signalling a bug.
    ///
    /// The game loop re-prompts the player on these and aborts on everything else.
    pub fn is_invalid_move(&self) -> bool {
        matches!(
            self,
            Error::GameOver | Error::InvalidPosition { .. } | Error::CellOccupied { .. }
        )
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
