//! Tic-Tac-Toe game implementation

pub mod board;
pub mod game;
pub mod lines;
pub mod symmetry;

pub use board::{BoardState, CELLS, CENTRE, CORNERS, Cell, EDGES, GameStatus, Player};
pub use game::{GameOutcome, GameRecord, Move, Seats};
pub use lines::{LineAnalyzer, LineSums, WINNING_LINES};
pub use symmetry::{D4Transform, expand_symmetries, orbit};
