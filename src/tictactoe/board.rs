//! Board state representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lines::{LineAnalyzer, LineSums};
use crate::{Error, Result};

/// Number of cells on the board
pub const CELLS: usize = 9;

/// The centre cell
pub const CENTRE: usize = 4;

/// Corner cells, in index order
pub const CORNERS: [usize; 4] = [0, 2, 6, 8];

/// Edge-midpoint cells, in index order
pub const EDGES: [usize; 4] = [1, 3, 5, 7];

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    /// Signed trit: +1 for X, -1 for O, 0 for empty
    pub fn value(self) -> i8 {
        match self {
            Cell::Empty => 0,
            Cell::X => 1,
            Cell::O => -1,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | '-' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }

    fn to_player(self) -> Option<Player> {
        match self {
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
            Cell::Empty => None,
        }
    }
}

/// A player in the game. X is side A (+1), O is side B (-1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }

    /// +1 for X, -1 for O
    pub fn sign(self) -> i8 {
        self.to_cell().value()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell().to_char())
    }
}

/// Where a game stands. Exactly one variant holds for any board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won(Player),
    Draw,
}

/// Complete board state: cells, whose turn it is, and the terminal result.
///
/// This type implements `Copy`; lookahead always works on copies and never on
/// the board owned by the game loop. The line-sum vector is cached and kept in
/// step with the cells by [`BoardState::play`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardState {
    cells: [Cell; CELLS],
    to_move: Player,
    status: GameStatus,
    sums: LineSums,
}

impl BoardState {
    /// Create a new empty board with X to move
    pub fn new() -> Self {
        Self::new_with_player(Player::X)
    }

    /// Create a new empty board with a specified player to move first.
    pub fn new_with_player(first_player: Player) -> Self {
        BoardState {
            cells: [Cell::Empty; CELLS],
            to_move: first_player,
            status: GameStatus::InProgress,
            sums: [0; 8],
        }
    }

    /// Build a board from raw cells with an explicit player to move.
    ///
    /// Piece counts are not checked, which makes this handy for fixtures.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SimultaneousWin`] if both players have a completed line.
    pub fn from_cells(cells: [Cell; CELLS], to_move: Player) -> Result<Self> {
        let sums = LineAnalyzer::sums(&cells);
        let status = Self::evaluate(&cells, &sums)?;
        Ok(BoardState {
            cells,
            to_move,
            status,
            sums,
        })
    }

    /// Create a board from a string such as `"XO.\n.X.\n..O"`.
    ///
    /// Whitespace is ignored. The player to move is inferred from piece counts
    /// assuming X opened the game.
    ///
    /// # Errors
    ///
    /// Returns error if there are not exactly 9 cells, a character is not a
    /// valid cell, the piece counts cannot arise with X opening, or both
    /// players have a completed line.
    pub fn from_string(s: &str) -> Result<Self> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() != CELLS {
            return Err(Error::InvalidBoardString {
                input: s.to_string(),
                reason: format!("expected {CELLS} cells, got {}", chars.len()),
            });
        }

        let mut cells = [Cell::Empty; CELLS];
        for (i, &c) in chars.iter().enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| Error::InvalidBoardString {
                input: s.to_string(),
                reason: format!("invalid character '{c}' at position {i}"),
            })?;
        }

        let x_count = cells.iter().filter(|&&c| c == Cell::X).count();
        let o_count = cells.iter().filter(|&&c| c == Cell::O).count();
        let to_move = if x_count == o_count {
            Player::X
        } else if x_count == o_count + 1 {
            Player::O
        } else {
            return Err(Error::InvalidBoardString {
                input: s.to_string(),
                reason: format!("invalid piece counts X={x_count}, O={o_count}"),
            });
        };

        Self::from_cells(cells, to_move)
    }

    /// Same turn marker, different cells
    pub(super) fn remap(&self, cells: [Cell; CELLS]) -> Result<Self> {
        Self::from_cells(cells, self.to_move)
    }

    fn evaluate(cells: &[Cell; CELLS], sums: &LineSums) -> Result<GameStatus> {
        let x_won = LineAnalyzer::has_won(sums, Player::X);
        let o_won = LineAnalyzer::has_won(sums, Player::O);
        match (x_won, o_won) {
            (true, true) => Err(Error::SimultaneousWin),
            (true, false) => Ok(GameStatus::Won(Player::X)),
            (false, true) => Ok(GameStatus::Won(Player::O)),
            (false, false) if !cells.contains(&Cell::Empty) => Ok(GameStatus::Draw),
            (false, false) => Ok(GameStatus::InProgress),
        }
    }

    /// Get cell at position (0-8)
    pub fn get(&self, pos: usize) -> Cell {
        self.cells[pos]
    }

    /// All nine cells, row-major
    pub fn cells(&self) -> &[Cell; CELLS] {
        &self.cells
    }

    /// Check if a position is empty
    pub fn is_empty(&self, pos: usize) -> bool {
        self.cells[pos] == Cell::Empty
    }

    /// Count the number of occupied cells on the board.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    /// Get all empty positions
    pub fn empty_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Get legal moves in this position (empty cells when game not terminal)
    pub fn legal_moves(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.empty_positions()
    }

    /// Whether `pos` is a legal move right now
    pub fn verify(&self, pos: usize) -> bool {
        !self.is_terminal() && pos < CELLS && self.is_empty(pos)
    }

    /// Place the mover's mark at `pos` and advance the game.
    ///
    /// On failure the board is left untouched.
    ///
    /// # Errors
    ///
    /// - [`Error::GameOver`] if the board is terminal
    /// - [`Error::InvalidPosition`] if `pos` is not in 0-8
    /// - [`Error::CellOccupied`] if the cell is taken
    /// - [`Error::SimultaneousWin`] if both players end up with a completed line
    pub fn play(&mut self, pos: usize) -> Result<GameStatus> {
        if self.is_terminal() {
            return Err(Error::GameOver);
        }
        if pos >= CELLS {
            return Err(Error::InvalidPosition { position: pos });
        }
        if !self.is_empty(pos) {
            return Err(Error::CellOccupied { position: pos });
        }

        let mut cells = self.cells;
        cells[pos] = self.to_move.to_cell();
        let sums = LineAnalyzer::sums(&cells);
        let status = Self::evaluate(&cells, &sums)?;

        self.cells = cells;
        self.sums = sums;
        self.status = status;
        if status == GameStatus::InProgress {
            self.to_move = self.to_move.opponent();
        }
        Ok(status)
    }

    /// Copy the board and play `pos` on the copy
    #[must_use = "after returns a new board state; the original is unchanged"]
    pub fn after(&self, pos: usize) -> Result<BoardState> {
        let mut next = *self;
        next.play(pos)?;
        Ok(next)
    }

    /// Copy the board with `player` to move instead.
    ///
    /// Used to ask what would happen if the other side played a cell.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GameOver`] if the board is terminal.
    #[must_use = "with_turn returns a new board state; the original is unchanged"]
    pub fn with_turn(&self, player: Player) -> Result<BoardState> {
        if self.is_terminal() {
            return Err(Error::GameOver);
        }
        let mut copy = *self;
        copy.to_move = player;
        Ok(copy)
    }

    /// The player to move, or `None` once the game is over
    pub fn to_move(&self) -> Option<Player> {
        match self.status {
            GameStatus::InProgress => Some(self.to_move),
            _ => None,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Check if the game is over (win or draw)
    pub fn is_terminal(&self) -> bool {
        self.status != GameStatus::InProgress
    }

    /// Get the winner if there is one
    pub fn winner(&self) -> Option<Player> {
        match self.status {
            GameStatus::Won(player) => Some(player),
            _ => None,
        }
    }

    /// Check if the position is a draw (all cells filled, no winner)
    pub fn is_draw(&self) -> bool {
        self.status == GameStatus::Draw
    }

    /// The line-sum vector: rows, columns, diagonals
    pub fn line_sums(&self) -> &LineSums {
        &self.sums
    }

    /// Number of live (one move from complete) lines for `player`
    pub fn live_lines(&self, player: Player) -> usize {
        LineAnalyzer::live_count(&self.sums, player)
    }

    /// The empty cell of each of `player`'s live lines
    pub fn live_cells(&self, player: Player) -> Vec<usize> {
        LineAnalyzer::live_cells(&self.cells, &self.sums, player)
    }

    /// Cells where `player` would complete a line if it were their turn
    pub fn winning_moves_for(&self, player: Player) -> Vec<usize> {
        let mut cells = self.live_cells(player);
        cells.sort_unstable();
        cells.dedup();
        cells
    }

    /// Owner of a cell, if any
    pub fn owner(&self, pos: usize) -> Option<Player> {
        self.cells[pos].to_player()
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.cells.iter().enumerate() {
            write!(f, "{}", cell.to_char())?;
            if (i + 1) % 3 == 0 && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
