//! Text-driven human player
//!
//! Reads cell numbers line by line from any reader and writes the board and
//! prompts to any writer, so the same agent serves a terminal and tests.

use std::io::{BufRead, Write};

use crate::{
    Error, Result,
    ports::{Agent, GameEvent},
    tictactoe::{BoardState, GameOutcome},
};

/// Cell numbering shown alongside the board
const LEGEND: [&str; 3] = ["0 1 2", "3 4 5", "6 7 8"];

/// Human player over a line-based text interface
#[derive(Debug)]
pub struct HumanAgent<R, W> {
    name: String,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> HumanAgent<R, W> {
    pub fn new(name: impl Into<String>, input: R, output: W) -> Self {
        Self {
            name: name.into(),
            input,
            output,
        }
    }

    /// Give back the reader and writer
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn write_board(&mut self, board: &BoardState) -> Result<()> {
        let rendered = board.to_string();
        writeln!(self.output).map_err(io_error)?;
        for (row, legend) in rendered.lines().zip(LEGEND) {
            let spaced: Vec<String> = row.chars().map(String::from).collect();
            writeln!(self.output, "  {}    {legend}", spaced.join(" ")).map_err(io_error)?;
        }
        Ok(())
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(|source| Error::Io {
            operation: "read move".to_string(),
            source,
        })?;
        if read == 0 {
            return Err(Error::InputClosed);
        }
        Ok(line.trim().to_string())
    }
}

fn io_error(source: std::io::Error) -> Error {
    Error::Io {
        operation: "write prompt".to_string(),
        source,
    }
}

impl<R: BufRead, W: Write> Agent for HumanAgent<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn select_move(&mut self, board: &BoardState) -> Result<usize> {
        let mover = board.to_move().ok_or(Error::GameOver)?;
        self.write_board(board)?;
        loop {
            write!(self.output, "{} ({mover}), choose a cell 0-8: ", self.name).map_err(io_error)?;
            self.output.flush().map_err(io_error)?;
            let line = self.read_line()?;
            match line.parse::<usize>() {
                Ok(pos) if board.verify(pos) => return Ok(pos),
                Ok(pos) => {
                    writeln!(self.output, "Cell {pos} is not available.").map_err(io_error)?;
                }
                Err(_) => {
                    writeln!(self.output, "'{line}' is not a cell number.").map_err(io_error)?;
                }
            }
        }
    }

    fn notify(&mut self, event: GameEvent) -> Result<()> {
        let message = match event {
            GameEvent::Begin => format!("New game for {}.", self.name),
            GameEvent::Finish(GameOutcome::Draw) => "Game drawn.".to_string(),
            GameEvent::Finish(GameOutcome::Win(player)) => format!("{player} wins."),
        };
        writeln!(self.output, "{message}").map_err(io_error)
    }
}
