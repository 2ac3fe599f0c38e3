//! Winning line analysis for Tic-Tac-Toe

use super::{Cell, Player};

/// Winning line indices on the 3x3 board
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Signed sum of each winning line: rows, then columns, then diagonals.
pub type LineSums = [i8; 8];

/// Utility for analyzing winning lines in Tic-Tac-Toe
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Compute the line-sum vector for a grid
    pub fn sums(cells: &[Cell; 9]) -> LineSums {
        let mut sums = [0i8; 8];
        for (sum, line) in sums.iter_mut().zip(WINNING_LINES.iter()) {
            *sum = line.iter().map(|&idx| cells[idx].value()).sum();
        }
        sums
    }

    /// Check if a player has a completed line
    pub fn has_won(sums: &LineSums, player: Player) -> bool {
        let target = 3 * player.sign();
        sums.contains(&target)
    }

    /// Number of lines the player can complete with a single move
    pub fn live_count(sums: &LineSums, player: Player) -> usize {
        let target = 2 * player.sign();
        sums.iter().filter(|&&sum| sum == target).count()
    }

    /// Empty cell of every live line for the player, in line order.
    ///
    /// Two live lines may share their empty cell, so the result can contain
    /// the same position twice.
    pub fn live_cells(cells: &[Cell; 9], sums: &LineSums, player: Player) -> Vec<usize> {
        let target = 2 * player.sign();
        sums.iter()
            .zip(WINNING_LINES.iter())
            .filter(|&(&sum, _)| sum == target)
            .filter_map(|(_, line)| line.iter().copied().find(|&idx| cells[idx] == Cell::Empty))
            .collect()
    }
}
