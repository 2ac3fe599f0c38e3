//! Board encoding for the evaluator
//!
//! Positions are seen from one player's side: their stones are `+1`, the
//! opponent's `-1`, empty cells `0`. Outcome labels use the same side.

use ndarray::Array2;

use crate::{
    Error, Result,
    tictactoe::{BoardState, CELLS, GameOutcome, Player},
};

/// Label for a drawn game
pub const DRAW: usize = 0;
/// Label for a game won by the side the position is viewed from
pub const VIEWER_WIN: usize = 1;
/// Label for a game lost by the side the position is viewed from
pub const VIEWER_LOSS: usize = 2;

/// Signed cells of `board` with `viewer`'s stones positive
pub fn relative_cells(board: &BoardState, viewer: Player) -> [i8; CELLS] {
    let sign = viewer.sign();
    (*board.cells()).map(|cell| cell.value() * sign)
}

/// Outcome class of `outcome` from `viewer`'s side
pub fn outcome_label(outcome: GameOutcome, viewer: Player) -> usize {
    match outcome {
        GameOutcome::Draw => DRAW,
        GameOutcome::Win(winner) if winner == viewer => VIEWER_WIN,
        GameOutcome::Win(_) => VIEWER_LOSS,
    }
}

/// Stack encoded positions into an `n × 9` batch
pub fn to_batch(rows: &[[i8; CELLS]]) -> Result<Array2<f64>> {
    let flat: Vec<f64> = rows.iter().flatten().map(|&v| f64::from(v)).collect();
    let got = flat.len();
    Array2::from_shape_vec((rows.len(), CELLS), flat).map_err(|_| Error::ShapeMismatch {
        expected: rows.len() * CELLS,
        got,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_cells_flip_with_viewer() {
        let board = BoardState::from_string("XO.......").unwrap();
        let x_view = relative_cells(&board, Player::X);
        let o_view = relative_cells(&board, Player::O);
        assert_eq!(&x_view[..3], &[1, -1, 0]);
        assert_eq!(&o_view[..3], &[-1, 1, 0]);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(outcome_label(GameOutcome::Draw, Player::X), DRAW);
        assert_eq!(outcome_label(GameOutcome::Win(Player::O), Player::O), VIEWER_WIN);
        assert_eq!(outcome_label(GameOutcome::Win(Player::O), Player::X), VIEWER_LOSS);
    }

    #[test]
    fn test_batch_shape() {
        let batch = to_batch(&[[1, 0, 0, 0, -1, 0, 0, 0, 0], [0; CELLS]]).unwrap();
        assert_eq!(batch.dim(), (2, 9));
        assert_eq!(batch[[0, 4]], -1.0);
    }
}
