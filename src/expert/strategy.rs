//! Rule-cascade move selection
//!
//! Every legal move is tested against nine predicates. The selector takes the
//! highest-priority class that has any member and picks uniformly inside it.

use std::fmt;

use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    tictactoe::{BoardState, CENTRE, CORNERS, EDGES, Player},
};

/// Predicate classes in descending priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveClass {
    /// Completes a line for the mover
    Win,
    /// The opponent would complete a line here
    Block,
    /// Leaves the mover with two or more live lines
    Fork,
    /// Leaves exactly one live line whose forced reply does not lose
    Threat,
    /// The opponent would fork here
    Spoon,
    /// Centre cell, except on the opening move
    Centre,
    /// Corner facing an opponent-held corner
    OppositeCorner,
    Corner,
    Edge,
}

impl MoveClass {
    pub const ALL: [MoveClass; 9] = [
        MoveClass::Win,
        MoveClass::Block,
        MoveClass::Fork,
        MoveClass::Threat,
        MoveClass::Spoon,
        MoveClass::Centre,
        MoveClass::OppositeCorner,
        MoveClass::Corner,
        MoveClass::Edge,
    ];

    /// Priority rank, 1 is tried first
    pub fn priority(self) -> usize {
        self.index() + 1
    }

    fn index(self) -> usize {
        match self {
            MoveClass::Win => 0,
            MoveClass::Block => 1,
            MoveClass::Fork => 2,
            MoveClass::Threat => 3,
            MoveClass::Spoon => 4,
            MoveClass::Centre => 5,
            MoveClass::OppositeCorner => 6,
            MoveClass::Corner => 7,
            MoveClass::Edge => 8,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MoveClass::Win => "win",
            MoveClass::Block => "block",
            MoveClass::Fork => "fork",
            MoveClass::Threat => "threat",
            MoveClass::Spoon => "spoon",
            MoveClass::Centre => "centre",
            MoveClass::OppositeCorner => "opposite-corner",
            MoveClass::Corner => "corner",
            MoveClass::Edge => "edge",
        }
    }
}

impl fmt::Display for MoveClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Legal moves sorted into the nine classes.
///
/// A move can sit in several classes; each class lists its cells in
/// ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveClassification {
    classes: [Vec<usize>; 9],
}

impl MoveClassification {
    /// Cells in `class`
    pub fn moves(&self, class: MoveClass) -> &[usize] {
        &self.classes[class.index()]
    }

    /// First non-empty class in priority order
    pub fn best(&self) -> Option<(MoveClass, &[usize])> {
        MoveClass::ALL
            .into_iter()
            .map(|class| (class, self.moves(class)))
            .find(|(_, moves)| !moves.is_empty())
    }

    /// Every class containing `position`, in priority order
    pub fn classes_of(&self, position: usize) -> Vec<MoveClass> {
        MoveClass::ALL
            .into_iter()
            .filter(|&class| self.moves(class).contains(&position))
            .collect()
    }

    fn insert(&mut self, class: MoveClass, position: usize) {
        self.classes[class.index()].push(position);
    }
}

const fn opposite_corner(corner: usize) -> Option<usize> {
    match corner {
        0 => Some(8),
        2 => Some(6),
        6 => Some(2),
        8 => Some(0),
        _ => None,
    }
}

/// Stateless expert move selection
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpertStrategy;

impl ExpertStrategy {
    /// Sort every legal move of the side to move into its classes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GameOver`] on a terminal board.
    pub fn classify(board: &BoardState) -> Result<MoveClassification> {
        let mover = board.to_move().ok_or(Error::GameOver)?;
        let opponent = mover.opponent();
        let as_opponent = board.with_turn(opponent)?;
        let mut classification = MoveClassification::default();

        for pos in board.legal_moves() {
            let next = board.after(pos)?;
            let opponent_next = as_opponent.after(pos)?;
            let wins = next.winner() == Some(mover);

            if wins {
                classification.insert(MoveClass::Win, pos);
            }
            if opponent_next.winner() == Some(opponent) {
                classification.insert(MoveClass::Block, pos);
            }
            if !wins && next.live_lines(mover) >= 2 {
                classification.insert(MoveClass::Fork, pos);
            }
            if !next.is_terminal()
                && next.live_lines(mover) == 1
                && threat_holds(&next, mover)?
            {
                classification.insert(MoveClass::Threat, pos);
            }
            if opponent_next.winner().is_none() && opponent_next.live_lines(opponent) >= 2 {
                classification.insert(MoveClass::Spoon, pos);
            }
            if pos == CENTRE && board.occupied_count() > 0 {
                classification.insert(MoveClass::Centre, pos);
            }
            if let Some(opposite) = opposite_corner(pos) {
                let cells = next.cells();
                if !board.is_empty(opposite)
                    && cells[pos].value() + cells[opposite].value() == 0
                {
                    classification.insert(MoveClass::OppositeCorner, pos);
                }
            }
            if CORNERS.contains(&pos) {
                classification.insert(MoveClass::Corner, pos);
            }
            if EDGES.contains(&pos) {
                classification.insert(MoveClass::Edge, pos);
            }
        }

        Ok(classification)
    }

    /// Pick a move from the first non-empty class, uniformly at random.
    ///
    /// # Errors
    ///
    /// [`Error::GameOver`] on a terminal board, [`Error::NoStrategyMatch`] if
    /// every class is empty (which means the classifier is broken).
    pub fn select<R: Rng + ?Sized>(board: &BoardState, rng: &mut R) -> Result<(usize, MoveClass)> {
        let classification = Self::classify(board)?;
        let (class, moves) = classification.best().ok_or(Error::NoStrategyMatch)?;
        let pos = *moves.choose(rng).ok_or(Error::NoStrategyMatch)?;
        Ok((pos, class))
    }
}

/// Whether the single live line in `threatened` is safe to create.
///
/// The opponent must fill the line's empty cell. The threat holds unless that
/// reply wins, forks, or starts a forced block sequence that ends with the
/// opponent free to fork.
fn threat_holds(threatened: &BoardState, mover: Player) -> Result<bool> {
    let Some(&reply) = threatened.live_cells(mover).first() else {
        return Ok(false);
    };
    survives_reply(threatened.after(reply)?, mover)
}

/// `state` has the mover to play after a forced opponent reply
fn survives_reply(state: BoardState, mover: Player) -> Result<bool> {
    let opponent = mover.opponent();
    if state.winner() == Some(opponent) {
        return Ok(false);
    }
    if state.is_terminal() || state.live_lines(mover) >= 1 {
        return Ok(true);
    }

    match state.live_lines(opponent) {
        0 => Ok(true),
        1 => {
            let Some(&block) = state.live_cells(opponent).first() else {
                return Ok(true);
            };
            let blocked = state.after(block)?;
            if blocked.is_terminal() {
                return Ok(true);
            }
            match blocked.live_lines(mover) {
                0 => Ok(!can_fork(&blocked, opponent)?),
                1 => match blocked.live_cells(mover).first() {
                    Some(&counter) => survives_reply(blocked.after(counter)?, mover),
                    None => Ok(true),
                },
                _ => Ok(true),
            }
        }
        _ => Ok(false),
    }
}

fn can_fork(board: &BoardState, player: Player) -> Result<bool> {
    let as_player = board.with_turn(player)?;
    for pos in as_player.legal_moves() {
        if as_player.after(pos)?.live_lines(player) >= 2 {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn board(s: &str) -> BoardState {
        BoardState::from_string(s).unwrap()
    }

    #[test]
    fn test_class_order_is_priority_order() {
        for (idx, class) in MoveClass::ALL.iter().enumerate() {
            assert_eq!(class.priority(), idx + 1);
        }
    }

    #[test]
    fn test_win_fixture() {
        // X on 0 and 4, O on 1, X to move
        let state = board("XO..X....").with_turn(Player::X).unwrap();
        let classification = ExpertStrategy::classify(&state).unwrap();
        assert_eq!(classification.moves(MoveClass::Win), &[8]);
        assert_eq!(
            classification.classes_of(8),
            vec![MoveClass::Win, MoveClass::Corner]
        );
        assert_eq!(classification.best(), Some((MoveClass::Win, &[8][..])));
    }

    #[test]
    fn test_block_fixture() {
        // Same stones with O to move: 8 must be blocked
        let state = board("XO..X....");
        assert_eq!(state.to_move(), Some(Player::O));
        let classification = ExpertStrategy::classify(&state).unwrap();
        assert_eq!(
            classification.classes_of(8),
            vec![MoveClass::Block, MoveClass::OppositeCorner, MoveClass::Corner]
        );
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            ExpertStrategy::select(&state, &mut rng).unwrap(),
            (8, MoveClass::Block)
        );
    }

    #[test]
    fn test_fork_is_taken() {
        // X on 0 and 8, O on 4 and 1: X at 6 threatens column 0 and row 2
        let state = board("XO..O...X").with_turn(Player::X).unwrap();
        let classification = ExpertStrategy::classify(&state).unwrap();
        assert!(classification.moves(MoveClass::Win).is_empty());
        assert!(classification.moves(MoveClass::Fork).contains(&6));
    }

    #[test]
    fn test_opening_move_skips_centre() {
        let classification = ExpertStrategy::classify(&BoardState::new()).unwrap();
        assert!(classification.moves(MoveClass::Centre).is_empty());
        assert_eq!(classification.moves(MoveClass::Corner), &CORNERS);
        assert_eq!(classification.moves(MoveClass::Edge), &EDGES);
        assert_eq!(classification.best().unwrap().0, MoveClass::Corner);
    }

    #[test]
    fn test_reply_to_corner_opening_is_centre() {
        let state = board("X........");
        let mut rng = StdRng::seed_from_u64(11);
        assert_eq!(
            ExpertStrategy::select(&state, &mut rng).unwrap(),
            (CENTRE, MoveClass::Centre)
        );
    }

    #[test]
    fn test_threat_that_hands_over_a_fork_is_rejected() {
        // X corners 0 and 8, O centre. A corner threat from O forces X into
        // the other corner, which forks.
        let state = board("X...O...X");
        let classification = ExpertStrategy::classify(&state).unwrap();
        let threats = classification.moves(MoveClass::Threat);
        assert!(!threats.contains(&2));
        assert!(!threats.contains(&6));
        assert!(threats.contains(&1));
        assert!(threats.contains(&3));
    }

    #[test]
    fn test_spoon_lists_opponent_fork_cells() {
        // O on 1 and 3 would fork at 0
        let state = board(".O.OXX...");
        assert_eq!(state.to_move(), Some(Player::X));
        let classification = ExpertStrategy::classify(&state).unwrap();
        assert_eq!(classification.moves(MoveClass::Spoon), &[0]);
        assert_eq!(classification.best().unwrap().0, MoveClass::Fork);
    }

    #[test]
    fn test_terminal_board_is_rejected() {
        let state = board("XXXOO....");
        assert!(matches!(
            ExpertStrategy::classify(&state),
            Err(Error::GameOver)
        ));
    }

    #[test]
    fn test_selection_is_always_legal() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut state = BoardState::new();
        while !state.is_terminal() {
            let (pos, _) = ExpertStrategy::select(&state, &mut rng).unwrap();
            assert!(state.verify(pos));
            state.play(pos).unwrap();
        }
        assert!(state.is_draw());
    }
}
