//! Two-seat game loop
//!
//! A [`Table`] owns the authoritative board for each game. Agents only ever
//! see a shared reference to it, and every move they return is checked
//! before it is applied.

use log::{debug, warn};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    Error, Result,
    config::{FirstMove, SessionConfig},
    ports::{Agent, GameEvent, Observer},
    tictactoe::{BoardState, GameOutcome, GameRecord, Player, Seats},
};

/// Seats at a noughts and crosses table
pub const MAX_PLAYERS: usize = 2;

/// Game loop for up to two agents.
///
/// A table holds mutable borrows of its agents, so an agent can sit at only
/// one table at a time. With a single agent seated, that agent plays both
/// sides.
///
/// # Examples
///
/// ```
/// use noughts::{agents::RandomAgent, expert::ExpertAgent, pipeline::Table};
///
/// let mut expert = ExpertAgent::with_seed("expert", 1);
/// let mut random = RandomAgent::with_seed("random", 2);
///
/// let mut table = Table::new();
/// table.add_player(&mut expert).unwrap();
/// table.add_player(&mut random).unwrap();
///
/// let record = table.play().unwrap();
/// assert_ne!(record.winner_name(), Some("random"));
/// ```
pub struct Table<'a> {
    seats: Vec<&'a mut dyn Agent>,
    first_move: FirstMove,
    max_invalid_moves: usize,
    rng: StdRng,
    games_played: usize,
}

impl<'a> Table<'a> {
    pub fn new() -> Self {
        Self::from_config(&SessionConfig::default())
    }

    /// Table using the opening rule, invalid-move limit and seed of `config`
    pub fn from_config(config: &SessionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            seats: Vec::with_capacity(MAX_PLAYERS),
            first_move: config.first_move,
            max_invalid_moves: config.max_invalid_moves.max(1),
            rng,
            games_played: 0,
        }
    }

    pub fn with_first_move(mut self, first_move: FirstMove) -> Self {
        self.first_move = first_move;
        self
    }

    pub fn with_max_invalid_moves(mut self, max_invalid_moves: usize) -> Self {
        self.max_invalid_moves = max_invalid_moves.max(1);
        self
    }

    /// Seat an agent.
    ///
    /// # Errors
    ///
    /// [`Error::PlayerLimitExceeded`] when both seats are taken,
    /// [`Error::DuplicatePlayer`] when an agent with the same name is seated.
    pub fn add_player(&mut self, agent: &'a mut dyn Agent) -> Result<()> {
        if self.seats.len() >= MAX_PLAYERS {
            return Err(Error::PlayerLimitExceeded { limit: MAX_PLAYERS });
        }
        if self.seats.iter().any(|seated| seated.name() == agent.name()) {
            return Err(Error::DuplicatePlayer {
                name: agent.name().to_string(),
            });
        }
        debug!("seating {}", agent.name());
        self.seats.push(agent);
        Ok(())
    }

    /// Names of seated agents in registration order
    pub fn player_names(&self) -> Vec<&str> {
        self.seats.iter().map(|agent| agent.name()).collect()
    }

    pub fn games_played(&self) -> usize {
        self.games_played
    }

    /// Reseed the table and every seated agent from one seed
    pub fn seed_all(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        for (offset, agent) in (1u64..).zip(self.seats.iter_mut()) {
            agent.set_rng_seed(seed.wrapping_add(offset))?;
        }
        Ok(())
    }

    /// Play one game without observers
    pub fn play(&mut self) -> Result<GameRecord> {
        let game_num = self.games_played;
        self.play_observed(game_num, &mut [])
    }

    /// Play one game, reporting to `observers`.
    ///
    /// Every seated agent gets exactly one `Begin` and one `Finish`, even when
    /// it plays both sides.
    ///
    /// # Errors
    ///
    /// [`Error::NoPlayers`] on an empty table, [`Error::TooManyInvalidMoves`]
    /// when an agent keeps proposing illegal cells, and any error raised by an
    /// agent or observer.
    pub fn play_observed(
        &mut self,
        game_num: usize,
        observers: &mut [Box<dyn Observer + '_>],
    ) -> Result<GameRecord> {
        if self.seats.is_empty() {
            return Err(Error::NoPlayers);
        }
        let (x_seat, o_seat) = self.assign_sides();
        let seats = Seats::new(self.seats[x_seat].name(), self.seats[o_seat].name());
        debug!("game {game_num}: {} (X) vs {} (O)", seats.x, seats.o);

        for agent in self.seats.iter_mut() {
            agent.notify(GameEvent::Begin)?;
        }
        for observer in observers.iter_mut() {
            observer.on_game_start(game_num)?;
        }

        let mut board = BoardState::new();
        let mut record = GameRecord::new(Player::X, seats);

        while let Some(player) = board.to_move() {
            let seat = if player == Player::X { x_seat } else { o_seat };
            let agent = &mut *self.seats[seat];
            let pos = request_move(agent, &board, self.max_invalid_moves)?;
            for observer in observers.iter_mut() {
                observer.on_move(game_num, agent.name(), &board, pos)?;
            }
            let status = board.play(pos)?;
            record.push(pos, player, status);
        }

        let outcome = GameOutcome::from_status(board.status()).ok_or(Error::GameOver)?;
        for agent in self.seats.iter_mut() {
            agent.notify(GameEvent::Finish(outcome))?;
        }
        for observer in observers.iter_mut() {
            observer.on_game_end(game_num, &record)?;
        }

        self.games_played += 1;
        Ok(record)
    }

    /// Seat indices for X and O; X always opens
    fn assign_sides(&mut self) -> (usize, usize) {
        if self.seats.len() == 1 {
            return (0, 0);
        }
        let first_opens = match self.first_move {
            FirstMove::Alternate => self.games_played % 2 == 0,
            FirstMove::Random => self.rng.random_bool(0.5),
            FirstMove::First => true,
            FirstMove::Second => false,
        };
        if first_opens { (0, 1) } else { (1, 0) }
    }
}

impl Default for Table<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Ask `agent` for a move until it offers a legal one or runs out of tries
fn request_move(agent: &mut dyn Agent, board: &BoardState, limit: usize) -> Result<usize> {
    let mut attempts = 0;
    loop {
        match agent.select_move(board) {
            Ok(pos) if board.verify(pos) => return Ok(pos),
            Ok(pos) => warn!("{} chose unavailable cell {pos}", agent.name()),
            Err(err) if err.is_invalid_move() => warn!("{}: {err}", agent.name()),
            Err(err) => return Err(err),
        }
        attempts += 1;
        if attempts >= limit {
            return Err(Error::TooManyInvalidMoves {
                name: agent.name().to_string(),
                attempts,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{agents::RandomAgent, expert::ExpertAgent};

    /// Agent that replays a fixed list of cells and counts notifications
    struct Scripted {
        name: String,
        moves: Vec<usize>,
        next: usize,
        begins: usize,
        finishes: Vec<GameOutcome>,
    }

    impl Scripted {
        fn new(name: &str, moves: &[usize]) -> Self {
            Self {
                name: name.to_string(),
                moves: moves.to_vec(),
                next: 0,
                begins: 0,
                finishes: Vec::new(),
            }
        }
    }

    impl Agent for Scripted {
        fn name(&self) -> &str {
            &self.name
        }

        fn select_move(&mut self, _board: &BoardState) -> Result<usize> {
            let pos = self.moves[self.next % self.moves.len()];
            self.next += 1;
            Ok(pos)
        }

        fn notify(&mut self, event: GameEvent) -> Result<()> {
            match event {
                GameEvent::Begin => self.begins += 1,
                GameEvent::Finish(outcome) => self.finishes.push(outcome),
            }
            Ok(())
        }
    }

    #[test]
    fn test_registration_limits() {
        let mut a = RandomAgent::with_seed("a", 0);
        let mut b = RandomAgent::with_seed("b", 0);
        let mut c = RandomAgent::with_seed("c", 0);
        let mut a2 = RandomAgent::with_seed("a", 1);

        let mut table = Table::new();
        table.add_player(&mut a).unwrap();
        assert!(matches!(
            table.add_player(&mut a2),
            Err(Error::DuplicatePlayer { .. })
        ));
        table.add_player(&mut b).unwrap();
        assert!(matches!(
            table.add_player(&mut c),
            Err(Error::PlayerLimitExceeded { limit: 2 })
        ));
        assert_eq!(table.player_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_table() {
        let mut table = Table::new();
        assert!(matches!(table.play(), Err(Error::NoPlayers)));
    }

    #[test]
    fn test_scripted_game_and_notifications() {
        let mut x = Scripted::new("x", &[0, 1, 2]);
        let mut o = Scripted::new("o", &[3, 4]);
        {
            let mut table = Table::new().with_first_move(FirstMove::First);
            table.add_player(&mut x).unwrap();
            table.add_player(&mut o).unwrap();
            let record = table.play().unwrap();
            assert_eq!(record.positions(), vec![0, 3, 1, 4, 2]);
            assert_eq!(record.winner_name(), Some("x"));
        }
        assert_eq!(x.begins, 1);
        assert_eq!(o.begins, 1);
        assert_eq!(x.finishes, vec![GameOutcome::Win(Player::X)]);
        assert_eq!(o.finishes, vec![GameOutcome::Win(Player::X)]);
    }

    #[test]
    fn test_invalid_moves_are_reprompted() {
        // Second attempt at 0 is rejected, then 2 is accepted
        let mut x = Scripted::new("x", &[0, 0, 2, 6, 8, 4]);
        let mut o = Scripted::new("o", &[1, 3, 5, 7]);
        let mut table = Table::new().with_first_move(FirstMove::First);
        table.add_player(&mut x).unwrap();
        table.add_player(&mut o).unwrap();
        let record = table.play().unwrap();
        assert_eq!(record.positions()[..3], [0, 1, 2]);
        assert!(record.replay().is_ok());
    }

    #[test]
    fn test_persistent_invalid_moves_abort() {
        let mut x = Scripted::new("x", &[4]);
        let mut o = Scripted::new("o", &[4]);
        let mut table = Table::new()
            .with_first_move(FirstMove::First)
            .with_max_invalid_moves(3);
        table.add_player(&mut x).unwrap();
        table.add_player(&mut o).unwrap();
        match table.play() {
            Err(Error::TooManyInvalidMoves { name, attempts }) => {
                assert_eq!(name, "o");
                assert_eq!(attempts, 3);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_alternating_openers() {
        let mut a = RandomAgent::with_seed("a", 0);
        let mut b = RandomAgent::with_seed("b", 1);
        let mut table = Table::new();
        table.add_player(&mut a).unwrap();
        table.add_player(&mut b).unwrap();
        let first = table.play().unwrap();
        let second = table.play().unwrap();
        assert_eq!(first.seats.x, "a");
        assert_eq!(second.seats.x, "b");
        assert_eq!(table.games_played(), 2);
    }

    #[test]
    fn test_self_play_notifies_once() {
        let mut agent = Scripted::new("solo", &[0, 3, 1, 4, 2]);
        {
            let mut table = Table::new();
            table.add_player(&mut agent).unwrap();
            let record = table.play().unwrap();
            assert!(record.seats.is_self_play());
            assert_eq!(record.outcome, Some(GameOutcome::Win(Player::X)));
        }
        assert_eq!(agent.begins, 1);
        assert_eq!(agent.finishes.len(), 1);
    }

    #[test]
    fn test_expert_never_loses_at_table() {
        let mut expert = ExpertAgent::with_seed("expert", 3);
        let mut random = RandomAgent::with_seed("random", 4);
        let mut table = Table::new();
        table.add_player(&mut expert).unwrap();
        table.add_player(&mut random).unwrap();
        for _ in 0..50 {
            let record = table.play().unwrap();
            assert_ne!(record.winner_name(), Some("random"));
        }
    }
}
