//! Multi-game sessions and their results

use std::{collections::BTreeMap, fmt, fs::File, io::BufReader, path::Path};

use log::info;
use serde::{Deserialize, Serialize};

use super::table::Table;
use crate::{
    Error, Result,
    config::{SessionConfig, write_json},
    ports::{Agent, Observer},
    tictactoe::GameRecord,
};

/// Result of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Games played
    pub games: usize,
    pub draws: usize,
    /// Games won, keyed by agent name
    pub wins: BTreeMap<String, usize>,
    /// Games opened, keyed by agent name
    pub openings: BTreeMap<String, usize>,
    /// Moves across all games
    pub total_moves: usize,
}

impl SessionSummary {
    /// Empty summary listing every player, so players without a win show zero
    pub fn new<S: AsRef<str>>(players: &[S]) -> Self {
        let zeroes: BTreeMap<String, usize> = players
            .iter()
            .map(|name| (name.as_ref().to_string(), 0))
            .collect();
        Self {
            games: 0,
            draws: 0,
            wins: zeroes.clone(),
            openings: zeroes,
            total_moves: 0,
        }
    }

    /// Fold one finished game into the totals
    pub fn record(&mut self, record: &GameRecord) {
        self.games += 1;
        self.total_moves += record.moves.len();
        *self.openings.entry(record.seats.x.clone()).or_default() += 1;
        match record.winner_name() {
            Some(name) => *self.wins.entry(name.to_string()).or_default() += 1,
            None => self.draws += 1,
        }
    }

    pub fn wins_for(&self, name: &str) -> usize {
        self.wins.get(name).copied().unwrap_or(0)
    }

    /// Decisive games `name` did not win
    pub fn losses_for(&self, name: &str) -> usize {
        self.games - self.draws - self.wins_for(name)
    }

    pub fn win_rate(&self, name: &str) -> f64 {
        rate(self.wins_for(name), self.games)
    }

    pub fn loss_rate(&self, name: &str) -> f64 {
        rate(self.losses_for(name), self.games)
    }

    pub fn draw_rate(&self) -> f64 {
        rate(self.draws, self.games)
    }

    pub fn avg_game_length(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_moves as f64 / self.games as f64
        }
    }

    /// Save summary to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_json(self, path.as_ref())
    }

    /// Load summary from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open summary {}", path.display()),
            source,
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Games: {}", self.games)?;
        for (name, wins) in &self.wins {
            writeln!(
                f,
                "  {name:<16} wins {wins:>6} ({:>5.1}%)",
                100.0 * self.win_rate(name)
            )?;
        }
        writeln!(
            f,
            "  {:<16} {:>11} ({:>5.1}%)",
            "draws",
            self.draws,
            100.0 * self.draw_rate()
        )?;
        write!(f, "  average length {:.2} moves", self.avg_game_length())
    }
}

/// A run of games at one table.
///
/// # Examples
///
/// ```
/// use noughts::{config::SessionConfig, expert::ExpertAgent, pipeline::Session};
///
/// let mut a = ExpertAgent::new("a");
/// let mut b = ExpertAgent::new("b");
/// let mut session = Session::new(SessionConfig::default().with_games(5).with_seed(1)).unwrap();
/// session.add_player(&mut a).unwrap();
/// session.add_player(&mut b).unwrap();
///
/// let summary = session.run().unwrap();
/// assert_eq!(summary.draws, 5);
/// ```
pub struct Session<'a> {
    config: SessionConfig,
    table: Table<'a>,
    observers: Vec<Box<dyn Observer + 'a>>,
}

impl<'a> Session<'a> {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `config` does not validate.
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            table: Table::from_config(&config),
            config,
            observers: Vec::new(),
        })
    }

    pub fn add_player(&mut self, agent: &'a mut dyn Agent) -> Result<()> {
        self.table.add_player(agent)
    }

    pub fn with_observer(mut self, observer: Box<dyn Observer + 'a>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn add_observer(&mut self, observer: Box<dyn Observer + 'a>) {
        self.observers.push(observer);
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Play every game of the session.
    ///
    /// With a configured seed, the table and all agents are reseeded first so
    /// the whole run is reproducible.
    pub fn run(&mut self) -> Result<SessionSummary> {
        if let Some(seed) = self.config.seed {
            self.table.seed_all(seed)?;
        }
        let names = self.table.player_names();
        let mut summary = SessionSummary::new(&names[..]);
        info!(
            "session: {} games between {}",
            self.config.games,
            names.join(" and ")
        );

        for observer in &mut self.observers {
            observer.on_session_start(self.config.games)?;
        }
        for game_num in 0..self.config.games {
            let record = self.table.play_observed(game_num, &mut self.observers)?;
            summary.record(&record);
        }
        for observer in &mut self.observers {
            observer.on_session_end()?;
        }

        info!(
            "session finished: {} games, {} draws",
            summary.games, summary.draws
        );
        Ok(summary)
    }
}
