//! Observer implementations for sessions
//!
//! Observers collect data while games are played without coupling the table
//! to any particular output.

use std::collections::{BTreeMap, VecDeque};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::Observer,
    tictactoe::{BoardState, GameOutcome, GameRecord, Player},
};

/// Progress bar observer - shows session progress and the running score
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    wins: BTreeMap<String, usize>,
    draws: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            wins: BTreeMap::new(),
            draws: 0,
        }
    }

    fn message(&self) -> String {
        let mut parts: Vec<String> = self
            .wins
            .iter()
            .map(|(name, wins)| format!("{name}:{wins}"))
            .collect();
        parts.push(format!("draws:{}", self.draws));
        parts.join(" ")
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_session_start(&mut self, total_games: usize) -> Result<()> {
        let pb = ProgressBar::new(total_games as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games {msg}")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_game_end(&mut self, game_num: usize, record: &GameRecord) -> Result<()> {
        match record.winner_name() {
            Some(name) => *self.wins.entry(name.to_string()).or_default() += 1,
            None => self.draws += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(game_num as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_session_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - tallies results by side and tracks a recent window
pub struct MetricsObserver {
    x_wins: usize,
    o_wins: usize,
    draws: usize,
    total_games: usize,
    move_counts: Vec<usize>,
    recent: VecDeque<Option<GameOutcome>>,
    window: usize,
}

impl MetricsObserver {
    /// Window of the last 100 games for recent rates
    pub fn new() -> Self {
        Self::with_window(100)
    }

    pub fn with_window(window: usize) -> Self {
        Self {
            x_wins: 0,
            o_wins: 0,
            draws: 0,
            total_games: 0,
            move_counts: Vec::new(),
            recent: VecDeque::with_capacity(window),
            window: window.max(1),
        }
    }

    pub fn total_games(&self) -> usize {
        self.total_games
    }

    /// Share of games won by the opening side
    pub fn x_win_rate(&self) -> f64 {
        ratio(self.x_wins, self.total_games)
    }

    pub fn o_win_rate(&self) -> f64 {
        ratio(self.o_wins, self.total_games)
    }

    pub fn draw_rate(&self) -> f64 {
        ratio(self.draws, self.total_games)
    }

    /// Draw rate over the most recent window of games
    pub fn recent_draw_rate(&self) -> f64 {
        let draws = self
            .recent
            .iter()
            .filter(|outcome| matches!(outcome, Some(GameOutcome::Draw)))
            .count();
        ratio(draws, self.recent.len())
    }

    pub fn avg_game_length(&self) -> f64 {
        if self.move_counts.is_empty() {
            0.0
        } else {
            self.move_counts.iter().sum::<usize>() as f64 / self.move_counts.len() as f64
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_games: self.total_games,
            x_wins: self.x_wins,
            o_wins: self.o_wins,
            draws: self.draws,
            x_win_rate: self.x_win_rate(),
            o_win_rate: self.o_win_rate(),
            draw_rate: self.draw_rate(),
            recent_draw_rate: self.recent_draw_rate(),
            avg_game_length: self.avg_game_length(),
        }
    }
}

fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of [`MetricsObserver`] tallies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_games: usize,
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
    pub x_win_rate: f64,
    pub o_win_rate: f64,
    pub draw_rate: f64,
    pub recent_draw_rate: f64,
    pub avg_game_length: f64,
}

impl Observer for MetricsObserver {
    fn on_game_start(&mut self, _game_num: usize) -> Result<()> {
        self.move_counts.push(0);
        Ok(())
    }

    fn on_move(
        &mut self,
        _game_num: usize,
        _player_name: &str,
        _before: &BoardState,
        _position: usize,
    ) -> Result<()> {
        if let Some(last) = self.move_counts.last_mut() {
            *last += 1;
        }
        Ok(())
    }

    fn on_game_end(&mut self, _game_num: usize, record: &GameRecord) -> Result<()> {
        self.total_games += 1;
        match record.outcome {
            Some(GameOutcome::Win(Player::X)) => self.x_wins += 1,
            Some(GameOutcome::Win(Player::O)) => self.o_wins += 1,
            Some(GameOutcome::Draw) => self.draws += 1,
            None => {}
        }
        if self.recent.len() == self.window {
            self.recent.pop_front();
        }
        self.recent.push_back(record.outcome);
        Ok(())
    }
}

/// Log observer - reports the session through the `log` facade
#[derive(Debug, Default)]
pub struct LogObserver {
    total_games: usize,
}

impl LogObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Observer for LogObserver {
    fn on_session_start(&mut self, total_games: usize) -> Result<()> {
        self.total_games = total_games;
        info!("starting {total_games} games");
        Ok(())
    }

    fn on_move(
        &mut self,
        game_num: usize,
        player_name: &str,
        before: &BoardState,
        position: usize,
    ) -> Result<()> {
        trace!(
            "game {game_num}: {player_name} plays {position} on {}",
            before.to_string().replace('\n', "/")
        );
        Ok(())
    }

    fn on_game_end(&mut self, game_num: usize, record: &GameRecord) -> Result<()> {
        let result = match record.winner_name() {
            Some(name) => format!("{name} wins"),
            None => "draw".to_string(),
        };
        debug!(
            "game {}/{}: {} vs {}, {result} after {} moves",
            game_num + 1,
            self.total_games,
            record.seats.x,
            record.seats.o,
            record.moves.len()
        );
        Ok(())
    }

    fn on_session_end(&mut self) -> Result<()> {
        info!("finished {} games", self.total_games);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::Seats;

    fn record(positions: &[usize]) -> GameRecord {
        let mut board = BoardState::new();
        let mut record = GameRecord::new(Player::X, Seats::new("a", "b"));
        for &pos in positions {
            let player = board.to_move().unwrap();
            let status = board.play(pos).unwrap();
            record.push(pos, player, status);
        }
        record
    }

    fn feed(observer: &mut dyn Observer, game_num: usize, record: &GameRecord) {
        observer.on_game_start(game_num).unwrap();
        let mut board = BoardState::new();
        for mv in &record.moves {
            observer.on_move(game_num, "p", &board, mv.position).unwrap();
            board.play(mv.position).unwrap();
        }
        observer.on_game_end(game_num, record).unwrap();
    }

    #[test]
    fn test_metrics_by_side() {
        let mut metrics = MetricsObserver::with_window(2);
        feed(&mut metrics, 0, &record(&[0, 3, 1, 4, 2]));
        feed(&mut metrics, 1, &record(&[0, 4, 8, 1, 7, 6, 2, 5, 3]));
        feed(&mut metrics, 2, &record(&[0, 4, 8, 1, 7, 6, 2, 5, 3]));

        let summary = metrics.summary();
        assert_eq!(summary.total_games, 3);
        assert_eq!(summary.x_wins, 1);
        assert_eq!(summary.draws, 2);
        assert_eq!(summary.recent_draw_rate, 1.0);
        assert!((summary.avg_game_length - 23.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_progress_observer_without_terminal() {
        let mut progress = ProgressObserver::new();
        progress.on_session_start(1).unwrap();
        progress.on_game_end(0, &record(&[0, 3, 1, 4, 2])).unwrap();
        assert_eq!(progress.message(), "a:1 draws:0");
        progress.on_session_end().unwrap();
    }
}
