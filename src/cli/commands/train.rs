//! Train command - test / train / test cycle for a learning agent

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde::Serialize;

use crate::{
    cli::{
        agents::{AgentKind, build_agent},
        commands::attach_observers,
        output::{format_share, print_kv, print_section, print_summary},
    },
    config::{FirstMove, LearnerConfig, SessionConfig},
    learning::LearningAgent,
    pipeline::{Session, SessionSummary},
    ports::Agent,
};

#[derive(Parser, Debug)]
#[command(about = "Train a learning agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Opponent for the test phases, and for training unless --self-play
    #[arg(long, short = 'o', value_enum, default_value = "naive")]
    pub opponent: AgentKind,

    /// Train by playing against itself
    #[arg(long)]
    pub self_play: bool,

    /// Number of training games
    #[arg(long, short = 'g', default_value_t = 1000)]
    pub games: usize,

    /// Number of games in each test phase
    #[arg(long, short = 't', default_value_t = 100)]
    pub test_games: usize,

    /// Name of the learning agent
    #[arg(long, default_value = "Franklin")]
    pub name: String,

    /// Learner configuration file (JSON); flags given here override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Exploration probability while training
    #[arg(long)]
    pub exploration: Option<f64>,

    /// Gradient descent step size
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Hidden layer widths, comma separated
    #[arg(long, value_delimiter = ',')]
    pub hidden: Option<Vec<usize>>,

    /// Who opens each game: alternate, random, first (the learner) or second
    #[arg(long, default_value = "alternate")]
    pub first_move: FirstMove,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Export before/training/after summaries as JSON
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Save the effective learner configuration as JSON
    #[arg(long)]
    pub save_config: Option<PathBuf>,

    /// Hide progress bars
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Debug, Serialize)]
struct TrainingReport {
    learner: String,
    opponent: String,
    self_play: bool,
    config: LearnerConfig,
    before: SessionSummary,
    training: SessionSummary,
    after: SessionSummary,
}

impl TrainArgs {
    fn learner_config(&self) -> Result<LearnerConfig> {
        let mut config = match &self.config {
            Some(path) => LearnerConfig::from_json_file(path)
                .with_context(|| format!("loading learner config {}", path.display()))?,
            None => LearnerConfig::default(),
        };
        if let Some(exploration) = self.exploration {
            config = config.with_exploration(exploration);
        }
        if let Some(rate) = self.learning_rate {
            config.evaluator = config.evaluator.with_learning_rate(rate);
        }
        if let Some(hidden) = &self.hidden {
            config.evaluator = config.evaluator.with_hidden_layers(hidden.clone());
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config.validate()?;
        Ok(config)
    }

    fn session_config(&self, games: usize, phase: u64) -> SessionConfig {
        let config = SessionConfig::default()
            .with_games(games)
            .with_first_move(self.first_move);
        match self.seed {
            Some(seed) => config.with_seed(seed.wrapping_add(phase)),
            None => config,
        }
    }
}

/// Play one phase; `opponent` of `None` means self-play.
fn run_phase(
    learner: &mut LearningAgent,
    opponent: Option<&mut dyn Agent>,
    config: SessionConfig,
    progress: bool,
) -> Result<SessionSummary> {
    let mut session = Session::new(config)?;
    session.add_player(learner)?;
    if let Some(opponent) = opponent {
        session.add_player(opponent)?;
    }
    attach_observers(&mut session, progress);
    Ok(session.run()?)
}

fn report_phase(title: &str, learner: &str, summary: &SessionSummary) {
    print_section(title);
    print_summary(summary);
    print_kv(
        &format!("{learner} lost"),
        &format_share(summary.losses_for(learner), summary.games),
    );
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.learner_config()?;
    let mut learner = LearningAgent::new(args.name.clone(), config.clone())?;
    let opponent_name = args.opponent.default_name();
    let mut opponent = build_agent(
        args.opponent,
        opponent_name,
        args.seed.map(|s| s.wrapping_add(100)),
        &config,
    )?;
    let progress = !args.no_progress;

    learner.set_learning(false);
    let before = run_phase(
        &mut learner,
        Some(opponent.as_mut()),
        args.session_config(args.test_games, 0),
        progress,
    )?;
    report_phase(
        &format!("Before training: {} vs {opponent_name}", args.name),
        &args.name,
        &before,
    );

    learner.set_learning(true);
    let training_config = args.session_config(args.games, 1);
    let training = if args.self_play {
        run_phase(&mut learner, None, training_config, progress)?
    } else {
        run_phase(
            &mut learner,
            Some(opponent.as_mut()),
            training_config,
            progress,
        )?
    };
    info!(
        "{} trained on {} games",
        args.name,
        learner.games_trained()
    );
    let title = if args.self_play {
        format!("Training: {} self-play", args.name)
    } else {
        format!("Training: {} vs {opponent_name}", args.name)
    };
    print_section(&title);
    print_summary(&training);
    if let Some(loss) = learner.evaluator().cost_history().last() {
        print_kv("Final loss", &format!("{loss:.5}"));
    }

    learner.set_learning(false);
    let after = run_phase(
        &mut learner,
        Some(opponent.as_mut()),
        args.session_config(args.test_games, 2),
        progress,
    )?;
    report_phase(
        &format!("After training: {} vs {opponent_name}", args.name),
        &args.name,
        &after,
    );

    if let Some(path) = &args.save_config {
        config
            .save(path)
            .with_context(|| format!("writing learner config {}", path.display()))?;
        print_kv("Config", &path.display().to_string());
    }
    if let Some(path) = &args.summary {
        let report = TrainingReport {
            learner: args.name.clone(),
            opponent: opponent_name.to_string(),
            self_play: args.self_play,
            config,
            before,
            training,
            after,
        };
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating summary {}", path.display()))?;
        serde_json::to_writer_pretty(file, &report)
            .with_context(|| format!("writing summary {}", path.display()))?;
        print_kv("Summary", &path.display().to_string());
    }
    Ok(())
}
