//! Match command - a series of games between two agents

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::{
        agents::{AgentKind, build_agent, seat_names},
        commands::attach_observers,
        output::{print_kv, print_section, print_summary},
    },
    config::{FirstMove, LearnerConfig, SessionConfig},
    pipeline::Session,
};

#[derive(Parser, Debug)]
#[command(about = "Play a series of games between two agents")]
pub struct MatchArgs {
    /// First seat
    #[arg(value_enum)]
    pub first: AgentKind,

    /// Second seat; omit to let the first agent play itself
    #[arg(value_enum)]
    pub second: Option<AgentKind>,

    /// Number of games
    #[arg(long, short = 'g', default_value_t = 100)]
    pub games: usize,

    /// Who opens each game: alternate, random, first or second
    #[arg(long, default_value = "alternate")]
    pub first_move: FirstMove,

    /// Session configuration file (JSON); flags given here override it
    #[arg(long)]
    pub session: Option<PathBuf>,

    /// Learner configuration file (JSON) for learning agents
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Export the session summary as JSON
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

pub fn execute(args: MatchArgs) -> Result<()> {
    let learner = match &args.config {
        Some(path) => LearnerConfig::from_json_file(path)
            .with_context(|| format!("loading learner config {}", path.display()))?,
        None => LearnerConfig::default(),
    };
    let mut config = match &args.session {
        Some(path) => SessionConfig::from_json_file(path)
            .with_context(|| format!("loading session config {}", path.display()))?,
        None => SessionConfig::default(),
    }
    .with_games(args.games)
    .with_first_move(args.first_move);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let (mut first, mut second, title) = match args.second {
        Some(kind) => {
            let (a, b) = seat_names((args.first, None), (kind, None));
            let first = build_agent(args.first, &a, args.seed, &learner)?;
            let second = build_agent(kind, &b, args.seed.map(|s| s.wrapping_add(1)), &learner)?;
            (first, Some(second), format!("{a} vs {b}"))
        }
        None => {
            let name = args.first.default_name();
            let first = build_agent(args.first, name, args.seed, &learner)?;
            (first, None, format!("{name} self-play"))
        }
    };

    let mut session = Session::new(config)?;
    session.add_player(first.as_mut())?;
    if let Some(second) = second.as_mut() {
        session.add_player(second.as_mut())?;
    }
    attach_observers(&mut session, !args.no_progress);
    let summary = session.run()?;

    print_section(&title);
    print_summary(&summary);
    if let Some(path) = &args.summary {
        summary
            .save(path)
            .with_context(|| format!("writing summary {}", path.display()))?;
        print_kv("Summary", &path.display().to_string());
    }
    Ok(())
}
