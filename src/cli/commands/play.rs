//! Play command - a human at the terminal against a computer agent

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::{
        agents::{AgentKind, build_agent, terminal_human},
        output::{print_section, print_summary},
    },
    config::{FirstMove, LearnerConfig, SessionConfig},
    pipeline::{LogObserver, Session},
};

#[derive(Parser, Debug)]
#[command(about = "Play against a computer agent")]
pub struct PlayArgs {
    /// Agent to play against
    #[arg(long, short = 'o', value_enum, default_value = "expert")]
    pub opponent: AgentKind,

    /// Your name at the table
    #[arg(long, default_value = "Human")]
    pub name: String,

    /// Number of games
    #[arg(long, short = 'g', default_value_t = 1)]
    pub games: usize,

    /// Who opens each game: alternate, random, first (you) or second
    #[arg(long, default_value = "random")]
    pub first_move: FirstMove,

    /// Learner configuration file (JSON) for a learning opponent
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    if args.opponent == AgentKind::Human {
        anyhow::bail!("play seats you against a computer agent; use `match human human` for two people");
    }
    let learner = match &args.config {
        Some(path) => LearnerConfig::from_json_file(path)
            .with_context(|| format!("loading learner config {}", path.display()))?,
        None => LearnerConfig::default(),
    };

    let mut human = terminal_human(&args.name);
    let opponent_name = args.opponent.default_name();
    let mut opponent = build_agent(args.opponent, opponent_name, args.seed, &learner)?;

    let mut config = SessionConfig::default()
        .with_games(args.games)
        .with_first_move(args.first_move);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let mut session = Session::new(config)?;
    session.add_player(&mut human)?;
    session.add_player(opponent.as_mut())?;
    session.add_observer(Box::new(LogObserver::new()));
    let summary = session.run()?;

    print_section(&format!("{} vs {}", args.name, opponent_name));
    print_summary(&summary);
    Ok(())
}
