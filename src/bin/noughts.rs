//! Noughts and crosses CLI
//!
//! - Play against a computer agent at the terminal
//! - Run matches between any two agents
//! - Train a learning agent with before and after test phases

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "noughts")]
#[command(version, about = "Noughts and crosses agents, from random to self-taught", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against a computer agent
    Play(noughts::cli::commands::play::PlayArgs),

    /// Run a series of games between two agents
    Match(noughts::cli::commands::matchup::MatchArgs),

    /// Train a learning agent and test it before and after
    Train(Box<noughts::cli::commands::train::TrainArgs>),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => noughts::cli::commands::play::execute(args),
        Commands::Match(args) => noughts::cli::commands::matchup::execute(args),
        Commands::Train(args) => noughts::cli::commands::train::execute(*args),
    }
}
