//! Building agents from command-line choices

use std::io::{self, BufReader, Stdin, Stdout};

use anyhow::Result;
use clap::ValueEnum;

use crate::{
    agents::{HumanAgent, NaiveAgent, RandomAgent},
    config::LearnerConfig,
    expert::ExpertAgent,
    learning::LearningAgent,
    ports::Agent,
};

/// Human player on the process's terminal
pub type TerminalHuman = HumanAgent<BufReader<Stdin>, Stdout>;

/// Kinds of player the CLI can seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AgentKind {
    /// Uniformly random moves
    Random,
    /// Wins or blocks when it can, otherwise random
    Naive,
    /// Rule-based player that never loses
    Expert,
    /// Neural evaluator trained by playing
    Learning,
    /// Moves typed on the terminal
    Human,
}

impl AgentKind {
    /// Name used when the user does not pick one
    pub fn default_name(self) -> &'static str {
        match self {
            AgentKind::Random => "Colin",
            AgentKind::Naive => "Hubert",
            AgentKind::Expert => "Horatio",
            AgentKind::Learning => "Franklin",
            AgentKind::Human => "Human",
        }
    }
}

/// Build a boxed agent of `kind`.
///
/// `seed` fixes the agent's random source; `learner` configures learning
/// agents and is ignored for the other kinds.
pub fn build_agent(
    kind: AgentKind,
    name: &str,
    seed: Option<u64>,
    learner: &LearnerConfig,
) -> Result<Box<dyn Agent>> {
    let agent: Box<dyn Agent> = match kind {
        AgentKind::Random => Box::new(match seed {
            Some(seed) => RandomAgent::with_seed(name, seed),
            None => RandomAgent::new(name),
        }),
        AgentKind::Naive => Box::new(match seed {
            Some(seed) => NaiveAgent::with_seed(name, seed),
            None => NaiveAgent::new(name),
        }),
        AgentKind::Expert => Box::new(match seed {
            Some(seed) => ExpertAgent::with_seed(name, seed),
            None => ExpertAgent::new(name),
        }),
        AgentKind::Learning => {
            let config = match seed {
                Some(seed) => learner.clone().with_seed(seed),
                None => learner.clone(),
            };
            Box::new(LearningAgent::new(name, config)?)
        }
        AgentKind::Human => Box::new(terminal_human(name)),
    };
    Ok(agent)
}

/// Human reading moves from stdin.
///
/// Two of these can share the terminal: the one-byte reader leaves unread
/// input in stdin's own buffer instead of stranding it in a private one.
pub fn terminal_human(name: &str) -> TerminalHuman {
    HumanAgent::new(name, BufReader::with_capacity(1, io::stdin()), io::stdout())
}

/// Names for two seats, kept distinct when both default to the same one
pub fn seat_names(first: (AgentKind, Option<&str>), second: (AgentKind, Option<&str>)) -> (String, String) {
    let a = first.1.unwrap_or(first.0.default_name()).to_string();
    let mut b = second.1.unwrap_or(second.0.default_name()).to_string();
    if a == b {
        b.push_str(" II");
    }
    (a, b)
}
