//! Learning agent behaviour over whole games

use noughts::{
    agents::{NaiveAgent, RandomAgent},
    config::{EvaluatorConfig, LearnerConfig, SessionConfig},
    learning::{LearningAgent, Phase},
    pipeline::{Session, Table},
    tictactoe::{D4Transform, expand_symmetries},
};

fn learner(seed: u64) -> LearningAgent {
    let config = LearnerConfig::default()
        .with_evaluator(EvaluatorConfig::default().with_hidden_layers(vec![18]))
        .with_seed(seed);
    LearningAgent::new("Franklin", config).unwrap()
}

#[test]
fn test_trains_once_per_game() {
    let mut agent = learner(1);
    let mut random = RandomAgent::new("Colin");
    let mut session = Session::new(SessionConfig::default().with_games(25).with_seed(4)).unwrap();
    session.add_player(&mut agent).unwrap();
    session.add_player(&mut random).unwrap();
    session.run().unwrap();
    drop(session);

    assert_eq!(agent.games_trained(), 25);
    assert_eq!(agent.evaluator().cost_history().len(), 25);
    assert_eq!(agent.phase(), Phase::Idle);
    assert!(agent.episode().is_empty());
}

#[test]
fn test_self_play_trains_once_per_game() {
    let mut agent = learner(2);
    let mut table = Table::new();
    table.add_player(&mut agent).unwrap();
    for _ in 0..10 {
        let record = table.play().unwrap();
        assert!(record.seats.is_self_play());
    }
    drop(table);
    assert_eq!(agent.games_trained(), 10);
}

#[test]
fn test_test_phase_leaves_evaluator_unchanged() {
    let mut agent = learner(3);
    agent.set_learning(false);
    let weights_before: Vec<_> = agent
        .evaluator()
        .layers()
        .iter()
        .map(|layer| layer.weights().clone())
        .collect();

    let mut naive = NaiveAgent::new("Hubert");
    let mut session = Session::new(SessionConfig::default().with_games(20).with_seed(5)).unwrap();
    session.add_player(&mut agent).unwrap();
    session.add_player(&mut naive).unwrap();
    session.run().unwrap();
    drop(session);

    assert_eq!(agent.games_trained(), 0);
    let weights_after: Vec<_> = agent
        .evaluator()
        .layers()
        .iter()
        .map(|layer| layer.weights().clone())
        .collect();
    assert_eq!(weights_before, weights_after);
}

#[test]
fn test_seeded_training_is_reproducible() {
    let run = || {
        let mut agent = learner(6);
        let mut random = RandomAgent::new("Colin");
        let mut session =
            Session::new(SessionConfig::default().with_games(15).with_seed(7)).unwrap();
        session.add_player(&mut agent).unwrap();
        session.add_player(&mut random).unwrap();
        let summary = session.run().unwrap();
        drop(session);
        (summary, agent.evaluator().cost_history().to_vec())
    };
    assert_eq!(run(), run());
}

#[test]
fn test_symmetry_expansion_is_idempotent() {
    let samples = vec![([1i8, 0, 0, 0, -1, 0, 0, 0, 0], 2usize), ([0; 9], 0)];
    let once = expand_symmetries(&samples);
    let twice = expand_symmetries(&once);
    assert_eq!(once, twice);
    // Corner stone against centre has four images; the empty grid only one
    assert_eq!(once.len(), 5);
    assert!(once.len() <= samples.len() * D4Transform::all().len());
}
