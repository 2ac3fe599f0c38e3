//! JSON files for configurations and session summaries

use noughts::{
    agents::RandomAgent,
    config::{EvaluatorConfig, FirstMove, LearnerConfig, SessionConfig},
    expert::ExpertAgent,
    pipeline::{Session, SessionSummary},
};
use tempfile::tempdir;

#[test]
fn test_summary_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("summary.json");

    let mut expert = ExpertAgent::new("Horatio");
    let mut random = RandomAgent::new("Colin");
    let mut session = Session::new(SessionConfig::default().with_games(10).with_seed(3)).unwrap();
    session.add_player(&mut expert).unwrap();
    session.add_player(&mut random).unwrap();
    let summary = session.run().unwrap();

    summary.save(&path).unwrap();
    assert_eq!(SessionSummary::load(&path).unwrap(), summary);
}

#[test]
fn test_learner_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("learner.json");
    let config = LearnerConfig::default()
        .with_evaluator(
            EvaluatorConfig::default()
                .with_hidden_layers(vec![20, 10])
                .with_learning_rate(0.02),
        )
        .with_exploration(0.3)
        .with_seed(17);

    config.save(&path).unwrap();
    assert_eq!(LearnerConfig::from_json_file(&path).unwrap(), config);
}

#[test]
fn test_partial_files_use_defaults() {
    let dir = tempdir().unwrap();
    let learner = dir.path().join("learner.json");
    std::fs::write(&learner, r#"{ "exploration": 0.25 }"#).unwrap();
    let config = LearnerConfig::from_json_file(&learner).unwrap();
    assert_eq!(config.exploration, 0.25);
    assert_eq!(config.evaluator, EvaluatorConfig::default());

    let session = dir.path().join("session.json");
    std::fs::write(&session, r#"{ "games": 7, "first_move": "random" }"#).unwrap();
    let config = SessionConfig::from_json_file(&session).unwrap();
    assert_eq!(config.games, 7);
    assert_eq!(config.first_move, FirstMove::Random);
    assert_eq!(config.max_invalid_moves, 10);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let result = LearnerConfig::from_json_file(dir.path().join("absent.json"));
    assert!(matches!(result, Err(noughts::Error::Io { .. })));
}
