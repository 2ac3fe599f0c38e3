//! Evaluator output properties over random batches

use ndarray::Array2;
use noughts::{
    Error,
    config::EvaluatorConfig,
    learning::encoding::{DRAW, VIEWER_LOSS, VIEWER_WIN, to_batch},
    network::FeedForwardEvaluator,
};
use proptest::prelude::*;

fn evaluator(seed: u64) -> FeedForwardEvaluator {
    FeedForwardEvaluator::new(
        EvaluatorConfig::default()
            .with_hidden_layers(vec![12, 8])
            .with_seed(seed),
    )
    .unwrap()
}

fn grid() -> impl Strategy<Value = [i8; 9]> {
    prop::array::uniform9(-1i8..=1)
}

proptest! {
    #[test]
    fn predictions_are_distributions(
        rows in prop::collection::vec(grid(), 1..20),
        seed in 0u64..1000,
    ) {
        let batch = to_batch(&rows).unwrap();
        let log_probs = evaluator(seed).predict(&batch).unwrap();
        prop_assert_eq!(log_probs.dim(), (rows.len(), 3));
        for row in log_probs.rows() {
            prop_assert!(row.iter().all(|&lp| lp <= 1e-12));
            let total: f64 = row.iter().map(|lp| lp.exp()).sum();
            prop_assert!((total - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn updates_keep_weights_finite(
        rows in prop::collection::vec(grid(), 1..10),
        label in prop::sample::select(vec![DRAW, VIEWER_WIN, VIEWER_LOSS]),
    ) {
        let mut evaluator = evaluator(5);
        let batch = to_batch(&rows).unwrap();
        let labels = vec![label; rows.len()];
        let loss = evaluator.update(&batch, &labels).unwrap();
        prop_assert!(loss.is_finite() && loss >= 0.0);
        for layer in evaluator.layers() {
            prop_assert!(layer.weights().iter().all(|w| w.is_finite()));
            prop_assert!(layer.bias().iter().all(|b| b.is_finite()));
        }
    }
}

#[test]
fn test_training_shifts_prediction_towards_label() {
    let mut evaluator = evaluator(9);
    let rows = [[1, 1, 0, -1, -1, 0, 0, 0, 0]];
    let batch = to_batch(&rows).unwrap();
    let before = evaluator.predict(&batch).unwrap()[[0, VIEWER_WIN]];
    for _ in 0..100 {
        evaluator.update(&batch, &[VIEWER_WIN]).unwrap();
    }
    let after = evaluator.predict(&batch).unwrap()[[0, VIEWER_WIN]];
    assert!(after > before);
    assert_eq!(evaluator.cost_history().len(), 100);
}

#[test]
fn test_wrong_width_is_rejected() {
    let evaluator = evaluator(1);
    let batch = Array2::<f64>::zeros((2, 4));
    assert!(matches!(
        evaluator.predict(&batch),
        Err(Error::ShapeMismatch { expected: 9, got: 4 })
    ));
}
