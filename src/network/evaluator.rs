//! Feed-forward outcome evaluator with online gradient descent
//!
//! Maps a batch of encoded boards to log-probabilities over three outcomes
//! (draw, side-A win, side-B win). Hidden layers use ReLU, the head is a
//! log-softmax, and training minimises mean negative log-likelihood plus an
//! L2 penalty on the weights.

use log::debug;
use ndarray::{Array2, Axis};
use rand::{SeedableRng, rngs::StdRng};

use super::layer::Layer;
use crate::{
    Error, Result,
    config::{EvaluatorConfig, OUTCOME_CLASSES},
};

/// Multi-layer perceptron scoring board positions.
///
/// Not `Clone`: one agent owns one evaluator for its whole life.
///
/// # Examples
///
/// ```
/// use ndarray::Array2;
/// use noughts::{config::EvaluatorConfig, network::FeedForwardEvaluator};
///
/// let mut net = FeedForwardEvaluator::new(EvaluatorConfig::default().with_seed(1)).unwrap();
/// let batch = Array2::zeros((2, 9));
/// let log_probs = net.predict(&batch).unwrap();
/// assert_eq!(log_probs.dim(), (2, 3));
///
/// let loss = net.update(&batch, &[0, 1]).unwrap();
/// assert!(loss.is_finite());
/// ```
#[derive(Debug)]
pub struct FeedForwardEvaluator {
    layers: Vec<Layer>,
    config: EvaluatorConfig,
    cost_history: Vec<f64>,
}

/// Cached values from one forward pass
struct ForwardPass {
    /// Input to each layer; `activations[0]` is the batch itself
    activations: Vec<Array2<f64>>,
    /// Affine output of each layer before ReLU
    pre_activations: Vec<Array2<f64>>,
}

impl FeedForwardEvaluator {
    /// Build a freshly initialised network.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the config does not validate.
    pub fn new(config: EvaluatorConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let layers = config
            .layer_sizes()
            .windows(2)
            .map(|pair| Layer::new(pair[0], pair[1], &mut rng))
            .collect();
        Ok(Self {
            layers,
            config,
            cost_history: Vec::new(),
        })
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Widths from input to output
    pub fn layer_sizes(&self) -> Vec<usize> {
        self.config.layer_sizes()
    }

    pub fn input_width(&self) -> usize {
        self.layers.first().map_or(0, Layer::fan_in)
    }

    /// Loss after every call to [`update`](Self::update), oldest first
    pub fn cost_history(&self) -> &[f64] {
        &self.cost_history
    }

    /// Per-row log-probabilities of each outcome.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyBatch`] for zero rows, [`Error::ShapeMismatch`] when the
    /// column count differs from the input width.
    pub fn predict(&self, batch: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_batch(batch)?;
        let mut pass = self.forward(batch);
        let logits = pass.pre_activations.pop().ok_or(Error::EmptyBatch)?;
        Ok(log_softmax(&logits))
    }

    /// One full-batch gradient step; returns the loss before the step.
    ///
    /// `labels[i]` is the outcome class of row `i`. Gradients of every layer
    /// are checked before any parameter changes, so a failed update leaves the
    /// network untouched.
    ///
    /// # Errors
    ///
    /// Batch shape errors as in [`predict`](Self::predict),
    /// [`Error::InvalidLabel`] for a wrong label count or a label outside
    /// `0..3`, [`Error::NonFiniteGradient`] if training has diverged.
    pub fn update(&mut self, batch: &Array2<f64>, labels: &[usize]) -> Result<f64> {
        self.check_batch(batch)?;
        let rows = batch.nrows();
        if labels.len() != rows {
            return Err(Error::InvalidLabel {
                message: format!("{} labels for {rows} rows", labels.len()),
            });
        }
        if let Some(bad) = labels.iter().find(|&&label| label >= OUTCOME_CLASSES) {
            return Err(Error::InvalidLabel {
                message: format!("label {bad} is not below {OUTCOME_CLASSES}"),
            });
        }

        let pass = self.forward(batch);
        let logits = pass.pre_activations.last().ok_or(Error::EmptyBatch)?;
        let log_probs = log_softmax(logits);
        let n = rows as f64;
        let lambda = self.config.regularizer;

        let nll = -labels
            .iter()
            .enumerate()
            .map(|(row, &label)| log_probs[[row, label]])
            .sum::<f64>()
            / n;
        let penalty = 0.5 * lambda * self.layers.iter().map(Layer::weight_norm_sq).sum::<f64>();
        let loss = nll + penalty;

        // d(nll)/d(logits) per row: softmax minus one-hot
        let mut delta = log_probs.mapv(f64::exp);
        for (row, &label) in labels.iter().enumerate() {
            delta[[row, label]] -= 1.0;
        }

        let mut gradients = Vec::with_capacity(self.layers.len());
        for idx in (0..self.layers.len()).rev() {
            let layer = &self.layers[idx];
            let weight_grad = pass.activations[idx].t().dot(&delta) / n + &layer.weights * lambda;
            let bias_grad = delta.mean_axis(Axis(0)).ok_or(Error::EmptyBatch)?;

            if !weight_grad.iter().chain(bias_grad.iter()).all(|g| g.is_finite()) {
                return Err(Error::NonFiniteGradient { layer: idx });
            }

            if idx > 0 {
                let mask = pass.pre_activations[idx - 1].mapv(|z| if z > 0.0 { 1.0 } else { 0.0 });
                delta = delta.dot(&layer.weights.t()) * &mask;
            }
            gradients.push((weight_grad, bias_grad));
        }

        let rate = self.config.learning_rate;
        for (layer, (weight_grad, bias_grad)) in self.layers.iter_mut().rev().zip(gradients) {
            layer.weights.scaled_add(-rate, &weight_grad);
            layer.bias.scaled_add(-rate, &bias_grad);
        }

        debug!("evaluator update: {rows} rows, loss {loss:.5}");
        self.cost_history.push(loss);
        Ok(loss)
    }

    fn check_batch(&self, batch: &Array2<f64>) -> Result<()> {
        if batch.nrows() == 0 {
            return Err(Error::EmptyBatch);
        }
        let expected = self.input_width();
        if batch.ncols() != expected {
            return Err(Error::ShapeMismatch {
                expected,
                got: batch.ncols(),
            });
        }
        Ok(())
    }

    fn forward(&self, batch: &Array2<f64>) -> ForwardPass {
        let mut activations = Vec::with_capacity(self.layers.len());
        let mut pre_activations = Vec::with_capacity(self.layers.len());
        let mut input = batch.to_owned();
        let last = self.layers.len().saturating_sub(1);

        for (idx, layer) in self.layers.iter().enumerate() {
            let z = layer.forward(&input);
            let next = if idx == last {
                z.clone()
            } else {
                z.mapv(|v| v.max(0.0))
            };
            activations.push(input);
            pre_activations.push(z);
            input = next;
        }

        ForwardPass {
            activations,
            pre_activations,
        }
    }
}

/// Row-wise log-softmax, shifted by the row maximum
pub fn log_softmax(logits: &Array2<f64>) -> Array2<f64> {
    let max = logits.map_axis(Axis(1), |row| {
        row.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v))
    });
    let shifted = logits - &max.insert_axis(Axis(1));
    let log_sum = shifted
        .mapv(f64::exp)
        .sum_axis(Axis(1))
        .mapv(f64::ln)
        .insert_axis(Axis(1));
    shifted - &log_sum
}
