//! Dense layer storage

use ndarray::{Array1, Array2};
use rand::Rng;
use rand_distr::StandardNormal;

/// Fully connected layer: `output = input · weights + bias`.
///
/// Weights are stored fan-in × fan-out so a batch with one sample per row
/// multiplies from the left.
#[derive(Debug)]
pub struct Layer {
    pub(crate) weights: Array2<f64>,
    pub(crate) bias: Array1<f64>,
}

impl Layer {
    /// Gaussian weights scaled by `1/sqrt(fan_in)`, zero bias
    pub fn new<R: Rng + ?Sized>(fan_in: usize, fan_out: usize, rng: &mut R) -> Self {
        let scale = (fan_in as f64).sqrt();
        let weights = Array2::from_shape_simple_fn((fan_in, fan_out), || {
            let z: f64 = rng.sample(StandardNormal);
            z / scale
        });
        Self {
            weights,
            bias: Array1::zeros(fan_out),
        }
    }

    pub fn fan_in(&self) -> usize {
        self.weights.nrows()
    }

    pub fn fan_out(&self) -> usize {
        self.weights.ncols()
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    pub fn bias(&self) -> &Array1<f64> {
        &self.bias
    }

    /// Affine map of a batch, before any activation
    pub fn forward(&self, input: &Array2<f64>) -> Array2<f64> {
        input.dot(&self.weights) + &self.bias
    }

    /// Squared Frobenius norm of the weights
    pub(crate) fn weight_norm_sq(&self) -> f64 {
        self.weights.iter().map(|w| w * w).sum()
    }
}
