//! Small dense neural network used to score positions

pub mod evaluator;
pub mod layer;

pub use evaluator::{FeedForwardEvaluator, log_softmax};
pub use layer::Layer;
