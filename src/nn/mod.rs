//! Trainable sequence predictors.
//!
//! The swarm search and the final forecaster only rely on the
//! [`SequenceModel`] capability: train on windowed pairs, predict a value
//! per window, nothing else. Any underlying architecture can be swapped in
//! behind it without touching the optimizer or forecaster logic.

use crate::error::{ForecastError, Result};
use rand::prelude::*;
use rand::SeedableRng;

/// Capability interface for a trainable sequence predictor.
pub trait SequenceModel {
    /// Train on windowed (input, next-value) pairs for a number of epochs.
    fn fit(&mut self, inputs: &[Vec<f64>], targets: &[f64], epochs: usize) -> Result<()>;

    /// Predict one value per input window.
    fn predict(&self, inputs: &[Vec<f64>]) -> Result<Vec<f64>>;
}

/// A single-hidden-layer network over a fixed input window.
///
/// `units` tanh neurons feed a linear scalar output; training is plain
/// stochastic gradient descent on squared error. Inputs are expected on
/// the [0, 1] scale produced by
/// [`MinMaxScaler`](crate::transform::MinMaxScaler).
#[derive(Debug, Clone)]
pub struct DenseSequenceNet {
    n_steps: usize,
    units: usize,
    /// Hidden weights, `units` rows of `n_steps` columns.
    w_hidden: Vec<Vec<f64>>,
    b_hidden: Vec<f64>,
    w_out: Vec<f64>,
    b_out: f64,
    learning_rate: f64,
}

impl DenseSequenceNet {
    /// Create a network for the given window length and hidden size.
    ///
    /// Weights are initialized uniformly in `[-1/sqrt(fan_in), 1/sqrt(fan_in)]`
    /// from a seedable source so candidate evaluations are reproducible.
    pub fn new(n_steps: usize, units: usize, seed: Option<u64>) -> Result<Self> {
        if n_steps == 0 {
            return Err(ForecastError::InvalidParameter(
                "window length must be positive".to_string(),
            ));
        }
        if units == 0 {
            return Err(ForecastError::InvalidParameter(
                "hidden unit count must be positive".to_string(),
            ));
        }

        let mut rng: StdRng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let hidden_limit = 1.0 / (n_steps as f64).sqrt();
        let w_hidden = (0..units)
            .map(|_| {
                (0..n_steps)
                    .map(|_| rng.gen_range(-hidden_limit..hidden_limit))
                    .collect()
            })
            .collect();
        let out_limit = 1.0 / (units as f64).sqrt();
        let w_out = (0..units)
            .map(|_| rng.gen_range(-out_limit..out_limit))
            .collect();

        Ok(Self {
            n_steps,
            units,
            w_hidden,
            b_hidden: vec![0.0; units],
            w_out,
            b_out: 0.0,
            learning_rate: 0.05,
        })
    }

    /// Window length this network was built for.
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Hidden unit count.
    pub fn units(&self) -> usize {
        self.units
    }

    fn check_inputs(&self, inputs: &[Vec<f64>]) -> Result<()> {
        for window in inputs {
            if window.len() != self.n_steps {
                return Err(ForecastError::DimensionMismatch {
                    expected: self.n_steps,
                    got: window.len(),
                });
            }
        }
        Ok(())
    }

    fn forward(&self, window: &[f64]) -> (Vec<f64>, f64) {
        let mut hidden = Vec::with_capacity(self.units);
        for (weights, bias) in self.w_hidden.iter().zip(&self.b_hidden) {
            let pre: f64 = weights.iter().zip(window).map(|(w, x)| w * x).sum::<f64>() + bias;
            hidden.push(pre.tanh());
        }
        let output = self
            .w_out
            .iter()
            .zip(&hidden)
            .map(|(w, h)| w * h)
            .sum::<f64>()
            + self.b_out;
        (hidden, output)
    }
}

impl SequenceModel for DenseSequenceNet {
    fn fit(&mut self, inputs: &[Vec<f64>], targets: &[f64], epochs: usize) -> Result<()> {
        if inputs.is_empty() {
            return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
        }
        if inputs.len() != targets.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: inputs.len(),
                got: targets.len(),
            });
        }
        self.check_inputs(inputs)?;

        let lr = self.learning_rate;
        for _ in 0..epochs {
            for (window, &target) in inputs.iter().zip(targets) {
                let (hidden, output) = self.forward(window);
                let error = output - target;
                if !error.is_finite() {
                    return Err(ForecastError::ComputationError(
                        "training diverged to non-finite loss".to_string(),
                    ));
                }

                // Output layer.
                for (w, h) in self.w_out.iter_mut().zip(&hidden) {
                    *w -= lr * error * h;
                }
                self.b_out -= lr * error;

                // Hidden layer, through the tanh derivative.
                for j in 0..self.units {
                    let grad = error * self.w_out[j] * (1.0 - hidden[j] * hidden[j]);
                    for (w, x) in self.w_hidden[j].iter_mut().zip(window) {
                        *w -= lr * grad * x;
                    }
                    self.b_hidden[j] -= lr * grad;
                }
            }
        }
        Ok(())
    }

    fn predict(&self, inputs: &[Vec<f64>]) -> Result<Vec<f64>> {
        self.check_inputs(inputs)?;
        Ok(inputs.iter().map(|w| self.forward(w).1).collect())
    }
}
