//! Swarm-tuned sequence forecasting runner.

use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::forecaster::{ComparisonFrame, SalesForecast};
use crate::metrics::{self, mse};
use crate::nn::{DenseSequenceNet, SequenceModel};
use crate::swarm::{SwarmConfig, SwarmOptimizer};
use crate::transform::{sliding_windows, MinMaxScaler};

/// Configuration for the sequence forecasting run.
#[derive(Debug, Clone)]
pub struct SequenceConfig {
    /// Search range for the hidden unit count.
    pub units_bounds: (f64, f64),
    /// Search range for the input window length.
    pub window_bounds: (f64, f64),
    /// Swarm used for the hyperparameter search.
    pub swarm: SwarmConfig,
    /// Training epochs per candidate evaluation.
    pub search_epochs: usize,
    /// Training epochs for the final model.
    pub final_epochs: usize,
    /// Seed for network weight initialization (None for random).
    pub seed: Option<u64>,
}

impl SequenceConfig {
    /// Seed both the swarm and the network initialization.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self.swarm = self.swarm.with_seed(seed);
        self
    }
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            units_bounds: (20.0, 100.0),
            window_bounds: (5.0, 30.0),
            swarm: SwarmConfig::default(),
            search_epochs: 5,
            final_epochs: 20,
            seed: None,
        }
    }
}

/// Sequence-model forecaster with swarm-searched hyperparameters.
///
/// The swarm explores (hidden units, window length) over a continuous
/// box; each candidate trains a fresh briefly-trained network on the
/// min-max-scaled series and reports its in-sample MSE as fitness. The
/// winning configuration is retrained longer and evaluated.
///
/// Evaluation is in-sample: predictions cover the same windows the
/// network trained on, so the reported metrics are optimistic relative
/// to the seasonal runner's holdout evaluation. Callers comparing the
/// two runners should weigh that asymmetry.
#[derive(Debug, Clone, Default)]
pub struct SequenceForecaster {
    config: SequenceConfig,
}

impl SequenceForecaster {
    /// Create a runner with the default search budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner with a custom configuration.
    pub fn with_config(config: SequenceConfig) -> Self {
        Self { config }
    }

    /// Run the search-train-evaluate cycle.
    pub fn run(&self, series: &TimeSeries) -> Result<SalesForecast> {
        // The shortest admissible window must still leave at least one
        // training pair.
        let min_window = self.config.window_bounds.0.trunc() as usize;
        let needed = min_window + 2;
        if series.len() < needed {
            return Err(ForecastError::InsufficientData {
                needed,
                got: series.len(),
            });
        }

        let (units, n_steps) = self.search(series.values())?;
        self.train_and_evaluate(series, units, n_steps)
    }

    /// Swarm search over (units, window length).
    fn search(&self, values: &[f64]) -> Result<(usize, usize)> {
        let (_, scaled) = MinMaxScaler::fit_transform(values)?;
        let bounds = [self.config.units_bounds, self.config.window_bounds];

        let optimizer = SwarmOptimizer::new(self.config.swarm.clone());
        let result = optimizer.optimize(&bounds, |position| {
            let units = position[0].trunc() as usize;
            let n_steps = position[1].trunc() as usize;
            match candidate_fitness(&scaled, units, n_steps, self.config.search_epochs, self.config.seed)
            {
                Ok(score) if score.is_finite() => score,
                _ => f64::INFINITY,
            }
        })?;

        Ok((
            result.best_position[0].trunc() as usize,
            result.best_position[1].trunc() as usize,
        ))
    }

    /// Retrain the winning configuration and build the report.
    ///
    /// Failures in this stage are fatal and carry the chosen parameters,
    /// unlike search-stage failures which are absorbed by the fitness.
    fn train_and_evaluate(
        &self,
        series: &TimeSeries,
        units: usize,
        n_steps: usize,
    ) -> Result<SalesForecast> {
        let stage_error = |detail: String| ForecastError::ModelFit {
            stage: "final training".to_string(),
            detail: format!("units={units} n_steps={n_steps}: {detail}"),
        };

        let (scaler, scaled) =
            MinMaxScaler::fit_transform(series.values()).map_err(|e| stage_error(e.to_string()))?;
        let data = sliding_windows(&scaled, n_steps);
        if data.is_empty() {
            return Err(stage_error(format!(
                "window produced no training pairs from {} observations",
                series.len()
            )));
        }

        let mut net = DenseSequenceNet::new(n_steps, units, self.config.seed)
            .map_err(|e| stage_error(e.to_string()))?;
        net.fit(&data.inputs, &data.targets, self.config.final_epochs)
            .map_err(|e| stage_error(e.to_string()))?;

        let scaled_predictions = net
            .predict(&data.inputs)
            .map_err(|e| stage_error(e.to_string()))?;
        let predicted = scaler.inverse_transform(&scaled_predictions);

        let actual = &series.values()[n_steps..];
        let metrics = metrics::evaluate_aligned(actual, &predicted)?;

        let comparison = ComparisonFrame {
            timestamps: series.timestamps()[n_steps..].to_vec(),
            actual: actual.to_vec(),
            predicted,
            lower: None,
            upper: None,
        };

        Ok(SalesForecast {
            model: format!("DenseSequenceNet(units={units}, window={n_steps})"),
            metrics,
            history: None,
            comparison,
        })
    }
}

/// Score one (units, window) candidate: train briefly, report in-sample
/// MSE on the scaled series.
fn candidate_fitness(
    scaled: &[f64],
    units: usize,
    n_steps: usize,
    epochs: usize,
    seed: Option<u64>,
) -> Result<f64> {
    let data = sliding_windows(scaled, n_steps);
    if data.is_empty() {
        return Err(ForecastError::InsufficientData {
            needed: n_steps + 1,
            got: scaled.len(),
        });
    }

    let mut net = DenseSequenceNet::new(n_steps, units, seed)?;
    net.fit(&data.inputs, &data.targets, epochs)?;
    let predictions = net.predict(&data.inputs)?;
    Ok(mse(&data.targets, &predictions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_monthly(values: &[f64]) -> TimeSeries {
        let timestamps: Vec<_> = (0..values.len())
            .map(|i| {
                Utc.with_ymd_and_hms(2021 + (i / 12) as i32, (i % 12) as u32 + 1, 1, 0, 0, 0)
                    .unwrap()
            })
            .collect();
        TimeSeries::new(timestamps, values.to_vec()).unwrap()
    }

    /// A small search budget that keeps tests fast.
    fn small_config() -> SequenceConfig {
        SequenceConfig {
            units_bounds: (4.0, 12.0),
            window_bounds: (2.0, 6.0),
            swarm: SwarmConfig::new(3, 2),
            search_epochs: 3,
            final_epochs: 10,
            seed: None,
        }
        .with_seed(42)
    }

    #[test]
    fn run_produces_an_aligned_comparison() {
        let values: Vec<f64> = (0..36).map(|i| 10.0 + ((i % 12) as f64) * 1.5).collect();
        let series = make_monthly(&values);

        let result = SequenceForecaster::with_config(small_config())
            .run(&series)
            .unwrap();

        // One prediction per training pair, aligned to target timestamps.
        let n = result.comparison.len();
        assert!(n < series.len() && n >= series.len() - 6);
        assert_eq!(
            result.comparison.timestamps,
            series.timestamps()[series.len() - n..]
        );
        assert_eq!(result.comparison.actual.len(), result.comparison.predicted.len());
        assert!(result.metrics.rmse.is_finite());
        assert!(result.comparison.lower.is_none());
        assert!(result.model.starts_with("DenseSequenceNet"));
    }

    #[test]
    fn same_seed_reproduces_the_report() {
        let values: Vec<f64> = (0..30).map(|i| ((i * 7) % 13) as f64).collect();
        let series = make_monthly(&values);

        let run = || {
            SequenceForecaster::with_config(small_config())
                .run(&series)
                .unwrap()
        };
        let a = run();
        let b = run();
        assert_eq!(a.model, b.model);
        assert_eq!(a.comparison.predicted, b.comparison.predicted);
    }

    #[test]
    fn too_short_series_is_rejected_up_front() {
        let series = make_monthly(&[1.0, 2.0, 3.0]);
        let result = SequenceForecaster::with_config(small_config()).run(&series);
        assert!(matches!(
            result,
            Err(ForecastError::InsufficientData { .. })
        ));
    }

    #[test]
    fn oversized_candidate_windows_are_absorbed_by_fitness() {
        // Window bound exceeding the series length: those candidates
        // score infinity but feasible ones keep the search alive.
        let values: Vec<f64> = (0..20).map(|i| (i as f64).sin()).collect();
        let series = make_monthly(&values);

        let config = SequenceConfig {
            units_bounds: (4.0, 8.0),
            window_bounds: (2.0, 40.0),
            swarm: SwarmConfig::new(4, 3),
            search_epochs: 2,
            final_epochs: 5,
            seed: None,
        }
        .with_seed(9);

        let result = SequenceForecaster::with_config(config).run(&series);
        // The search may or may not land on a feasible window; either a
        // report or a typed error is acceptable, never a panic.
        if let Ok(report) = result {
            assert!(report.metrics.rmse.is_finite());
        }
    }

    #[test]
    fn degenerate_fitness_candidate() {
        let scaled: Vec<f64> = vec![0.1, 0.5, 0.9];
        assert!(candidate_fitness(&scaled, 4, 10, 2, Some(1)).is_err());
        assert!(candidate_fitness(&scaled, 4, 0, 2, Some(1)).is_err());
    }
}
