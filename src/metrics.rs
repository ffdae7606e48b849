//! Accuracy metrics for forecast evaluation.
//!
//! Both forecasting paths report the same record: MAPE, RMSE and R².

use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use serde::Serialize;

/// Accuracy metrics shared by both forecasters.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastMetrics {
    /// Mean Absolute Percentage Error, in percent.
    ///
    /// `None` when any actual value is exactly zero: sales counts can
    /// legitimately be zero and the ratio is undefined there, so the
    /// degenerate case is surfaced as an absent value rather than an
    /// inf/NaN that silently poisons downstream aggregation.
    pub mape: Option<f64>,
    /// Root Mean Squared Error.
    pub rmse: f64,
    /// R-squared (coefficient of determination).
    pub r_squared: f64,
}

/// Calculate metrics between two timestamped series.
///
/// The series are aligned with an inner join on timestamps: only
/// observations present in both contribute, the rest are dropped. Fails
/// with [`ForecastError::EmptyData`] when the intersection is empty.
pub fn evaluate(actual: &TimeSeries, predicted: &TimeSeries) -> Result<ForecastMetrics> {
    let mut a = Vec::new();
    let mut p = Vec::new();
    for (ts, value) in actual.timestamps().iter().zip(actual.values()) {
        if let Some(pred) = predicted.value_at(ts) {
            a.push(*value);
            p.push(pred);
        }
    }
    evaluate_aligned(&a, &p)
}

/// Calculate metrics between pre-aligned value slices.
pub fn evaluate_aligned(actual: &[f64], predicted: &[f64]) -> Result<ForecastMetrics> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    if actual.len() != predicted.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }

    let n = actual.len() as f64;

    // MAPE (only if no zeros in actual)
    let mape = if actual.contains(&0.0) {
        None
    } else {
        let sum: f64 = actual
            .iter()
            .zip(predicted.iter())
            .map(|(a, p)| ((a - p) / a).abs())
            .sum();
        Some(100.0 * sum / n)
    };

    // RMSE
    let mse_value = mse(actual, predicted);
    let rmse = mse_value.sqrt();

    // R-squared
    let mean_actual = actual.iter().sum::<f64>() / n;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean_actual).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    let r_squared = if ss_tot == 0.0 {
        1.0
    } else {
        1.0 - ss_res / ss_tot
    };

    Ok(ForecastMetrics {
        mape,
        rmse,
        r_squared,
    })
}

/// Calculate MSE between two slices. Used as the swarm fitness.
pub fn mse(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }
    actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64
}
