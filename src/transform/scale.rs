//! Min-max scaling for sequence-model training.

use crate::error::{ForecastError, Result};

/// Min-max scaler mapping a series onto [0, 1].
///
/// x_scaled = (x - min) / (max - min)
///
/// Fitted once per forecaster run; the search phase and the final
/// training each own their own instance and never share parameters.
#[derive(Debug, Clone)]
pub struct MinMaxScaler {
    min: f64,
    scale: f64,
}

impl MinMaxScaler {
    /// Fit a scaler to the given series.
    pub fn fit(series: &[f64]) -> Result<Self> {
        if series.is_empty() {
            return Err(ForecastError::EmptyData);
        }

        let min = series.iter().copied().fold(f64::INFINITY, f64::min);
        let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !min.is_finite() || !max.is_finite() {
            return Err(ForecastError::ComputationError(
                "non-finite values in series".to_string(),
            ));
        }

        let range = max - min;
        // Constant series map to all-zeros instead of dividing by zero.
        let scale = if range < 1e-10 { 1.0 } else { range };

        Ok(Self { min, scale })
    }

    /// Transform data using the fitted parameters.
    pub fn transform(&self, data: &[f64]) -> Vec<f64> {
        data.iter().map(|&x| (x - self.min) / self.scale).collect()
    }

    /// Fit to the series and transform it in one step.
    pub fn fit_transform(series: &[f64]) -> Result<(Self, Vec<f64>)> {
        let scaler = Self::fit(series)?;
        let scaled = scaler.transform(series);
        Ok((scaler, scaled))
    }

    /// Map scaled values back to the original scale.
    pub fn inverse_transform(&self, data: &[f64]) -> Vec<f64> {
        data.iter().map(|&x| x * self.scale + self.min).collect()
    }
}
