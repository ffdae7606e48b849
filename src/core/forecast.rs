//! Forecast result structure for holding predictions.

use crate::error::{ForecastError, Result};

/// A forecast containing point predictions and optional interval bounds.
#[derive(Debug, Clone, Default)]
pub struct Forecast {
    point: Vec<f64>,
    lower: Option<Vec<f64>>,
    upper: Option<Vec<f64>>,
}

impl Forecast {
    /// Create an empty forecast.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a forecast from point predictions.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            point: values,
            lower: None,
            upper: None,
        }
    }

    /// Create a forecast with prediction intervals.
    pub fn from_values_with_intervals(
        values: Vec<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
    ) -> Self {
        Self {
            point: values,
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// Get the forecast horizon (number of steps).
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    /// Check if forecast is empty.
    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    /// Get the point predictions.
    pub fn point(&self) -> &[f64] {
        &self.point
    }

    /// Check if a lower interval is available.
    pub fn has_lower(&self) -> bool {
        self.lower.is_some()
    }

    /// Check if an upper interval is available.
    pub fn has_upper(&self) -> bool {
        self.upper.is_some()
    }

    /// Get the lower interval bounds.
    pub fn lower(&self) -> Result<&[f64]> {
        self.lower
            .as_deref()
            .ok_or_else(|| ForecastError::ComputationError("no lower interval".to_string()))
    }

    /// Get the upper interval bounds.
    pub fn upper(&self) -> Result<&[f64]> {
        self.upper
            .as_deref()
            .ok_or_else(|| ForecastError::ComputationError("no upper interval".to_string()))
    }
}
