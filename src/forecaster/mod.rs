//! High-level forecasting runners and their report types.
//!
//! A runner takes an aggregated monthly [`TimeSeries`] and returns a
//! [`SalesForecast`]: the accuracy metrics plus an actual-vs-predicted
//! comparison frame ready for a rendering or reporting layer. Two runners
//! are provided and share no state:
//!
//! - [`SeasonalForecaster`] — SARIMA(1,1,1)(1,1,1,12) holdout evaluation
//!   with prediction intervals;
//! - [`SequenceForecaster`] — a dense sequence network whose window length
//!   and hidden size are tuned by particle swarm search.

mod seasonal;
mod sequence;

pub use seasonal::SeasonalForecaster;
pub use sequence::{SequenceConfig, SequenceForecaster};

use crate::core::TimeSeries;
use crate::metrics::ForecastMetrics;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A timestamped value series in serializable form.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesFrame {
    pub timestamps: Vec<DateTime<Utc>>,
    pub values: Vec<f64>,
}

impl SeriesFrame {
    /// Snapshot a time series into a frame.
    pub fn from_series(series: &TimeSeries) -> Self {
        Self {
            timestamps: series.timestamps().to_vec(),
            values: series.values().to_vec(),
        }
    }
}

/// Actual and predicted values on a shared timeline, with an optional
/// interval band.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonFrame {
    pub timestamps: Vec<DateTime<Utc>>,
    pub actual: Vec<f64>,
    pub predicted: Vec<f64>,
    pub lower: Option<Vec<f64>>,
    pub upper: Option<Vec<f64>>,
}

impl ComparisonFrame {
    /// Number of compared observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// True when nothing was compared.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Complete output of one forecasting run.
#[derive(Debug, Clone, Serialize)]
pub struct SalesForecast {
    /// Human-readable model description.
    pub model: String,
    /// Accuracy of the prediction against the actuals in `comparison`.
    pub metrics: ForecastMetrics,
    /// The training history behind the forecast, when the evaluation is
    /// out-of-sample. In-sample runs leave this empty since the
    /// comparison frame already covers the history.
    pub history: Option<SeriesFrame>,
    /// Actual vs. predicted values.
    pub comparison: ComparisonFrame,
}
