//! # salecast
//!
//! Monthly product-sales forecasting core.
//!
//! Aggregates raw transactions into monthly series and forecasts them two
//! ways: a seasonal ARIMA holdout evaluation with prediction intervals,
//! and a dense sequence network whose window length and hidden size are
//! tuned by particle swarm optimization. Both runners return the same
//! serializable report: accuracy metrics plus an actual-vs-predicted
//! comparison frame.

#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod error;
pub mod forecaster;
pub mod metrics;
pub mod models;
pub mod nn;
pub mod swarm;
pub mod transform;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{monthly_sales, monthly_sales_by_category, Forecast, TimeSeries, Transaction};
    pub use crate::error::{ForecastError, Result};
    pub use crate::forecaster::{SalesForecast, SeasonalForecaster, SequenceConfig, SequenceForecaster};
    pub use crate::metrics::{evaluate, ForecastMetrics};
    pub use crate::models::{Forecaster, Sarima};
}
