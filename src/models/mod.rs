//! Statistical forecasting models.

pub mod diff;
pub mod sarima;
mod traits;

pub use sarima::{Sarima, SarimaSpec};
pub use traits::{BoxedForecaster, Forecaster};
