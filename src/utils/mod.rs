//! Utility functions shared by the forecasting models.

pub mod optimization;
pub mod stats;

pub use optimization::{nelder_mead, SimplexResult};
pub use stats::{mean, quantile_normal, variance};
