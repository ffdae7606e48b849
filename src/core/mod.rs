//! Core data structures for sales forecasting.

mod forecast;
mod time_series;

pub use forecast::Forecast;
pub use time_series::{monthly_sales, monthly_sales_by_category, TimeSeries, Transaction};
