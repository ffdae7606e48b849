//! Seasonal statistical forecasting runner.

use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::forecaster::{ComparisonFrame, SalesForecast, SeriesFrame};
use crate::metrics;
use crate::models::{Forecaster, Sarima, SarimaSpec};

/// Holdout evaluation of a seasonal ARIMA model on monthly sales.
///
/// Splits off the trailing year as a test set, fits
/// SARIMA(1,1,1)(1,1,1,12) on the rest, and forecasts the held-out year
/// with 95% prediction intervals.
#[derive(Debug, Clone)]
pub struct SeasonalForecaster {
    spec: SarimaSpec,
    horizon: usize,
    level: f64,
}

impl SeasonalForecaster {
    /// Create the default monthly runner: 12-month holdout, 95% intervals.
    pub fn new() -> Self {
        Self {
            spec: SarimaSpec::monthly(),
            horizon: 12,
            level: 0.95,
        }
    }

    /// Override the confidence level of the interval band.
    pub fn with_level(mut self, level: f64) -> Self {
        self.level = level;
        self
    }

    /// Run the full fit-and-evaluate cycle.
    ///
    /// Requires at least `horizon + 1` observations so that a non-empty
    /// train segment remains after the split; the model itself demands
    /// more (two seasonal cycles of training data) and reports its own
    /// requirement when the train segment is too short.
    pub fn run(&self, series: &TimeSeries) -> Result<SalesForecast> {
        if series.len() < self.horizon + 1 {
            return Err(ForecastError::InsufficientData {
                needed: self.horizon + 1,
                got: series.len(),
            });
        }

        let (train, test) = series.train_test_split(self.horizon)?;

        let mut model = Sarima::new(self.spec);
        model.fit(&train)?;
        let forecast = model.predict_with_intervals(self.horizon, self.level)?;

        let predicted = TimeSeries::new(test.timestamps().to_vec(), forecast.point().to_vec())?;
        let metrics = metrics::evaluate(&test, &predicted)?;

        let comparison = ComparisonFrame {
            timestamps: test.timestamps().to_vec(),
            actual: test.values().to_vec(),
            predicted: forecast.point().to_vec(),
            lower: Some(forecast.lower()?.to_vec()),
            upper: Some(forecast.upper()?.to_vec()),
        };

        Ok(SalesForecast {
            model: model.name().to_string(),
            metrics,
            history: Some(SeriesFrame::from_series(&train)),
            comparison,
        })
    }
}

impl Default for SeasonalForecaster {
    fn default() -> Self {
        Self::new()
    }
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

    fn seasonal_values(years: usize) -> Vec<f64> {
        let pattern = [
            10.0, 12.0, 9.0, 15.0, 20.0, 18.0, 22.0, 25.0, 19.0, 14.0, 11.0, 13.0,
        ];
        (0..years * 12)
            .map(|i| pattern[i % 12] + 0.2 * i as f64)
            .collect()
    }

    #[test]
    fn forecasts_the_held_out_year() {
        let series = make_monthly(&seasonal_values(3));
        let result = SeasonalForecaster::new().run(&series).unwrap();

        assert_eq!(result.comparison.len(), 12);
        assert_eq!(result.comparison.timestamps, series.timestamps()[24..]);
        assert_eq!(result.comparison.actual, series.values()[24..]);
        assert!(result.metrics.rmse >= 0.0);
        assert!(result.metrics.mape.is_some());

        let lower = result.comparison.lower.as_ref().unwrap();
        let upper = result.comparison.upper.as_ref().unwrap();
        for i in 0..12 {
            assert!(lower[i] <= result.comparison.predicted[i]);
            assert!(result.comparison.predicted[i] <= upper[i]);
        }
    }

    #[test]
    fn carries_training_history() {
        let series = make_monthly(&seasonal_values(3));
        let result = SeasonalForecaster::new().run(&series).unwrap();

        let history = result.history.unwrap();
        assert_eq!(history.values, series.values()[..24]);
        assert_eq!(result.model, "SARIMA");
    }

    #[test]
    fn too_short_for_a_holdout_year() {
        let series = make_monthly(&seasonal_values(1));
        assert!(matches!(
            SeasonalForecaster::new().run(&series),
            Err(ForecastError::InsufficientData { needed: 13, got: 12 })
        ));
    }

    #[test]
    fn train_segment_too_short_for_the_model() {
        // 14 observations pass the split check but leave only 2 to train
        // on; the model's own requirement fires instead.
        let series = make_monthly(&seasonal_values(2)[..14]);
        assert!(matches!(
            SeasonalForecaster::new().run(&series),
            Err(ForecastError::InsufficientData { .. })
        ));
    }
}
