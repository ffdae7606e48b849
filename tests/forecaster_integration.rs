//! End-to-end scenarios: transactions in, forecast reports out.

use chrono::{NaiveDate, TimeZone, Utc};
use salecast::core::{monthly_sales, TimeSeries, Transaction};
use salecast::error::ForecastError;
use salecast::forecaster::{SeasonalForecaster, SequenceConfig, SequenceForecaster};
use salecast::swarm::SwarmConfig;

/// Three years of monthly sales with a stable annual pattern and a mild
/// upward trend.
fn three_year_series() -> TimeSeries {
    let pattern = [
        10.0, 12.0, 9.0, 15.0, 20.0, 18.0, 22.0, 25.0, 19.0, 14.0, 11.0, 13.0,
    ];
    let values: Vec<f64> = (0..36).map(|i| pattern[i % 12] + 0.3 * i as f64).collect();
    let timestamps: Vec<_> = (0..36)
        .map(|i| {
            Utc.with_ymd_and_hms(2021 + (i / 12) as i32, (i % 12) as u32 + 1, 1, 0, 0, 0)
                .unwrap()
        })
        .collect();
    TimeSeries::new(timestamps, values).unwrap()
}

/// A search budget small enough for tests.
fn small_sequence_config() -> SequenceConfig {
    SequenceConfig {
        units_bounds: (8.0, 24.0),
        window_bounds: (3.0, 8.0),
        swarm: SwarmConfig::new(3, 2),
        search_epochs: 3,
        final_epochs: 15,
        seed: None,
    }
    .with_seed(42)
}

#[test]
fn seasonal_forecaster_end_to_end() {
    let series = three_year_series();
    let report = SeasonalForecaster::new().run(&series).unwrap();

    assert_eq!(report.comparison.len(), 12);
    assert_eq!(report.comparison.timestamps, series.timestamps()[24..]);
    assert!(report.metrics.rmse >= 0.0 && report.metrics.rmse.is_finite());
    assert!(report.metrics.mape.is_some());

    // Interval band brackets every point forecast.
    let lower = report.comparison.lower.as_ref().unwrap();
    let upper = report.comparison.upper.as_ref().unwrap();
    for i in 0..12 {
        assert!(lower[i] <= report.comparison.predicted[i]);
        assert!(report.comparison.predicted[i] <= upper[i]);
    }

    // Training history is the first two years.
    assert_eq!(report.history.unwrap().values, series.values()[..24]);
}

#[test]
fn sequence_forecaster_end_to_end() {
    let series = three_year_series();
    let report = SequenceForecaster::with_config(small_sequence_config())
        .run(&series)
        .unwrap();

    assert!(!report.comparison.is_empty());
    assert_eq!(report.comparison.actual.len(), report.comparison.predicted.len());
    assert!(report.metrics.rmse.is_finite());
    // All actuals are positive, so MAPE is defined.
    let mape = report.metrics.mape.unwrap();
    assert!(mape >= 0.0);
}

#[test]
fn forecasters_fail_independently() {
    // Long enough for the sequence runner, too short for a 12-month
    // seasonal holdout.
    let values: Vec<f64> = (0..10).map(|i| 5.0 + i as f64).collect();
    let timestamps: Vec<_> = (0..10)
        .map(|i| Utc.with_ymd_and_hms(2024, i as u32 + 1, 1, 0, 0, 0).unwrap())
        .collect();
    let series = TimeSeries::new(timestamps, values).unwrap();

    assert!(matches!(
        SeasonalForecaster::new().run(&series),
        Err(ForecastError::InsufficientData { .. })
    ));
    let sequence = SequenceForecaster::with_config(small_sequence_config()).run(&series);
    assert!(sequence.is_ok());
}

#[test]
fn transactions_to_forecast_pipeline() {
    // Build transactions that aggregate into three years of monthly data.
    let mut transactions = Vec::new();
    for m in 0..36usize {
        let year = 2021 + (m / 12) as i32;
        let month = (m % 12) as u32 + 1;
        // Two transactions per month summing to a seasonal total.
        let total = 20.0 + 8.0 * ((m % 12) as f64 / 12.0 * std::f64::consts::TAU).sin();
        for (day, share) in [(5u32, 0.5), (20, 0.5)] {
            transactions.push(Transaction {
                transaction_date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
                product_id: 7,
                category_id: 1,
                quantity_sold: total * share,
            });
        }
    }

    let series = monthly_sales(&transactions).unwrap();
    assert_eq!(series.len(), 36);

    let report = SeasonalForecaster::new().run(&series).unwrap();
    assert_eq!(report.comparison.len(), 12);
    assert!(report.metrics.rmse.is_finite());
}

#[test]
fn reports_serialize_for_downstream_consumers() {
    let series = three_year_series();
    let report = SeasonalForecaster::new().run(&series).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["model"], "SARIMA");
    assert!(json["metrics"]["rmse"].is_number());
    assert_eq!(json["comparison"]["actual"].as_array().unwrap().len(), 12);
}
