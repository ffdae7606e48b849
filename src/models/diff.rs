//! Differencing utilities for the seasonal ARIMA model.

/// Apply `d` rounds of first differencing.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            break;
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Apply `d` rounds of lag-`period` differencing.
pub fn seasonal_difference(series: &[f64], d: usize, period: usize) -> Vec<f64> {
    if period == 0 {
        return series.to_vec();
    }
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= period {
            break;
        }
        result = result
            .iter()
            .skip(period)
            .zip(result.iter())
            .map(|(curr, prev)| curr - prev)
            .collect();
    }
    result
}

/// Undo first differencing on a forecast.
///
/// `original` is the pre-differencing series the forecast continues from;
/// each step is a cumulative sum seeded with its last value.
pub fn integrate(forecast_diff: &[f64], original: &[f64], d: usize) -> Vec<f64> {
    if d == 0 || forecast_diff.is_empty() {
        return forecast_diff.to_vec();
    }

    let mut result = forecast_diff.to_vec();
    for level in (0..d).rev() {
        let init = if level == 0 {
            *original.last().unwrap_or(&0.0)
        } else {
            *difference(original, level).last().unwrap_or(&0.0)
        };

        let mut cumsum = init;
        for value in &mut result {
            cumsum += *value;
            *value = cumsum;
        }
    }
    result
}

/// Undo lag-`period` differencing on a forecast.
///
/// Each forecast step adds its seasonally-differenced value to the
/// observation one period earlier, walking forward through the original
/// tail and then through the forecast itself once the horizon exceeds
/// one period.
pub fn seasonal_integrate(forecast_sdiff: &[f64], original: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || original.len() < period {
        return forecast_sdiff.to_vec();
    }

    let mut extended = original.to_vec();
    for &diff in forecast_sdiff {
        let base = extended[extended.len() - period];
        extended.push(base + diff);
    }
    extended[original.len()..].to_vec()
}
