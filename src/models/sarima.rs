//! Seasonal ARIMA model for monthly sales with annual seasonality.

use crate::core::{Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::diff::{difference, integrate, seasonal_difference, seasonal_integrate};
use crate::models::Forecaster;
use crate::utils::optimization::nelder_mead;
use crate::utils::stats::quantile_normal;

/// SARIMA model specification: (p,d,q)(P,D,Q)_s.
///
/// The estimation recursion expands the multiplicative polynomials by
/// hand, so every order is restricted to 0 or 1. That covers the
/// (1,1,1)(1,1,1,12) configuration this crate exists for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SarimaSpec {
    /// Non-seasonal AR order (p).
    pub p: usize,
    /// Non-seasonal differencing order (d).
    pub d: usize,
    /// Non-seasonal MA order (q).
    pub q: usize,
    /// Seasonal AR order (P).
    pub sp: usize,
    /// Seasonal differencing order (D).
    pub sd: usize,
    /// Seasonal MA order (Q).
    pub sq: usize,
    /// Seasonal period (s).
    pub period: usize,
}

impl SarimaSpec {
    /// Create and validate a specification.
    pub fn new(
        order: (usize, usize, usize),
        seasonal_order: (usize, usize, usize, usize),
    ) -> Result<Self> {
        let (p, d, q) = order;
        let (sp, sd, sq, period) = seasonal_order;

        for (name, value) in [
            ("p", p),
            ("d", d),
            ("q", q),
            ("P", sp),
            ("D", sd),
            ("Q", sq),
        ] {
            if value > 1 {
                return Err(ForecastError::InvalidParameter(format!(
                    "SARIMA order {name}={value} not supported (orders must be 0 or 1)"
                )));
            }
        }
        if (sp > 0 || sd > 0 || sq > 0) && period < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "seasonal period {period} must be at least 2"
            )));
        }

        Ok(Self {
            p,
            d,
            q,
            sp,
            sd,
            sq,
            period,
        })
    }

    /// The monthly-with-annual-seasonality default, (1,1,1)(1,1,1,12).
    pub fn monthly() -> Self {
        Self {
            p: 1,
            d: 1,
            q: 1,
            sp: 1,
            sd: 1,
            sq: 1,
            period: 12,
        }
    }

    /// Minimum observations required to fit: enough to survive both
    /// differencing passes with a handful of points left for estimation.
    pub fn min_observations(&self) -> usize {
        self.sd * self.period + self.d + 6
    }
}

/// Estimated coefficients of the multiplicative model.
#[derive(Debug, Clone, Copy, Default)]
struct SarimaParams {
    intercept: f64,
    /// Non-seasonal AR coefficient (phi).
    ar: f64,
    /// Seasonal AR coefficient (Phi).
    sar: f64,
    /// Non-seasonal MA coefficient (theta).
    ma: f64,
    /// Seasonal MA coefficient (Theta).
    sma: f64,
}

/// Seasonal ARIMA forecasting model.
///
/// Fits by conditional sum of squares on the doubly-differenced series
/// with zero pre-sample initialization, minimized with a bounded
/// Nelder-Mead simplex. Forecasts recurse on the differenced scale with
/// future residuals set to zero, then integrate back through both
/// differencing levels.
#[derive(Debug, Clone)]
pub struct Sarima {
    spec: SarimaSpec,
    params: SarimaParams,
    /// Original series (for seasonal integration).
    original: Option<Vec<f64>>,
    /// Seasonally differenced series (for regular integration).
    sdiff: Option<Vec<f64>>,
    /// Fully differenced series the ARMA recursion runs on.
    z: Option<Vec<f64>>,
    fitted_z: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
    residual_variance: Option<f64>,
}

impl Sarima {
    /// Create a model from a validated spec.
    pub fn new(spec: SarimaSpec) -> Self {
        Self {
            spec,
            params: SarimaParams::default(),
            original: None,
            sdiff: None,
            z: None,
            fitted_z: None,
            residuals: None,
            residual_variance: None,
        }
    }

    /// Create the default monthly model, SARIMA(1,1,1)(1,1,1,12).
    pub fn monthly() -> Self {
        Self::new(SarimaSpec::monthly())
    }

    /// Get the model specification.
    pub fn spec(&self) -> SarimaSpec {
        self.spec
    }

    /// One-step prediction at index `t` of the differenced series.
    ///
    /// Indices before the sample are treated as zero contributions
    /// (conditional sum of squares with zero initialization), which
    /// keeps short post-differencing samples usable.
    fn one_step(params: &SarimaParams, z: &[f64], e: &[f64], t: usize, s: usize) -> f64 {
        let c = params.intercept;
        let zc = |idx: i64| {
            if idx >= 0 && (idx as usize) < z.len() {
                z[idx as usize] - c
            } else {
                0.0
            }
        };
        let ev = |idx: i64| {
            if idx >= 0 && (idx as usize) < e.len() {
                e[idx as usize]
            } else {
                0.0
            }
        };

        let t = t as i64;
        let s = s as i64;
        c + params.ar * zc(t - 1) + params.sar * zc(t - s)
            - params.ar * params.sar * zc(t - 1 - s)
            + params.ma * ev(t - 1)
            + params.sma * ev(t - s)
            + params.ma * params.sma * ev(t - 1 - s)
    }

    /// Conditional sum of squares over the whole differenced sample.
    fn calculate_css(params: &SarimaParams, z: &[f64], s: usize) -> f64 {
        let mut residuals = vec![0.0; z.len()];
        let mut css = 0.0;
        for t in 0..z.len() {
            let pred = Self::one_step(params, z, &residuals, t, s);
            let error = z[t] - pred;
            residuals[t] = error;
            css += error * error;
        }
        css
    }

    fn unpack(spec: &SarimaSpec, point: &[f64]) -> SarimaParams {
        SarimaParams {
            intercept: point[0],
            ar: if spec.p > 0 { point[1] } else { 0.0 },
            sar: if spec.sp > 0 { point[2] } else { 0.0 },
            ma: if spec.q > 0 { point[3] } else { 0.0 },
            sma: if spec.sq > 0 { point[4] } else { 0.0 },
        }
    }

    fn estimate_parameters(&mut self, z: &[f64]) {
        let spec = self.spec;
        let mean = z.iter().sum::<f64>() / z.len() as f64;

        // Coefficients absent from the spec are pinned at zero by
        // collapsing their bound to a point.
        let coefficient_bound = |active: bool| {
            if active {
                (-0.99, 0.99)
            } else {
                (0.0, 0.0)
            }
        };
        let bounds = [
            (f64::NEG_INFINITY, f64::INFINITY),
            coefficient_bound(spec.p > 0),
            coefficient_bound(spec.sp > 0),
            coefficient_bound(spec.q > 0),
            coefficient_bound(spec.sq > 0),
        ];
        let initial = [
            mean,
            if spec.p > 0 { 0.1 } else { 0.0 },
            if spec.sp > 0 { 0.1 } else { 0.0 },
            if spec.q > 0 { 0.1 } else { 0.0 },
            if spec.sq > 0 { 0.1 } else { 0.0 },
        ];

        let result = nelder_mead(
            |point| {
                let params = Self::unpack(&spec, point);
                Self::calculate_css(&params, z, spec.period)
            },
            &initial,
            Some(&bounds),
            1000,
            1e-8,
        );

        self.params = Self::unpack(&spec, &result.optimal_point);
    }

    fn calculate_fitted(&mut self, z: &[f64]) {
        let s = self.spec.period;
        let mut fitted = vec![0.0; z.len()];
        let mut residuals = vec![0.0; z.len()];
        for t in 0..z.len() {
            let pred = Self::one_step(&self.params, z, &residuals, t, s);
            fitted[t] = pred;
            residuals[t] = z[t] - pred;
        }

        let variance = residuals.iter().map(|r| r * r).sum::<f64>() / residuals.len() as f64;
        self.residual_variance = Some(variance);
        self.fitted_z = Some(fitted);
        self.residuals = Some(residuals);
    }
}

impl Default for Sarima {
    fn default() -> Self {
        Self::monthly()
    }
}

impl Forecaster for Sarima {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let values = series.values();
        let needed = self.spec.min_observations();
        if values.len() < needed {
            return Err(ForecastError::InsufficientData {
                needed,
                got: values.len(),
            });
        }

        self.original = Some(values.to_vec());
        let sdiff = seasonal_difference(values, self.spec.sd, self.spec.period);
        let z = difference(&sdiff, self.spec.d);
        if z.is_empty() {
            return Err(ForecastError::InsufficientData {
                needed,
                got: values.len(),
            });
        }

        self.estimate_parameters(&z);
        self.calculate_fitted(&z);
        self.sdiff = Some(sdiff);
        self.z = Some(z);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let original = self.original.as_ref().ok_or(ForecastError::FitRequired)?;
        let sdiff = self.sdiff.as_ref().ok_or(ForecastError::FitRequired)?;
        let z = self.z.as_ref().ok_or(ForecastError::FitRequired)?;
        let residuals = self.residuals.as_ref().ok_or(ForecastError::FitRequired)?;

        if horizon == 0 {
            return Ok(Forecast::new());
        }

        // Recurse on the differenced scale; future residuals are zero.
        let mut extended_z = z.clone();
        let mut extended_e = residuals.clone();
        for _ in 0..horizon {
            let t = extended_z.len();
            let pred = Self::one_step(&self.params, &extended_z, &extended_e, t, self.spec.period);
            extended_z.push(pred);
            extended_e.push(0.0);
        }
        let forecast_z = &extended_z[z.len()..];

        // Integrate back: regular differencing first (onto the seasonally
        // differenced scale), then seasonal differencing (onto the data
        // scale).
        let forecast_sdiff = if self.spec.d > 0 {
            integrate(forecast_z, sdiff, self.spec.d)
        } else {
            forecast_z.to_vec()
        };
        let predictions = if self.spec.sd > 0 {
            seasonal_integrate(&forecast_sdiff, original, self.spec.period)
        } else {
            forecast_sdiff
        };

        Ok(Forecast::from_values(predictions))
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let forecast = self.predict(horizon)?;
        if horizon == 0 {
            return Ok(forecast);
        }

        let variance = self.residual_variance.unwrap_or(0.0);
        let zq = quantile_normal((1.0 + level) / 2.0);
        let preds = forecast.point();

        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for h in 1..=horizon {
            // Forecast-error variance grows with the horizon.
            let se = (variance * h as f64).sqrt();
            lower.push(preds[h - 1] - zq * se);
            upper.push(preds[h - 1] + zq * se);
        }

        Ok(Forecast::from_values_with_intervals(
            preds.to_vec(),
            lower,
            upper,
        ))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted_z.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "SARIMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_monthly(values: &[f64]) -> TimeSeries {
        let timestamps: Vec<_> = (0..values.len())
            .map(|i| {
                Utc.with_ymd_and_hms(2020 + (i / 12) as i32, (i % 12) as u32 + 1, 1, 0, 0, 0)
                    .unwrap()
            })
            .collect();
        TimeSeries::new(timestamps, values.to_vec()).unwrap()
    }

    /// Monthly pattern with mild trend, several years long.
    fn seasonal_values(years: usize) -> Vec<f64> {
        let pattern = [
            10.0, 12.0, 9.0, 15.0, 20.0, 18.0, 22.0, 25.0, 19.0, 14.0, 11.0, 13.0,
        ];
        (0..years * 12)
            .map(|i| pattern[i % 12] + 0.2 * i as f64)
            .collect()
    }

    #[test]
    fn spec_rejects_unsupported_orders() {
        assert!(SarimaSpec::new((2, 1, 1), (1, 1, 1, 12)).is_err());
        assert!(SarimaSpec::new((1, 1, 1), (1, 1, 2, 12)).is_err());
        assert!(SarimaSpec::new((1, 1, 1), (1, 1, 1, 1)).is_err());
        assert!(SarimaSpec::new((1, 1, 1), (1, 1, 1, 12)).is_ok());
        assert!(SarimaSpec::new((1, 0, 0), (0, 0, 0, 0)).is_ok());
    }

    #[test]
    fn fit_and_predict_horizon() {
        let ts = make_monthly(&seasonal_values(3));
        let mut model = Sarima::monthly();
        model.fit(&ts).unwrap();

        let forecast = model.predict(12).unwrap();
        assert_eq!(forecast.horizon(), 12);
        for value in forecast.point() {
            assert!(value.is_finite());
        }
    }

    #[test]
    fn forecast_tracks_seasonal_shape() {
        // With a clean pattern the seasonal model should continue it:
        // the August peak stays above the March trough.
        let ts = make_monthly(&seasonal_values(4));
        let mut model = Sarima::monthly();
        model.fit(&ts).unwrap();

        let forecast = model.predict(12).unwrap();
        let preds = forecast.point();
        assert!(preds[7] > preds[2], "peak {} trough {}", preds[7], preds[2]);
    }

    #[test]
    fn intervals_bracket_the_point_forecast() {
        let ts = make_monthly(&seasonal_values(3));
        let mut model = Sarima::monthly();
        model.fit(&ts).unwrap();

        let forecast = model.predict_with_intervals(12, 0.95).unwrap();
        let lower = forecast.lower().unwrap();
        let upper = forecast.upper().unwrap();
        let preds = forecast.point();

        for i in 0..12 {
            assert!(lower[i] <= preds[i] && preds[i] <= upper[i]);
        }
        // Bands widen with the horizon.
        assert!(upper[11] - lower[11] >= upper[0] - lower[0]);
    }

    #[test]
    fn insufficient_data_is_detected_before_estimation() {
        let ts = make_monthly(&seasonal_values(1));
        let mut model = Sarima::monthly();
        // 12 observations cannot survive seasonal differencing at lag 12.
        assert!(matches!(
            model.fit(&ts),
            Err(ForecastError::InsufficientData { .. })
        ));
    }

    #[test]
    fn predict_requires_fit() {
        let model = Sarima::monthly();
        assert!(matches!(model.predict(5), Err(ForecastError::FitRequired)));
    }

    #[test]
    fn zero_horizon() {
        let ts = make_monthly(&seasonal_values(3));
        let mut model = Sarima::monthly();
        model.fit(&ts).unwrap();
        assert_eq!(model.predict(0).unwrap().horizon(), 0);
    }

    #[test]
    fn non_seasonal_configuration_still_fits() {
        let values: Vec<f64> = (0..40).map(|i| 5.0 + 0.5 * i as f64).collect();
        let ts = make_monthly(&values);
        let spec = SarimaSpec::new((1, 1, 1), (0, 0, 0, 0)).unwrap();
        let mut model = Sarima::new(spec);
        model.fit(&ts).unwrap();

        let forecast = model.predict(3).unwrap();
        // Trend should roughly continue.
        assert!(forecast.point()[0] > values[35]);
    }

    #[test]
    fn trait_accessors() {
        let ts = make_monthly(&seasonal_values(3));
        let mut model = Sarima::monthly();
        assert!(!model.is_fitted());
        model.fit(&ts).unwrap();

        assert!(model.is_fitted());
        assert_eq!(model.name(), "SARIMA");
        assert!(model.fitted_values().is_some());
        // z has length 36 - 12 - 1.
        assert_eq!(model.residuals().unwrap().len(), 23);
    }
}
