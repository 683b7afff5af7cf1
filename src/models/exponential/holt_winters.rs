//! Holt-Winters forecasting with additive trend and no seasonality.
//!
//! Double exponential smoothing:
//! - Level: `l_t = α × y_t + (1-α) × (l_{t-1} + b_{t-1})`
//! - Trend: `b_t = β × (l_t - l_{t-1}) + (1-β) × b_{t-1}`
//! - Forecast: `ŷ_{T+h} = l_T + h × b_T`

use crate::core::{Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::{forecast_dates, Forecaster};
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::utils::stats::{population_std, quantile_normal};
use chrono::NaiveDate;

const PARAM_BOUNDS: (f64, f64) = (0.0001, 0.9999);

/// Holt-Winters forecaster (additive trend, no seasonal component).
///
/// Prediction bounds use the residual-spread approximation carried over
/// from the source dashboards: `forecast ± z × std(residuals)`, a
/// constant-width band at every horizon step rather than a true
/// horizon-growing prediction interval.
#[derive(Debug, Clone)]
pub struct HoltWinters {
    /// Level smoothing parameter (0 < alpha < 1).
    alpha: Option<f64>,
    /// Trend smoothing parameter (0 < beta < 1).
    beta: Option<f64>,
    /// Whether to estimate parameters by SSE minimization.
    optimize: bool,
    /// Final level state.
    level: Option<f64>,
    /// Final trend state.
    trend: Option<f64>,
    /// Last date of the fitted series.
    origin: Option<NaiveDate>,
    /// Fitted values.
    fitted: Option<Vec<f64>>,
    /// Residuals.
    residuals: Option<Vec<f64>>,
    /// Standard deviation of in-sample residuals.
    residual_std: Option<f64>,
}

impl HoltWinters {
    /// Create a model with fixed smoothing parameters.
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self {
            alpha: Some(alpha.clamp(PARAM_BOUNDS.0, PARAM_BOUNDS.1)),
            beta: Some(beta.clamp(PARAM_BOUNDS.0, PARAM_BOUNDS.1)),
            optimize: false,
            level: None,
            trend: None,
            origin: None,
            fitted: None,
            residuals: None,
            residual_std: None,
        }
    }

    /// Create a model that estimates its parameters from the data.
    pub fn auto() -> Self {
        Self {
            alpha: None,
            beta: None,
            optimize: true,
            level: None,
            trend: None,
            origin: None,
            fitted: None,
            residuals: None,
            residual_std: None,
        }
    }

    /// Level smoothing parameter.
    pub fn alpha(&self) -> Option<f64> {
        self.alpha
    }

    /// Trend smoothing parameter.
    pub fn beta(&self) -> Option<f64> {
        self.beta
    }

    /// Final level state.
    pub fn level(&self) -> Option<f64> {
        self.level
    }

    /// Final trend state.
    pub fn trend(&self) -> Option<f64> {
        self.trend
    }

    /// Standard deviation of the in-sample residuals.
    pub fn residual_std(&self) -> Option<f64> {
        self.residual_std
    }

    /// Initialize level and trend from the first observations.
    fn initial_state(values: &[f64]) -> (f64, f64) {
        let level = values[0];
        let trend = values[1] - values[0];
        (level, trend)
    }

    /// Sum of squared one-step-ahead errors for given parameters.
    fn sse(values: &[f64], alpha: f64, beta: f64) -> f64 {
        let (mut level, mut trend) = Self::initial_state(values);
        let mut total = 0.0;

        for &y in &values[1..] {
            let error = y - (level + trend);
            total += error * error;

            let previous_level = level;
            level = alpha * y + (1.0 - alpha) * (previous_level + trend);
            trend = beta * (level - previous_level) + (1.0 - beta) * trend;
        }

        total
    }

    /// Estimate alpha and beta by SSE minimization.
    fn estimate_params(values: &[f64]) -> (f64, f64) {
        let result = nelder_mead(
            |params| Self::sse(values, params[0], params[1]),
            &[0.3, 0.1],
            Some(&[PARAM_BOUNDS, PARAM_BOUNDS]),
            NelderMeadConfig::default(),
        );
        (
            result.optimal_point[0].clamp(PARAM_BOUNDS.0, PARAM_BOUNDS.1),
            result.optimal_point[1].clamp(PARAM_BOUNDS.0, PARAM_BOUNDS.1),
        )
    }
}

impl Default for HoltWinters {
    fn default() -> Self {
        Self::auto()
    }
}

impl Forecaster for HoltWinters {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let values = series.values();
        if values.len() < 2 {
            return Err(ForecastError::InsufficientData {
                needed: 2,
                got: values.len(),
            });
        }

        if self.optimize {
            let (alpha, beta) = Self::estimate_params(values);
            self.alpha = Some(alpha);
            self.beta = Some(beta);
        }
        let alpha = self.alpha.ok_or(ForecastError::FitRequired)?;
        let beta = self.beta.ok_or(ForecastError::FitRequired)?;

        let (mut level, mut trend) = Self::initial_state(values);

        let mut fitted = Vec::with_capacity(values.len());
        let mut residuals = Vec::with_capacity(values.len());

        // The first observation seeds the state and has no real forecast.
        fitted.push(level);
        residuals.push(0.0);

        for &y in &values[1..] {
            let forecast = level + trend;
            fitted.push(forecast);
            residuals.push(y - forecast);

            let previous_level = level;
            level = alpha * y + (1.0 - alpha) * (previous_level + trend);
            trend = beta * (level - previous_level) + (1.0 - beta) * trend;
        }

        // Residual spread over the observations that have a defined
        // one-step-ahead forecast; population form so a two-point series
        // yields zero spread rather than an undefined variance.
        self.residual_std = Some(population_std(&residuals[1..]));

        self.level = Some(level);
        self.trend = Some(trend);
        self.origin = series.last_date();
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);

        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let level = self.level.ok_or(ForecastError::FitRequired)?;
        let trend = self.trend.ok_or(ForecastError::FitRequired)?;
        let origin = self.origin.ok_or(ForecastError::FitRequired)?;

        if horizon == 0 {
            return Ok(Forecast::new());
        }

        let point: Vec<f64> = (1..=horizon).map(|h| level + h as f64 * trend).collect();
        Forecast::from_points(forecast_dates(origin, horizon), point)
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let forecast = self.predict(horizon)?;
        if horizon == 0 {
            return Ok(forecast);
        }

        let residual_std = self.residual_std.ok_or(ForecastError::FitRequired)?;
        let z = quantile_normal((1.0 + level) / 2.0);
        let margin = z * residual_std;

        let point = forecast.point().to_vec();
        let lower: Vec<f64> = point.iter().map(|p| p - margin).collect();
        let upper: Vec<f64> = point.iter().map(|p| p + margin).collect();

        Forecast::with_intervals(forecast.dates().to_vec(), point, lower, upper)
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "HoltWinters"
    }
}
