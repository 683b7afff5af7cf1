//! The forecast engine: request validation and model dispatch.
//!
//! One-shot and side-effect-free: every call regularizes the input onto
//! the daily grid, fits a fresh model and returns a dated forecast with
//! 95% prediction bounds. There is nothing to cache or cancel; a caller
//! discards a stale result when the user changes a parameter.

use std::fmt;
use std::str::FromStr;

use crate::core::{Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::arima::Arima;
use crate::models::exponential::HoltWinters;
use crate::models::{BoxedForecaster, Forecaster};

/// Upper bound on the forecast horizon, in days.
pub const MAX_HORIZON: usize = 90;

/// Confidence level for prediction bounds (alpha = 0.05).
pub const CONFIDENCE_LEVEL: f64 = 0.95;

/// The two interchangeable forecast models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastModel {
    /// Additive-trend exponential smoothing, no seasonality.
    HoltWinters,
    /// ARIMA(5,1,0).
    Arima,
}

impl ForecastModel {
    /// Display name, matching the UI's model selector.
    pub fn name(&self) -> &'static str {
        match self {
            ForecastModel::HoltWinters => "Holt-Winters",
            ForecastModel::Arima => "ARIMA",
        }
    }
}

impl fmt::Display for ForecastModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ForecastModel {
    type Err = ForecastError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "holt-winters" | "holtwinters" | "holt_winters" | "hw" => {
                Ok(ForecastModel::HoltWinters)
            }
            "arima" => Ok(ForecastModel::Arima),
            _ => Err(ForecastError::InvalidParameter(format!(
                "unknown model: {}",
                s
            ))),
        }
    }
}

/// User-selected forecast parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastRequest {
    /// Which model to fit.
    pub model: ForecastModel,
    /// Days ahead to forecast, in `[1, MAX_HORIZON]`.
    pub horizon: usize,
}

impl ForecastRequest {
    /// Create a new request.
    pub fn new(model: ForecastModel, horizon: usize) -> Self {
        Self { model, horizon }
    }

    /// Check the horizon bounds.
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 || self.horizon > MAX_HORIZON {
            return Err(ForecastError::InvalidHorizon {
                requested: self.horizon,
                max: MAX_HORIZON,
            });
        }
        Ok(())
    }
}

/// Fit the requested model and forecast with 95% prediction bounds.
///
/// The series is regularized onto the daily grid with forward fill
/// first, then must contain at least two finite observations, no
/// unfillable missing values, and some variation. The result has
/// exactly `request.horizon` rows whose dates contiguously follow the
/// series' last date.
pub fn forecast(series: &TimeSeries, request: &ForecastRequest) -> Result<Forecast> {
    request.validate()?;

    if series.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    let filled = series.fill_daily();

    if filled.valid_len() < 2 {
        return Err(ForecastError::InsufficientData {
            needed: 2,
            got: filled.valid_len(),
        });
    }
    if filled.has_missing_values() {
        // Leading non-finite values have nothing to forward-fill from.
        return Err(ForecastError::MissingValues);
    }
    if filled.is_constant() {
        return Err(ForecastError::ModelFit(
            "series is constant, nothing to extrapolate".to_string(),
        ));
    }

    let mut model: BoxedForecaster = match request.model {
        ForecastModel::HoltWinters => Box::new(HoltWinters::auto()),
        ForecastModel::Arima => Box::new(Arima::default()),
    };

    model.fit(&filled)?;
    model.predict_with_intervals(request.horizon, CONFIDENCE_LEVEL)
}
