//! Forecaster trait defining the common interface for all models.

use crate::core::{Forecast, TimeSeries};
use crate::error::Result;

/// Common interface for forecasting models.
///
/// Object-safe, so the engine can hold models as `Box<dyn Forecaster>`.
/// Models capture the series' last date at fit time; predictions carry
/// the contiguous daily dates that follow it.
pub trait Forecaster {
    /// Fit the model to the time series.
    fn fit(&mut self, series: &TimeSeries) -> Result<()>;

    /// Generate point predictions for the specified horizon.
    fn predict(&self, horizon: usize) -> Result<Forecast>;

    /// Generate predictions with prediction bounds at the given
    /// confidence level (e.g. 0.95).
    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let _ = level;
        self.predict(horizon)
    }

    /// In-sample one-step-ahead predictions.
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Residuals (actual - fitted).
    fn residuals(&self) -> Option<&[f64]>;

    /// Model name.
    fn name(&self) -> &str;

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}

/// Type alias for boxed forecaster trait objects.
pub type BoxedForecaster = Box<dyn Forecaster>;
