//! # fincast
//!
//! Forecast-and-interval engine for daily financial and sales series.
//!
//! Given a daily time series, a model choice and a horizon, the engine
//! produces point forecasts with 95% prediction bounds using one of two
//! interchangeable models: additive-trend exponential smoothing
//! (Holt-Winters without seasonality) or ARIMA(5,1,0). Data loading and
//! chart rendering live outside this crate; the caller hands in a cleaned
//! [`core::TimeSeries`] and consumes the dated [`core::Forecast`] rows.

#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod engine;
pub mod error;
pub mod models;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{Forecast, TimeSeries};
    pub use crate::engine::{forecast, ForecastModel, ForecastRequest, MAX_HORIZON};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::Forecaster;
    pub use crate::utils::{calculate_metrics, quantile_normal, AccuracyMetrics};
}
