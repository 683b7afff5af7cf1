//! Core data structures for the forecast engine.

mod forecast;
mod time_series;

pub use forecast::{Forecast, ForecastStep};
pub use time_series::TimeSeries;
