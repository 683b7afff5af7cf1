//! Exponential smoothing models.
//!
//! The dashboards call the additive-trend, no-seasonality variant
//! "Holt-Winters"; that naming is kept here.

mod holt_winters;

pub use holt_winters::HoltWinters;
