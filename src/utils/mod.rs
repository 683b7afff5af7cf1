//! Supporting utilities for model fitting and evaluation.

pub mod metrics;
pub mod optimization;
pub mod stats;

pub use metrics::{calculate_metrics, AccuracyMetrics};
pub use optimization::{nelder_mead, NelderMeadConfig, NelderMeadResult};
pub use stats::quantile_normal;
