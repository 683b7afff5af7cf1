//! Error types for the fincast library.

use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while preparing data or fitting a forecast.
///
/// Display strings double as the user-visible messages the UI boundary
/// shows after a failed forecast attempt.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input series is empty.
    #[error("empty input series")]
    EmptyData,

    /// Not enough observations for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Requested horizon is outside the supported range.
    #[error("invalid horizon {requested}: must be between 1 and {max} days")]
    InvalidHorizon { requested: usize, max: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Mismatched lengths between dates and values.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Date ordering or duplication problem.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Non-finite values remain after forward fill.
    #[error("missing values remain after forward fill")]
    MissingValues,

    /// Model could not be fitted to the series.
    #[error("model fit failed: {0}")]
    ModelFit(String),

    /// Prediction requested before the model was fitted.
    #[error("model must be fitted before prediction")]
    FitRequired,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = ForecastError::EmptyData;
        assert_eq!(err.to_string(), "empty input series");

        let err = ForecastError::InsufficientData { needed: 8, got: 3 };
        assert_eq!(err.to_string(), "insufficient data: need at least 8, got 3");

        let err = ForecastError::InvalidHorizon {
            requested: 120,
            max: 90,
        };
        assert_eq!(
            err.to_string(),
            "invalid horizon 120: must be between 1 and 90 days"
        );

        let err = ForecastError::ModelFit("series is constant".to_string());
        assert_eq!(err.to_string(), "model fit failed: series is constant");

        let err = ForecastError::FitRequired;
        assert_eq!(err.to_string(), "model must be fitted before prediction");
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = ForecastError::MissingValues;
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
