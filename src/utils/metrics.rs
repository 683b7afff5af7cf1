//! Accuracy metrics for forecast evaluation.

use crate::error::{ForecastError, Result};

/// Accuracy metrics for a forecast against held-out actuals.
#[derive(Debug, Clone)]
pub struct AccuracyMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error (None if actuals contain zeros)
    pub mape: Option<f64>,
    /// Symmetric Mean Absolute Percentage Error
    pub smape: f64,
}

/// Calculate accuracy metrics between actual and predicted values.
pub fn calculate_metrics(actual: &[f64], predicted: &[f64]) -> Result<AccuracyMetrics> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    if actual.len() != predicted.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }

    let n = actual.len() as f64;

    let mae = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / n;

    let mse = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / n;

    let rmse = mse.sqrt();

    let mape = if actual.contains(&0.0) {
        None
    } else {
        let sum: f64 = actual
            .iter()
            .zip(predicted)
            .map(|(a, p)| ((a - p) / a).abs())
            .sum();
        Some(100.0 * sum / n)
    };

    let smape = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| {
            let denom = a.abs() + p.abs();
            if denom == 0.0 {
                0.0
            } else {
                2.0 * (a - p).abs() / denom
            }
        })
        .sum::<f64>()
        * 100.0
        / n;

    Ok(AccuracyMetrics {
        mae,
        mse,
        rmse,
        mape,
        smape,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perfect_forecast_scores_zero() {
        let actual = [10.0, 20.0, 30.0];
        let metrics = calculate_metrics(&actual, &actual).unwrap();

        assert_relative_eq!(metrics.mae, 0.0);
        assert_relative_eq!(metrics.mse, 0.0);
        assert_relative_eq!(metrics.rmse, 0.0);
        assert_relative_eq!(metrics.mape.unwrap(), 0.0);
        assert_relative_eq!(metrics.smape, 0.0);
    }

    #[test]
    fn known_errors() {
        let actual = [10.0, 20.0];
        let predicted = [12.0, 16.0];
        let metrics = calculate_metrics(&actual, &predicted).unwrap();

        assert_relative_eq!(metrics.mae, 3.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.mse, 10.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.rmse, 10.0f64.sqrt(), epsilon = 1e-10);
        // |2/10| and |4/20| -> 20% each
        assert_relative_eq!(metrics.mape.unwrap(), 20.0, epsilon = 1e-10);
    }

    #[test]
    fn mape_is_none_with_zero_actuals() {
        let metrics = calculate_metrics(&[0.0, 10.0], &[1.0, 9.0]).unwrap();
        assert!(metrics.mape.is_none());
        assert!(metrics.smape.is_finite());
    }

    #[test]
    fn rejects_invalid_input() {
        assert!(matches!(
            calculate_metrics(&[], &[]),
            Err(ForecastError::EmptyData)
        ));
        assert!(matches!(
            calculate_metrics(&[1.0, 2.0], &[1.0]),
            Err(ForecastError::DimensionMismatch { .. })
        ));
    }
}
