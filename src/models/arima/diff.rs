//! Differencing utilities for ARIMA models.

/// Difference a series `d` times.
///
/// Each pass replaces the series with its first differences, shortening
/// it by one.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            break;
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Reverse `d` levels of differencing on a forecast continuation.
///
/// `original` supplies the initial values at each differencing level so
/// the cumulative sums anchor to the end of the observed series.
pub fn integrate(differenced: &[f64], original: &[f64], d: usize) -> Vec<f64> {
    if d == 0 || differenced.is_empty() {
        return differenced.to_vec();
    }

    let mut result = differenced.to_vec();
    for level in (0..d).rev() {
        let anchor = if level == 0 {
            original.last().copied().unwrap_or(0.0)
        } else {
            difference(original, level).last().copied().unwrap_or(0.0)
        };

        let mut cumsum = anchor;
        for value in &mut result {
            cumsum += *value;
            *value = cumsum;
        }
    }

    result
}
