//! Statistical utility functions.

/// Approximate quantile function of the standard normal distribution.
///
/// Uses the Abramowitz and Stegun rational approximation (formula
/// 26.2.23), accurate to about 4.5e-4 — more than enough for interval
/// z-scores.
///
/// # Example
/// ```
/// use fincast::utils::quantile_normal;
///
/// // 95% confidence level -> z ≈ 1.96
/// let z = quantile_normal(0.975);
/// assert!((z - 1.96).abs() < 0.01);
/// ```
pub fn quantile_normal(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    let tail = p.min(1.0 - p);
    let t = (-2.0 * tail.ln()).sqrt();

    let numerator = 2.515517 + 0.802853 * t + 0.010328 * t * t;
    let denominator = 1.0 + 1.432788 * t + 0.189269 * t * t + 0.001308 * t * t * t;
    let z = t - numerator / denominator;

    if p < 0.5 {
        -z
    } else {
        z
    }
}

/// Mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (n denominator), as used for residual
/// spread in interval approximations.
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    (values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}
