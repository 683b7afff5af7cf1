//! ARIMA model fitting and forecasting.

use crate::core::{Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::arima::diff::{difference, integrate};
use crate::models::{forecast_dates, Forecaster};
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::utils::stats::quantile_normal;
use chrono::NaiveDate;

/// ARIMA order specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArimaOrder {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q)
    pub q: usize,
}

impl ArimaOrder {
    /// Create a new order specification.
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Total number of estimated parameters (AR + MA + intercept).
    pub fn num_params(&self) -> usize {
        self.p + self.q + 1
    }

    /// Minimum series length required to fit this order.
    pub fn min_observations(&self) -> usize {
        self.d + self.p.max(self.q) + 2
    }
}

impl Default for ArimaOrder {
    /// The engine's standard order for daily dashboard series.
    fn default() -> Self {
        Self::new(5, 1, 0)
    }
}

/// ARIMA(p, d, q) forecaster.
///
/// Coefficients are estimated by conditional least squares; prediction
/// bounds come from the model's own ψ-weight variance propagation, so
/// interval width is non-decreasing in the horizon step.
#[derive(Debug, Clone)]
pub struct Arima {
    /// Order specification.
    order: ArimaOrder,
    /// AR coefficients.
    ar: Vec<f64>,
    /// MA coefficients.
    ma: Vec<f64>,
    /// Intercept (mean of the differenced series).
    intercept: f64,
    /// Original series, kept for integration.
    original: Option<Vec<f64>>,
    /// Differenced series.
    differenced: Option<Vec<f64>>,
    /// Fitted values on the differenced scale.
    fitted_diff: Option<Vec<f64>>,
    /// Residuals on the differenced scale.
    residuals: Option<Vec<f64>>,
    /// Residual variance.
    residual_variance: Option<f64>,
    /// Akaike information criterion.
    aic: Option<f64>,
    /// Bayesian information criterion.
    bic: Option<f64>,
    /// Last date of the fitted series.
    origin: Option<NaiveDate>,
}

impl Arima {
    /// Create a new ARIMA model with the given order.
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self::with_order(ArimaOrder::new(p, d, q))
    }

    /// Create a new ARIMA model from an [`ArimaOrder`].
    pub fn with_order(order: ArimaOrder) -> Self {
        Self {
            order,
            ar: vec![],
            ma: vec![],
            intercept: 0.0,
            original: None,
            differenced: None,
            fitted_diff: None,
            residuals: None,
            residual_variance: None,
            aic: None,
            bic: None,
            origin: None,
        }
    }

    /// Order specification.
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// AR coefficients.
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar
    }

    /// MA coefficients.
    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma
    }

    /// Intercept.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Akaike information criterion.
    pub fn aic(&self) -> Option<f64> {
        self.aic
    }

    /// Bayesian information criterion.
    pub fn bic(&self) -> Option<f64> {
        self.bic
    }

    /// Conditional sum of squared errors for candidate parameters.
    fn css(diff: &[f64], p: usize, q: usize, ar: &[f64], ma: &[f64], intercept: f64) -> f64 {
        let n = diff.len();
        let start = p.max(q);
        if n <= start {
            return f64::MAX;
        }

        let mut residuals = vec![0.0; n];
        let mut total = 0.0;

        for t in start..n {
            let mut pred = intercept;
            for i in 0..p {
                pred += ar[i] * (diff[t - 1 - i] - intercept);
            }
            for i in 0..q {
                pred += ma[i] * residuals[t - 1 - i];
            }

            let error = diff[t] - pred;
            residuals[t] = error;
            total += error * error;
        }

        total
    }

    /// Estimate intercept, AR and MA coefficients by CSS minimization.
    fn estimate_parameters(&mut self, diff: &[f64]) {
        let p = self.order.p;
        let q = self.order.q;
        let mean = diff.iter().sum::<f64>() / diff.len() as f64;

        if p == 0 && q == 0 {
            self.intercept = mean;
            self.ar = vec![];
            self.ma = vec![];
            return;
        }

        let mut initial = vec![0.0; p + q + 1];
        initial[0] = mean;
        for i in 0..p {
            initial[1 + i] = 0.1 / (i + 1) as f64;
        }
        for i in 0..q {
            initial[1 + p + i] = 0.1 / (i + 1) as f64;
        }

        // Keep AR/MA coefficients inside the stationarity/invertibility box.
        let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY)];
        bounds.extend(std::iter::repeat((-0.99, 0.99)).take(p + q));

        let result = nelder_mead(
            |params| {
                let intercept = params[0];
                let ar = &params[1..1 + p];
                let ma = &params[1 + p..];
                Self::css(diff, p, q, ar, ma, intercept)
            },
            &initial,
            Some(&bounds),
            NelderMeadConfig::default(),
        );

        self.intercept = result.optimal_point[0];
        self.ar = result.optimal_point[1..1 + p].to_vec();
        self.ma = result.optimal_point[1 + p..].to_vec();
    }

    /// Compute fitted values, residuals and information criteria.
    fn calculate_fitted(&mut self, diff: &[f64]) {
        let n = diff.len();
        let p = self.order.p;
        let q = self.order.q;
        let start = p.max(q);

        let mut fitted = vec![f64::NAN; n];
        let mut residuals = vec![0.0; n];

        for t in start..n {
            let mut pred = self.intercept;
            for i in 0..p {
                pred += self.ar[i] * (diff[t - 1 - i] - self.intercept);
            }
            for i in 0..q {
                pred += self.ma[i] * residuals[t - 1 - i];
            }

            fitted[t] = pred;
            residuals[t] = diff[t] - pred;
        }

        let valid = &residuals[start..];
        if !valid.is_empty() {
            let variance = valid.iter().map(|r| r * r).sum::<f64>() / valid.len() as f64;
            self.residual_variance = Some(variance);

            let n_eff = valid.len() as f64;
            let k = self.order.num_params() as f64;
            let ll = -0.5 * n_eff * (1.0 + variance.ln() + (2.0 * std::f64::consts::PI).ln());
            self.aic = Some(-2.0 * ll + 2.0 * k);
            self.bic = Some(-2.0 * ll + k * n_eff.ln());
        }

        self.fitted_diff = Some(fitted);
        self.residuals = Some(residuals);
    }

    /// ψ-weights of the process on the original (undifferenced) scale.
    ///
    /// The AR polynomial is composed with `(1-B)^d`; the recursion then
    /// yields the MA(∞) coefficients used for forecast-error variance.
    fn psi_weights(&self, horizon: usize) -> Vec<f64> {
        let phi = compose_ar_with_differencing(&self.ar, self.order.d);
        let q = self.order.q;

        let mut psi = vec![0.0; horizon];
        if horizon == 0 {
            return psi;
        }
        psi[0] = 1.0;
        for j in 1..horizon {
            let mut weight = if j <= q { self.ma[j - 1] } else { 0.0 };
            for i in 1..=phi.len().min(j) {
                weight += phi[i - 1] * psi[j - i];
            }
            psi[j] = weight;
        }
        psi
    }
}

/// Coefficients φ* of the composed polynomial
/// `(1 - Σ φ_i B^i)(1 - B)^d = 1 - Σ φ*_i B^i`.
fn compose_ar_with_differencing(ar: &[f64], d: usize) -> Vec<f64> {
    let mut poly = Vec::with_capacity(ar.len() + d + 1);
    poly.push(1.0);
    poly.extend(ar.iter().map(|c| -c));

    for _ in 0..d {
        let mut next = vec![0.0; poly.len() + 1];
        for (i, &c) in poly.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c;
        }
        poly = next;
    }

    poly.iter().skip(1).map(|c| -c).collect()
}

impl Default for Arima {
    fn default() -> Self {
        Self::with_order(ArimaOrder::default())
    }
}

impl Forecaster for Arima {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let values = series.values();
        let min_len = self.order.min_observations();
        if values.len() < min_len {
            return Err(ForecastError::InsufficientData {
                needed: min_len,
                got: values.len(),
            });
        }

        self.original = Some(values.to_vec());
        self.origin = series.last_date();

        let diff = difference(values, self.order.d);
        self.estimate_parameters(&diff);
        self.calculate_fitted(&diff);
        self.differenced = Some(diff);

        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let original = self.original.as_ref().ok_or(ForecastError::FitRequired)?;
        let diff = self.differenced.as_ref().ok_or(ForecastError::FitRequired)?;
        let residuals = self.residuals.as_ref().ok_or(ForecastError::FitRequired)?;
        let origin = self.origin.ok_or(ForecastError::FitRequired)?;

        if horizon == 0 {
            return Ok(Forecast::new());
        }

        let p = self.order.p;
        let q = self.order.q;

        // Recursive forecast on the differenced scale; future shocks are
        // zero, so MA terms fade out after q steps.
        let mut extended = diff.clone();
        let mut extended_residuals = residuals.clone();

        for _ in 0..horizon {
            let t = extended.len();
            let mut pred = self.intercept;
            for i in 0..p {
                pred += self.ar[i] * (extended[t - 1 - i] - self.intercept);
            }
            for i in 0..q {
                pred += self.ma[i] * extended_residuals[t - 1 - i];
            }
            extended.push(pred);
            extended_residuals.push(0.0);
        }

        let forecast_diff = &extended[diff.len()..];
        let point = if self.order.d > 0 {
            integrate(forecast_diff, original, self.order.d)
        } else {
            forecast_diff.to_vec()
        };

        Forecast::from_points(forecast_dates(origin, horizon), point)
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let forecast = self.predict(horizon)?;
        if horizon == 0 {
            return Ok(forecast);
        }

        let variance = self.residual_variance.unwrap_or(0.0);
        let z = quantile_normal((1.0 + level) / 2.0);
        let psi = self.psi_weights(horizon);

        let point = forecast.point().to_vec();
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);

        let mut cumulative = 0.0;
        for h in 0..horizon {
            cumulative += psi[h] * psi[h];
            let se = (variance * cumulative).sqrt();
            lower.push(point[h] - z * se);
            upper.push(point[h] + z * se);
        }

        Forecast::with_intervals(forecast.dates().to_vec(), point, lower, upper)
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted_diff.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "ARIMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::Days;

    fn make_series(values: Vec<f64>) -> TimeSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates = (0..values.len()).map(|i| base + Days::new(i as u64)).collect();
        TimeSeries::new(dates, values).unwrap()
    }

    #[test]
    fn fits_trend_with_differencing() {
        let values: Vec<f64> = (0..50).map(|i| 10.0 + 2.0 * i as f64).collect();
        let ts = make_series(values.clone());

        let mut model = Arima::new(1, 1, 0);
        model.fit(&ts).unwrap();

        // A pure trend differences to a constant near the step size.
        assert!((model.intercept() - 2.0).abs() < 0.5);
        assert_eq!(model.ar_coefficients().len(), 1);
        assert!(model.ma_coefficients().is_empty());

        let forecast = model.predict(5).unwrap();
        assert!(forecast.point()[0] > values.last().unwrap() - 5.0);
        assert!(forecast.point()[4] > forecast.point()[0]);
    }

    #[test]
    fn default_order_is_engine_standard() {
        let model = Arima::default();
        assert_eq!(model.order(), ArimaOrder::new(5, 1, 0));
        assert_eq!(model.order().num_params(), 6);
        assert_eq!(model.order().min_observations(), 8);
    }

    #[test]
    fn fits_ar_process() {
        // y_t = 0.7 * y_{t-1} + deterministic wiggle
        let mut values = vec![10.0];
        for i in 1..100 {
            values.push(0.7 * values[i - 1] + (i as f64 * 0.1).sin());
        }
        let ts = make_series(values);

        let mut model = Arima::new(1, 0, 0);
        model.fit(&ts).unwrap();

        assert!(model.ar_coefficients()[0] > 0.3);
        assert_eq!(model.predict(5).unwrap().horizon(), 5);
    }

    #[test]
    fn interval_width_grows_with_horizon() {
        let values: Vec<f64> = (0..60)
            .map(|i| 10.0 + 0.5 * i as f64 + (i as f64 * 0.3).sin())
            .collect();
        let ts = make_series(values);

        let mut model = Arima::new(5, 1, 0);
        model.fit(&ts).unwrap();

        let forecast = model.predict_with_intervals(10, 0.95).unwrap();
        let (lower, upper) = forecast.band().unwrap();
        let point = forecast.point();

        let mut previous_width = 0.0;
        for i in 0..10 {
            assert!(lower[i] <= point[i]);
            assert!(point[i] <= upper[i]);
            let width = upper[i] - lower[i];
            assert!(width >= previous_width - 1e-12);
            previous_width = width;
        }
        assert!(previous_width > upper[0] - lower[0]);
    }

    #[test]
    fn random_walk_interval_scales_with_sqrt_horizon() {
        // ARIMA(0,1,0): every psi weight is 1, so the standard error at
        // step h is sigma * sqrt(h).
        let mut values = vec![50.0];
        for i in 1..80 {
            values.push(values[i - 1] + if i % 2 == 0 { 1.0 } else { -0.6 });
        }
        let ts = make_series(values);

        let mut model = Arima::new(0, 1, 0);
        model.fit(&ts).unwrap();

        let forecast = model.predict_with_intervals(4, 0.95).unwrap();
        let (lower, upper) = forecast.band().unwrap();

        let width_1 = upper[0] - lower[0];
        let width_4 = upper[3] - lower[3];
        assert!(width_1 > 0.0);
        assert_relative_eq!(width_4 / width_1, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn psi_weights_compose_ar_and_differencing() {
        let mut model = Arima::new(1, 1, 0);
        model.ar = vec![0.5];

        // phi* of (1 - 0.5B)(1 - B) = 1 - 1.5B + 0.5B^2
        let phi = compose_ar_with_differencing(&model.ar, 1);
        assert_relative_eq!(phi[0], 1.5, epsilon = 1e-12);
        assert_relative_eq!(phi[1], -0.5, epsilon = 1e-12);

        let psi = model.psi_weights(4);
        assert_relative_eq!(psi[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(psi[1], 1.5, epsilon = 1e-12);
        assert_relative_eq!(psi[2], 1.5 * 1.5 - 0.5, epsilon = 1e-12);
        assert_relative_eq!(psi[3], 1.5 * psi[2] - 0.5 * psi[1], epsilon = 1e-12);
    }

    #[test]
    fn information_criteria_available_after_fit() {
        let values: Vec<f64> = (0..50).map(|i| 10.0 + (i as f64 * 0.3).sin()).collect();
        let ts = make_series(values);

        let mut model = Arima::new(1, 0, 1);
        model.fit(&ts).unwrap();

        assert!(model.aic().is_some());
        assert!(model.bic().is_some());
        assert!(model.bic().unwrap() >= model.aic().unwrap());
    }

    #[test]
    fn forecast_dates_follow_series_end() {
        let values: Vec<f64> = (0..30).map(|i| i as f64 + (i as f64).cos()).collect();
        let ts = make_series(values);
        let last = ts.last_date().unwrap();

        let mut model = Arima::new(2, 1, 0);
        model.fit(&ts).unwrap();

        let forecast = model.predict(3).unwrap();
        assert_eq!(forecast.dates()[0], last + Days::new(1));
        assert_eq!(forecast.dates()[2], last + Days::new(3));
    }

    #[test]
    fn insufficient_data() {
        let ts = make_series(vec![1.0, 2.0, 3.0]);
        let mut model = Arima::new(5, 1, 0);
        assert!(matches!(
            model.fit(&ts),
            Err(ForecastError::InsufficientData { needed: 8, got: 3 })
        ));
    }

    #[test]
    fn requires_fit_before_predict() {
        let model = Arima::new(1, 1, 1);
        assert!(matches!(model.predict(5), Err(ForecastError::FitRequired)));
    }

    #[test]
    fn zero_horizon() {
        let values: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let ts = make_series(values);

        let mut model = Arima::new(1, 1, 0);
        model.fit(&ts).unwrap();

        assert_eq!(model.predict(0).unwrap().horizon(), 0);
    }

    #[test]
    fn ma_only_model_fits() {
        let values: Vec<f64> = (0..100).map(|i| 10.0 + (i as f64 * 0.2).sin()).collect();
        let ts = make_series(values);

        let mut model = Arima::new(0, 0, 1);
        model.fit(&ts).unwrap();

        let forecast = model.predict_with_intervals(5, 0.95).unwrap();
        assert_eq!(forecast.horizon(), 5);
        assert!(forecast.has_intervals());
    }
}
