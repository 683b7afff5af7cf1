//! Property-based tests for the forecast engine.
//!
//! These verify invariants that should hold for any valid input series:
//! forecast length, date contiguity, bound ordering and the interval
//! width shapes of the two models.

use chrono::{Days, NaiveDate};
use fincast::core::TimeSeries;
use fincast::engine::{forecast, ForecastModel, ForecastRequest};
use proptest::prelude::*;

/// Build a contiguous daily series from values.
fn make_ts(values: &[f64]) -> TimeSeries {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let dates = (0..values.len())
        .map(|i| base + Days::new(i as u64))
        .collect();
    TimeSeries::new(dates, values.to_vec()).unwrap()
}

/// Strategy for trending series with a deterministic wiggle.
///
/// The non-zero slope guarantees the series is never constant, and the
/// value range avoids numerical extremes.
fn trending_values_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len).prop_flat_map(|len| {
        (10.0..100.0_f64, 0.1..2.0_f64).prop_map(move |(base, slope)| {
            (0..len)
                .map(|i| base + slope * i as f64 + (i as f64 * 0.7).sin())
                .collect()
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn holt_winters_length_matches_horizon(
        values in trending_values_strategy(20, 80),
        horizon in 1usize..=20
    ) {
        let ts = make_ts(&values);
        let result = forecast(&ts, &ForecastRequest::new(ForecastModel::HoltWinters, horizon)).unwrap();
        prop_assert_eq!(result.horizon(), horizon);
    }

    #[test]
    fn arima_length_matches_horizon(
        values in trending_values_strategy(20, 80),
        horizon in 1usize..=20
    ) {
        let ts = make_ts(&values);
        let result = forecast(&ts, &ForecastRequest::new(ForecastModel::Arima, horizon)).unwrap();
        prop_assert_eq!(result.horizon(), horizon);
    }

    #[test]
    fn forecast_dates_contiguously_follow_series(
        values in trending_values_strategy(20, 60),
        horizon in 1usize..=15
    ) {
        let ts = make_ts(&values);
        let last = ts.last_date().unwrap();

        for model in [ForecastModel::HoltWinters, ForecastModel::Arima] {
            let result = forecast(&ts, &ForecastRequest::new(model, horizon)).unwrap();
            let dates = result.dates();

            prop_assert_eq!(dates[0], last + Days::new(1));
            for pair in dates.windows(2) {
                prop_assert_eq!(pair[0].succ_opt(), Some(pair[1]));
            }
        }
    }

    #[test]
    fn bounds_bracket_point_forecasts(
        values in trending_values_strategy(20, 60),
        horizon in 1usize..=15
    ) {
        let ts = make_ts(&values);

        for model in [ForecastModel::HoltWinters, ForecastModel::Arima] {
            let result = forecast(&ts, &ForecastRequest::new(model, horizon)).unwrap();
            let (lower, upper) = result.band().unwrap();
            let point = result.point();

            for i in 0..horizon {
                prop_assert!(lower[i] <= point[i]);
                prop_assert!(point[i] <= upper[i]);
            }
        }
    }

    #[test]
    fn holt_winters_interval_width_is_constant(
        values in trending_values_strategy(20, 60),
        horizon in 2usize..=15
    ) {
        let ts = make_ts(&values);
        let result = forecast(&ts, &ForecastRequest::new(ForecastModel::HoltWinters, horizon)).unwrap();
        let (lower, upper) = result.band().unwrap();

        let first_width = upper[0] - lower[0];
        for i in 1..horizon {
            let width = upper[i] - lower[i];
            prop_assert!((width - first_width).abs() <= 1e-9 * first_width.max(1.0));
        }
    }

    #[test]
    fn arima_interval_width_is_non_decreasing(
        values in trending_values_strategy(20, 60),
        horizon in 2usize..=15
    ) {
        let ts = make_ts(&values);
        let result = forecast(&ts, &ForecastRequest::new(ForecastModel::Arima, horizon)).unwrap();
        let (lower, upper) = result.band().unwrap();

        let mut previous = upper[0] - lower[0];
        for i in 1..horizon {
            let width = upper[i] - lower[i];
            prop_assert!(width >= previous - 1e-9);
            previous = width;
        }
    }

    #[test]
    fn gapped_series_still_forecasts(
        values in trending_values_strategy(25, 50),
        stride in 2usize..5,
        horizon in 1usize..=10
    ) {
        // Drop every stride-th observation; the engine regularizes the
        // grid with forward fill before fitting.
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut dates = Vec::new();
        let mut kept = Vec::new();
        for (i, &v) in values.iter().enumerate() {
            if i % stride == stride - 1 && i + 1 != values.len() {
                continue;
            }
            dates.push(base + Days::new(i as u64));
            kept.push(v);
        }
        let ts = TimeSeries::new(dates, kept).unwrap();

        for model in [ForecastModel::HoltWinters, ForecastModel::Arima] {
            let result = forecast(&ts, &ForecastRequest::new(model, horizon)).unwrap();
            prop_assert_eq!(result.horizon(), horizon);
            prop_assert_eq!(result.dates()[0], ts.last_date().unwrap() + Days::new(1));
        }
    }
}
