//! Daily time series data structure.

use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};

/// A univariate time series sampled on calendar days.
///
/// Dates are strictly increasing but not necessarily contiguous; call
/// [`TimeSeries::fill_daily`] to regularize onto the full daily grid
/// before fitting a model. Values may contain NaN/infinity placeholders
/// for observations that failed numeric parsing upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a time series from parallel date and value vectors.
    ///
    /// Dates must be strictly increasing.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: dates.len(),
                got: values.len(),
            });
        }
        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(ForecastError::TimestampError(
                    "dates must be strictly increasing".to_string(),
                ));
            }
        }
        Ok(Self { dates, values })
    }

    /// Create a time series from unordered observations.
    ///
    /// Observations are sorted by date; duplicate dates are rejected.
    pub fn from_observations(mut observations: Vec<(NaiveDate, f64)>) -> Result<Self> {
        observations.sort_by_key(|(date, _)| *date);
        for pair in observations.windows(2) {
            if pair[1].0 == pair[0].0 {
                return Err(ForecastError::TimestampError(format!(
                    "duplicate date: {}",
                    pair[1].0
                )));
            }
        }
        let (dates, values) = observations.into_iter().unzip();
        Self::new(dates, values)
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Observation dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Observation values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// First observation date.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    /// Last observation date.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Check if any value is NaN or infinite.
    pub fn has_missing_values(&self) -> bool {
        self.values.iter().any(|v| !v.is_finite())
    }

    /// Number of finite observations.
    pub fn valid_len(&self) -> usize {
        self.values.iter().filter(|v| v.is_finite()).count()
    }

    /// Check whether every finite value equals the first finite value.
    pub fn is_constant(&self) -> bool {
        let mut finite = self.values.iter().filter(|v| v.is_finite());
        match finite.next() {
            Some(first) => finite.all(|v| v == first),
            None => true,
        }
    }

    /// Check whether the dates form a contiguous daily grid.
    pub fn is_daily_contiguous(&self) -> bool {
        self.dates
            .windows(2)
            .all(|pair| pair[0].succ_opt() == Some(pair[1]))
    }

    /// Regularize onto the full daily grid between the first and last date.
    ///
    /// Missing calendar days are inserted and forward-filled from the last
    /// observed value; non-finite observations are forward-filled the same
    /// way. Leading non-finite values have nothing to fill from and are
    /// kept as NaN.
    pub fn fill_daily(&self) -> TimeSeries {
        if self.len() < 2 {
            return self.clone();
        }

        let mut dates = Vec::with_capacity(self.len());
        let mut values = Vec::with_capacity(self.len());
        let mut last_valid: Option<f64> = None;

        for (&date, &value) in self.dates.iter().zip(self.values.iter()) {
            if let Some(&prev) = dates.last() {
                let mut day = prev + Days::new(1);
                while day < date {
                    dates.push(day);
                    values.push(last_valid.unwrap_or(f64::NAN));
                    day = day + Days::new(1);
                }
            }

            dates.push(date);
            if value.is_finite() {
                last_valid = Some(value);
                values.push(value);
            } else {
                values.push(last_valid.unwrap_or(f64::NAN));
            }
        }

        TimeSeries { dates, values }
    }
}
