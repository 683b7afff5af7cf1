//! Forecast result structure for holding dated predictions.

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;

/// A single forecast row, as consumed by the chart layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastStep {
    pub date: NaiveDate,
    pub point: f64,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

/// A forecast with its own dated index and optional prediction bounds.
///
/// Dates run contiguously from the day after the fitted series' last
/// observation. Bounds are present whenever the forecast was produced
/// with intervals; the engine always produces them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    dates: Vec<NaiveDate>,
    point: Vec<f64>,
    lower: Option<Vec<f64>>,
    upper: Option<Vec<f64>>,
}

impl Forecast {
    /// Create an empty forecast.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a forecast from point predictions only.
    pub fn from_points(dates: Vec<NaiveDate>, point: Vec<f64>) -> Result<Self> {
        if dates.len() != point.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: dates.len(),
                got: point.len(),
            });
        }
        Ok(Self {
            dates,
            point,
            lower: None,
            upper: None,
        })
    }

    /// Create a forecast with prediction bounds.
    pub fn with_intervals(
        dates: Vec<NaiveDate>,
        point: Vec<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
    ) -> Result<Self> {
        for len in [point.len(), lower.len(), upper.len()] {
            if len != dates.len() {
                return Err(ForecastError::DimensionMismatch {
                    expected: dates.len(),
                    got: len,
                });
            }
        }
        Ok(Self {
            dates,
            point,
            lower: Some(lower),
            upper: Some(upper),
        })
    }

    /// Number of forecast steps.
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    /// Check if the forecast is empty.
    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    /// Forecast dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Point predictions.
    pub fn point(&self) -> &[f64] {
        &self.point
    }

    /// Lower bounds, if intervals were produced.
    pub fn lower(&self) -> Option<&[f64]> {
        self.lower.as_deref()
    }

    /// Upper bounds, if intervals were produced.
    pub fn upper(&self) -> Option<&[f64]> {
        self.upper.as_deref()
    }

    /// Check whether prediction bounds are present.
    pub fn has_intervals(&self) -> bool {
        self.lower.is_some() && self.upper.is_some()
    }

    /// The interval band as (lower, upper) slices, for shaded-area rendering.
    pub fn band(&self) -> Option<(&[f64], &[f64])> {
        match (&self.lower, &self.upper) {
            (Some(lower), Some(upper)) => Some((lower, upper)),
            _ => None,
        }
    }

    /// Iterate forecast rows in date order.
    pub fn steps(&self) -> impl Iterator<Item = ForecastStep> + '_ {
        (0..self.horizon()).map(move |i| ForecastStep {
            date: self.dates[i],
            point: self.point[i],
            lower: self.lower.as_ref().map(|l| l[i]),
            upper: self.upper.as_ref().map(|u| u[i]),
        })
    }
}
