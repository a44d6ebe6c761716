//! Error metrics for forecast evaluation.
//!
//! The registry keys carry a `neg_` prefix for compatibility with the
//! scikit-learn scoring convention, but no sign flip is ever applied:
//! every metric is a plain error measure where lower is better.

use crate::error::{Result, SelectionError};
use std::fmt;
use std::str::FromStr;

/// Closed set of supported error metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Mean of squared errors.
    MeanSquaredError,
    /// Mean of absolute errors.
    MeanAbsoluteError,
    /// Mean of absolute errors relative to the true values.
    MeanAbsolutePercentageError,
}

impl Metric {
    /// Registry key under which this metric is known.
    pub fn key(&self) -> &'static str {
        match self {
            Metric::MeanSquaredError => "neg_mean_squared_error",
            Metric::MeanAbsoluteError => "neg_mean_absolute_error",
            Metric::MeanAbsolutePercentageError => "neg_mean_absolute_percentage_error",
        }
    }

    /// Compute the metric value between true and predicted values.
    ///
    /// # Errors
    /// `InvalidInput` if the slices are empty, `DimensionMismatch` if their
    /// lengths differ.
    pub fn compute(&self, y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
        if y_true.is_empty() || y_pred.is_empty() {
            return Err(SelectionError::InvalidInput(
                "cannot compute a metric on empty data".to_string(),
            ));
        }
        if y_true.len() != y_pred.len() {
            return Err(SelectionError::DimensionMismatch {
                expected: y_true.len(),
                got: y_pred.len(),
            });
        }

        let n = y_true.len() as f64;
        let value = match self {
            Metric::MeanSquaredError => {
                y_true
                    .iter()
                    .zip(y_pred.iter())
                    .map(|(a, p)| (a - p).powi(2))
                    .sum::<f64>()
                    / n
            }
            Metric::MeanAbsoluteError => {
                y_true
                    .iter()
                    .zip(y_pred.iter())
                    .map(|(a, p)| (a - p).abs())
                    .sum::<f64>()
                    / n
            }
            Metric::MeanAbsolutePercentageError => {
                // Zero true values are clamped to machine epsilon rather
                // than rejected, matching the reference scorer.
                y_true
                    .iter()
                    .zip(y_pred.iter())
                    .map(|(a, p)| (a - p).abs() / a.abs().max(f64::EPSILON))
                    .sum::<f64>()
                    / n
            }
        };

        Ok(value)
    }
}

impl FromStr for Metric {
    type Err = SelectionError;

    fn from_str(key: &str) -> Result<Self> {
        match key {
            "neg_mean_squared_error" => Ok(Metric::MeanSquaredError),
            "neg_mean_absolute_error" => Ok(Metric::MeanAbsoluteError),
            "neg_mean_absolute_percentage_error" => Ok(Metric::MeanAbsolutePercentageError),
            other => Err(SelectionError::UnknownMetric(other.to_string())),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
