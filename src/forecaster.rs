//! Forecaster capability set and hyperparameter value types.
//!
//! The evaluation and search routines are polymorphic over the
//! [`Forecaster`] trait: any model exposing validation, fit, recursive
//! predict and lag/parameter mutation can be evaluated and tuned.

use crate::error::{Result, SelectionError};
use std::collections::BTreeMap;
use std::fmt;

/// Validated, normalized set of autoregressive lags.
///
/// Lags are 1-based offsets into the past: lag 1 is the immediately
/// preceding observation. Construction sorts, deduplicates and rejects
/// empty sets or a zero lag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lags(Vec<usize>);

impl Lags {
    /// Build a lag set from explicit offsets.
    pub fn new(lags: Vec<usize>) -> Result<Self> {
        if lags.is_empty() {
            return Err(SelectionError::InvalidConfiguration(
                "lag set must not be empty".to_string(),
            ));
        }
        if lags.contains(&0) {
            return Err(SelectionError::InvalidConfiguration(
                "lags must be >= 1".to_string(),
            ));
        }
        let mut lags = lags;
        lags.sort_unstable();
        lags.dedup();
        Ok(Self(lags))
    }

    /// Build the contiguous lag set `1..=n`.
    pub fn upto(n: usize) -> Result<Self> {
        Self::new((1..=n).collect())
    }

    /// Largest lag; the minimum trailing-window length needed to predict
    /// without refitting.
    pub fn max_lag(&self) -> usize {
        *self.0.last().expect("lag set is never empty")
    }

    /// Lag offsets in ascending order.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Number of lags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Lags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, lag) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", lag)?;
        }
        write!(f, "]")
    }
}

/// A single hyperparameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Float(f64),
    Int(i64),
    Bool(bool),
    Text(String),
}

impl ParamValue {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Boolean view of the value, if it has one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Bool(v) => write!(f, "{}", v),
            ParamValue::Text(v) => write!(f, "{}", v),
        }
    }
}

/// One concrete hyperparameter combination, keyed by parameter name.
///
/// A `BTreeMap` keeps iteration order deterministic, which grid expansion
/// and result reporting rely on.
pub type ParamSet = BTreeMap<String, ParamValue>;

/// Candidate values per hyperparameter name.
pub type ParamGrid = BTreeMap<String, Vec<ParamValue>>;

/// Common interface for autoregressive forecasting models.
///
/// The evaluators borrow the forecaster mutably and drive its lifecycle:
/// `fit` resets learned state, `predict` reads it, `set_lags`/`set_params`
/// reconfigure it between trials. Implementations own no evaluation logic.
pub trait Forecaster {
    /// Check that the series is usable: non-empty, all values finite.
    fn validate_series(&self, y: &[f64]) -> Result<()> {
        if y.is_empty() {
            return Err(SelectionError::InvalidInput(
                "series must not be empty".to_string(),
            ));
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(SelectionError::InvalidInput(
                "series contains NaN or infinite values".to_string(),
            ));
        }
        Ok(())
    }

    /// Normalize the series into the model's working representation.
    fn preprocess_series(&self, y: &[f64]) -> Result<Vec<f64>> {
        self.validate_series(y)?;
        Ok(y.to_vec())
    }

    /// Check that the exogenous sequence is usable.
    fn validate_exog(&self, exog: &[f64]) -> Result<()> {
        if exog.is_empty() {
            return Err(SelectionError::InvalidInput(
                "exog must not be empty".to_string(),
            ));
        }
        if exog.iter().any(|v| !v.is_finite()) {
            return Err(SelectionError::InvalidInput(
                "exog contains NaN or infinite values".to_string(),
            ));
        }
        Ok(())
    }

    /// Normalize the exogenous sequence.
    fn preprocess_exog(&self, exog: &[f64]) -> Result<Vec<f64>> {
        self.validate_exog(exog)?;
        Ok(exog.to_vec())
    }

    /// Train on the series, discarding any previously learned state.
    fn fit(&mut self, y: &[f64], exog: Option<&[f64]>) -> Result<()>;

    /// Predict `steps` values ahead.
    ///
    /// With `last_window`, prediction continues from that trailing window
    /// (at least `max_lag` observations) without touching the training
    /// tail; without it, prediction continues from the end of the fitted
    /// series. `exog`, when present, must hold one value per step.
    fn predict(
        &self,
        steps: usize,
        last_window: Option<&[f64]>,
        exog: Option<&[f64]>,
    ) -> Result<Vec<f64>>;

    /// Replace the lag configuration. Clears learned state.
    fn set_lags(&mut self, lags: Lags);

    /// Apply hyperparameters by name. Clears learned state.
    ///
    /// # Errors
    /// `InvalidConfiguration` for unknown names or ill-typed values.
    fn set_params(&mut self, params: &ParamSet) -> Result<()>;

    /// Current lag configuration.
    fn lags(&self) -> &Lags;

    /// Largest configured lag.
    fn max_lag(&self) -> usize {
        self.lags().max_lag()
    }

    /// Model name for logs and reports.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lags_are_sorted_and_deduplicated() {
        let lags = Lags::new(vec![3, 1, 3, 7]).unwrap();
        assert_eq!(lags.as_slice(), &[1, 3, 7]);
        assert_eq!(lags.max_lag(), 7);
        assert_eq!(lags.len(), 3);
    }

    #[test]
    fn lags_upto_is_contiguous() {
        let lags = Lags::upto(4).unwrap();
        assert_eq!(lags.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(lags.max_lag(), 4);
    }

    #[test]
    fn empty_lags_are_rejected() {
        assert!(matches!(
            Lags::new(vec![]),
            Err(SelectionError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Lags::upto(0),
            Err(SelectionError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn zero_lag_is_rejected() {
        assert!(matches!(
            Lags::new(vec![0, 1]),
            Err(SelectionError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn lags_display() {
        let lags = Lags::new(vec![1, 2, 5]).unwrap();
        assert_eq!(lags.to_string(), "[1, 2, 5]");
    }

    #[test]
    fn param_value_views() {
        assert_eq!(ParamValue::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(ParamValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(ParamValue::Bool(true).as_f64(), None);
        assert_eq!(ParamValue::Bool(true).as_bool(), Some(true));
        assert_eq!(ParamValue::Text("x".into()).as_bool(), None);
    }

    #[test]
    fn param_value_display() {
        assert_eq!(ParamValue::Float(0.5).to_string(), "0.5");
        assert_eq!(ParamValue::Int(-2).to_string(), "-2");
        assert_eq!(ParamValue::Bool(false).to_string(), "false");
        assert_eq!(ParamValue::Text("ols".into()).to_string(), "ols");
    }
}
