//! Cross-validation and backtesting evaluators.
//!
//! Both strategies walk the rolling-origin folds of [`crate::split`] but
//! differ in how often the model is trained: cross-validation refits on
//! every fold, backtesting fits once on the initial window and afterwards
//! predicts from reconstructed trailing windows.

use crate::error::{Result, SelectionError};
use crate::forecaster::Forecaster;
use crate::metrics::Metric;
use crate::split::generate_splits;

/// Shared configuration for both evaluation strategies.
#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    /// Number of observations in the initial training window.
    pub initial_train_size: usize,
    /// Forecast horizon of each fold.
    pub steps: usize,
    /// Error metric scoring the predictions.
    pub metric: Metric,
    /// Whether a truncated final fold is evaluated (cross-validation only;
    /// backtesting always consumes the remainder).
    pub allow_incomplete_fold: bool,
}

impl EvaluationConfig {
    /// Create a configuration evaluating the truncated final fold.
    pub fn new(initial_train_size: usize, steps: usize, metric: Metric) -> Self {
        Self {
            initial_train_size,
            steps,
            metric,
            allow_incomplete_fold: true,
        }
    }

    /// Set the incomplete-fold policy.
    pub fn with_incomplete_fold(mut self, allow: bool) -> Self {
        self.allow_incomplete_fold = allow;
        self
    }
}

/// Outcome of a backtesting run.
#[derive(Debug, Clone)]
pub struct BacktestResult {
    /// Single metric value over all concatenated predictions.
    pub metric_value: f64,
    /// Predictions for `y[initial_train_size..]`, in temporal order.
    pub predictions: Vec<f64>,
}

/// Validate and normalize series and exogenous data through the
/// forecaster's own capabilities, checking alignment eagerly so malformed
/// input is reported before any fitting starts.
fn prepare_data<F: Forecaster>(
    forecaster: &F,
    y: &[f64],
    exog: Option<&[f64]>,
) -> Result<(Vec<f64>, Option<Vec<f64>>)> {
    forecaster.validate_series(y)?;
    let y = forecaster.preprocess_series(y)?;

    let exog = match exog {
        Some(e) => {
            forecaster.validate_exog(e)?;
            if e.len() != y.len() {
                return Err(SelectionError::DimensionMismatch {
                    expected: y.len(),
                    got: e.len(),
                });
            }
            Some(forecaster.preprocess_exog(e)?)
        }
        None => None,
    };

    Ok((y, exog))
}

/// Rolling-origin cross-validation.
///
/// For every fold the forecaster is refit on the training window and asked
/// for a forecast spanning the test window; the metric is computed per fold
/// and the unaggregated sequence returned. A failing fold aborts the whole
/// evaluation.
///
/// # Example
/// ```
/// use forecast_select::evaluation::{cv_evaluate, EvaluationConfig};
/// use forecast_select::forecaster::Lags;
/// use forecast_select::metrics::Metric;
/// use forecast_select::models::AutoregLinear;
///
/// let y: Vec<f64> = (0..30).map(|i| i as f64).collect();
/// let mut model = AutoregLinear::new(Lags::upto(2).unwrap());
/// let config = EvaluationConfig::new(20, 5, Metric::MeanAbsoluteError);
///
/// let fold_errors = cv_evaluate(&mut model, &y, None, &config).unwrap();
/// assert_eq!(fold_errors.len(), 2);
/// ```
pub fn cv_evaluate<F: Forecaster>(
    forecaster: &mut F,
    y: &[f64],
    exog: Option<&[f64]>,
    config: &EvaluationConfig,
) -> Result<Vec<f64>> {
    let (y, exog) = prepare_data(forecaster, y, exog)?;

    let splits = generate_splits(
        y.len(),
        config.initial_train_size,
        config.steps,
        config.allow_incomplete_fold,
    )?;

    let mut cv_results = Vec::with_capacity(splits.n_folds());

    for fold in splits {
        let train_y = &y[fold.train.clone()];
        let train_exog = exog.as_ref().map(|e| &e[fold.train.clone()]);
        forecaster.fit(train_y, train_exog)?;

        let test_exog = exog.as_ref().map(|e| &e[fold.test.clone()]);
        let pred = forecaster.predict(fold.test_len(), None, test_exog)?;

        let value = config.metric.compute(&y[fold.test.clone()], &pred)?;
        cv_results.push(value);
    }

    Ok(cv_results)
}

/// Single-fit backtesting.
///
/// The forecaster is trained exactly once on the initial window. Each
/// subsequent fold is predicted from the trailing `max_lag` observations
/// preceding its test window, without refitting. The final fold uses an
/// effective test length equal to the remainder and is skipped entirely
/// when the remainder is zero; there is no incomplete-fold toggle on this
/// path. All predictions are concatenated and scored once against
/// `y[initial_train_size..]`.
pub fn backtest_evaluate<F: Forecaster>(
    forecaster: &mut F,
    y: &[f64],
    exog: Option<&[f64]>,
    config: &EvaluationConfig,
) -> Result<BacktestResult> {
    let (y, exog) = prepare_data(forecaster, y, exog)?;

    let n = y.len();
    let initial = config.initial_train_size;
    if config.steps == 0 {
        return Err(SelectionError::InvalidConfiguration(
            "steps must be positive".to_string(),
        ));
    }
    if initial == 0 || initial >= n {
        return Err(SelectionError::InvalidConfiguration(format!(
            "initial_train_size ({}) must be in 1..{} for backtesting",
            initial, n
        )));
    }
    let max_lag = forecaster.max_lag();
    if max_lag > initial {
        return Err(SelectionError::InvalidConfiguration(format!(
            "initial_train_size ({}) is smaller than max_lag ({}); the first \
             trailing window cannot be reconstructed",
            initial, max_lag
        )));
    }

    forecaster.fit(&y[..initial], exog.as_ref().map(|e| &e[..initial]))?;

    let folds = (n - initial) / config.steps + 1;
    let remainder = (n - initial) % config.steps;

    let mut predictions = Vec::with_capacity(n - initial);

    for i in 0..folds {
        let effective_test_length = if i < folds - 1 {
            config.steps
        } else if remainder != 0 {
            remainder
        } else {
            continue;
        };

        let window_end = initial + i * config.steps;
        let last_window = &y[window_end - max_lag..window_end];
        let fold_exog = exog
            .as_ref()
            .map(|e| &e[window_end..window_end + effective_test_length]);

        let pred = forecaster.predict(effective_test_length, Some(last_window), fold_exog)?;
        if pred.len() != effective_test_length {
            return Err(SelectionError::DimensionMismatch {
                expected: effective_test_length,
                got: pred.len(),
            });
        }
        predictions.extend_from_slice(&pred);
    }

    let metric_value = config.metric.compute(&y[initial..], &predictions)?;

    Ok(BacktestResult {
        metric_value,
        predictions,
    })
}
