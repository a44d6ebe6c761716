//! Exhaustive hyperparameter and lag-window search.
//!
//! Every (lags, params) combination is scored through cross-validation or
//! backtesting and the trials are ranked ascending by metric value. Trials
//! run sequentially against one shared forecaster; anyone parallelizing
//! this must give each trial its own forecaster instance.

use crate::error::{Result, SelectionError};
use crate::evaluation::{backtest_evaluate, cv_evaluate, EvaluationConfig};
use crate::forecaster::{Forecaster, Lags, ParamGrid, ParamSet};
use log::{debug, info};

/// Strategy used to score each trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMethod {
    /// Refit per fold; thorough but slow.
    #[default]
    CrossValidation,
    /// Single fit with rolling no-refit predictions; much faster.
    Backtesting,
}

/// Configuration for [`grid_search`].
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Fold layout and metric shared with the evaluators.
    pub evaluation: EvaluationConfig,
    /// Scoring strategy per trial.
    pub method: SearchMethod,
    /// Lag candidates; defaults to the forecaster's current lags.
    pub lags_grid: Option<Vec<Lags>>,
    /// Refit the forecaster on the full series with the best combination.
    pub return_best: bool,
}

impl SearchConfig {
    pub fn new(evaluation: EvaluationConfig) -> Self {
        Self {
            evaluation,
            method: SearchMethod::default(),
            lags_grid: None,
            return_best: true,
        }
    }

    pub fn with_method(mut self, method: SearchMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_lags_grid(mut self, lags_grid: Vec<Lags>) -> Self {
        self.lags_grid = Some(lags_grid);
        self
    }

    pub fn with_return_best(mut self, return_best: bool) -> Self {
        self.return_best = return_best;
        self
    }
}

/// One ranked grid-search trial.
#[derive(Debug, Clone)]
pub struct TrialResult {
    /// Lags actually used, after forecaster normalization.
    pub lags: Lags,
    /// Hyperparameter combination of this trial.
    pub params: ParamSet,
    /// Mean metric value across folds; lower is better.
    pub metric_value: f64,
}

/// Expand a parameter grid into the full Cartesian product of combinations.
///
/// Keys are visited in sorted order and the last key varies fastest, so the
/// enumeration is stable and deterministic. An empty grid expands to one
/// empty combination.
///
/// # Errors
/// `InvalidConfiguration` if any key has no candidate values.
pub fn expand_param_grid(grid: &ParamGrid) -> Result<Vec<ParamSet>> {
    for (name, candidates) in grid {
        if candidates.is_empty() {
            return Err(SelectionError::InvalidConfiguration(format!(
                "param_grid entry '{}' has no candidate values",
                name
            )));
        }
    }

    let mut combinations = vec![ParamSet::new()];
    for (name, candidates) in grid {
        let mut expanded = Vec::with_capacity(combinations.len() * candidates.len());
        for combo in &combinations {
            for value in candidates {
                let mut next = combo.clone();
                next.insert(name.clone(), value.clone());
                expanded.push(next);
            }
        }
        combinations = expanded;
    }

    Ok(combinations)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Exhaustive search over lag and hyperparameter candidates.
///
/// The outer loop sets each lag candidate on the forecaster, the inner loop
/// applies each parameter combination, and every pair is scored by the mean
/// fold metric of the configured evaluation method. Results are sorted
/// ascending by metric value. With `return_best` the forecaster is left
/// configured with the winning combination and refitted on the full series;
/// that is the only side effect beyond the returned table. A failing trial
/// aborts the whole search.
pub fn grid_search<F: Forecaster>(
    forecaster: &mut F,
    y: &[f64],
    exog: Option<&[f64]>,
    param_grid: &ParamGrid,
    config: &SearchConfig,
) -> Result<Vec<TrialResult>> {
    forecaster.validate_series(y)?;
    if let Some(e) = exog {
        forecaster.validate_exog(e)?;
        if e.len() != y.len() {
            return Err(SelectionError::DimensionMismatch {
                expected: y.len(),
                got: e.len(),
            });
        }
    }

    let lags_grid = match &config.lags_grid {
        Some(grid) if grid.is_empty() => {
            return Err(SelectionError::InvalidConfiguration(
                "lags_grid must not be empty".to_string(),
            ));
        }
        Some(grid) => grid.clone(),
        None => vec![forecaster.lags().clone()],
    };

    let combinations = expand_param_grid(param_grid)?;

    let mut results = Vec::with_capacity(lags_grid.len() * combinations.len());

    for lags in lags_grid {
        forecaster.set_lags(lags);

        for params in &combinations {
            forecaster.set_params(params)?;

            let metric_value = match config.method {
                SearchMethod::CrossValidation => {
                    let fold_metrics = cv_evaluate(forecaster, y, exog, &config.evaluation)?;
                    mean(&fold_metrics)
                }
                SearchMethod::Backtesting => {
                    backtest_evaluate(forecaster, y, exog, &config.evaluation)?.metric_value
                }
            };

            debug!(
                "trial lags={} params={:?} {}={}",
                forecaster.lags(),
                params,
                config.evaluation.metric,
                metric_value
            );

            results.push(TrialResult {
                lags: forecaster.lags().clone(),
                params: params.clone(),
                metric_value,
            });
        }
    }

    results.sort_by(|a, b| a.metric_value.total_cmp(&b.metric_value));

    // Non-empty by construction: lags_grid was checked and grid expansion
    // yields at least one combination.
    if let (true, Some(best)) = (config.return_best, results.first().cloned()) {
        info!(
            "refitting {} on the full series with best lags={} params={:?}",
            forecaster.name(),
            best.lags,
            best.params
        );
        forecaster.set_lags(best.lags);
        forecaster.set_params(&best.params)?;
        forecaster.fit(y, exog)?;
    }

    Ok(results)
}
