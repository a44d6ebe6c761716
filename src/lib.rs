//! # forecast-select
//!
//! Model selection for autoregressive time series forecasters: rolling-origin
//! split generation, cross-validation, single-fit backtesting and exhaustive
//! grid search over lag windows and hyperparameters.
//!
//! The evaluators are polymorphic over the [`forecaster::Forecaster`]
//! capability set; [`models::AutoregLinear`] ships as a conforming linear
//! autoregressive implementation.
//!
//! ```
//! use forecast_select::prelude::*;
//!
//! let y: Vec<f64> = (0..40).map(|i| (i as f64 * 0.3).sin() + i as f64).collect();
//! let mut model = AutoregLinear::new(Lags::upto(2).unwrap());
//!
//! let metric: Metric = "neg_mean_absolute_error".parse().unwrap();
//! let config = EvaluationConfig::new(30, 5, metric);
//! let fold_errors = cv_evaluate(&mut model, &y, None, &config).unwrap();
//! assert_eq!(fold_errors.len(), 2);
//! ```

pub mod error;
pub mod evaluation;
pub mod forecaster;
pub mod metrics;
pub mod models;
pub mod search;
pub mod split;

pub use error::{Result, SelectionError};

pub mod prelude {
    pub use crate::error::{Result, SelectionError};
    pub use crate::evaluation::{backtest_evaluate, cv_evaluate, BacktestResult, EvaluationConfig};
    pub use crate::forecaster::{Forecaster, Lags, ParamGrid, ParamSet, ParamValue};
    pub use crate::metrics::Metric;
    pub use crate::models::AutoregLinear;
    pub use crate::search::{grid_search, SearchConfig, SearchMethod, TrialResult};
    pub use crate::split::{generate_splits, Fold, RollingOriginSplits};
}
