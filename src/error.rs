//! Error types for the forecast-select library.

use thiserror::Error;

/// Result type alias for model selection operations.
pub type Result<T> = std::result::Result<T, SelectionError>;

/// Errors that can occur during split generation, evaluation or grid search.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    /// Series or exogenous data violates shape/content requirements.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Dimension mismatch between aligned sequences.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Invalid split, grid or forecaster configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Metric key not present in the metric registry.
    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    /// Model has not been fitted yet.
    #[error("forecaster must be fitted before prediction")]
    FitRequired,
}
