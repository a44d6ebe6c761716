//! Rolling-origin train/test split generation.
//!
//! The training window always starts at index 0 and its end advances by
//! `steps` observations per fold, so the training set grows while the test
//! window rolls forward through time. Temporal order is never disturbed.

use crate::error::{Result, SelectionError};
use std::ops::Range;

/// One train/test pair produced by rolling-origin splitting.
///
/// Both ranges are contiguous, disjoint, and `train.end == test.start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    /// Training indices `[0, train_end)`.
    pub train: Range<usize>,
    /// Test indices `[train_end, train_end + test_len)`.
    pub test: Range<usize>,
}

impl Fold {
    /// Number of observations in the test window.
    pub fn test_len(&self) -> usize {
        self.test.end - self.test.start
    }
}

/// Lazy iterator over rolling-origin folds.
///
/// Created by [`generate_splits`]. The sequence is finite and exhausted
/// after one pass; call `generate_splits` again with the same arguments to
/// obtain the identical sequence.
#[derive(Debug, Clone)]
pub struct RollingOriginSplits {
    initial_train_size: usize,
    steps: usize,
    folds: usize,
    remainder: usize,
    allow_incomplete_fold: bool,
    next_fold: usize,
}

impl RollingOriginSplits {
    /// Total number of folds the iterator will emit.
    pub fn n_folds(&self) -> usize {
        if self.remainder != 0 && !self.allow_incomplete_fold {
            self.folds - 1
        } else if self.remainder == 0 {
            // The fold-count formula counts a synthetic empty final fold
            // when the data divides evenly; it is never emitted.
            self.folds - 1
        } else {
            self.folds
        }
    }
}

impl Iterator for RollingOriginSplits {
    type Item = Fold;

    fn next(&mut self) -> Option<Fold> {
        if self.next_fold >= self.folds {
            return None;
        }
        let i = self.next_fold;
        let train_end = self.initial_train_size + i * self.steps;

        let test_len = if i < self.folds - 1 {
            self.steps
        } else if self.remainder != 0 && self.allow_incomplete_fold {
            self.remainder
        } else {
            self.next_fold = self.folds;
            return None;
        };

        self.next_fold += 1;
        Some(Fold {
            train: 0..train_end,
            test: train_end..train_end + test_len,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.n_folds().saturating_sub(self.next_fold);
        (remaining, Some(remaining))
    }
}

/// Split the indices `[0, n)` of a time series into rolling-origin
/// train/test pairs.
///
/// `folds = (n - initial_train_size) / steps + 1` and
/// `remainder = (n - initial_train_size) % steps`. Every fold but the last
/// has a test window of exactly `steps` observations; the last fold's test
/// window holds the `remainder` observations and is emitted only when
/// `remainder != 0` and `allow_incomplete_fold` is true. When the data
/// divides evenly no synthetic extra fold is emitted.
///
/// # Errors
/// `InvalidConfiguration` if `steps == 0`, `initial_train_size == 0`, or
/// `initial_train_size > n`.
///
/// # Example
/// ```
/// use forecast_select::split::generate_splits;
///
/// let folds: Vec<_> = generate_splits(10, 6, 2, true).unwrap().collect();
/// assert_eq!(folds.len(), 2);
/// assert_eq!(folds[0].train, 0..6);
/// assert_eq!(folds[0].test, 6..8);
/// assert_eq!(folds[1].train, 0..8);
/// assert_eq!(folds[1].test, 8..10);
/// ```
pub fn generate_splits(
    n: usize,
    initial_train_size: usize,
    steps: usize,
    allow_incomplete_fold: bool,
) -> Result<RollingOriginSplits> {
    if steps == 0 {
        return Err(SelectionError::InvalidConfiguration(
            "steps must be positive".to_string(),
        ));
    }
    if initial_train_size == 0 {
        return Err(SelectionError::InvalidConfiguration(
            "initial_train_size must be positive".to_string(),
        ));
    }
    if initial_train_size > n {
        return Err(SelectionError::InvalidConfiguration(format!(
            "initial_train_size ({}) exceeds series length ({})",
            initial_train_size, n
        )));
    }

    Ok(RollingOriginSplits {
        initial_train_size,
        steps,
        folds: (n - initial_train_size) / steps + 1,
        remainder: (n - initial_train_size) % steps,
        allow_incomplete_fold,
        next_fold: 0,
    })
}
