//! Linear autoregressive forecaster.
//!
//! Regresses each observation on a configurable set of lagged values and an
//! optional exogenous regressor, fit by ridge-regularized least squares.
//! Multi-step forecasts are recursive: each prediction is appended to the
//! working window and fed back as a lagged feature.

use crate::error::{Result, SelectionError};
use crate::forecaster::{Forecaster, Lags, ParamSet};

/// Autoregressive forecaster with a linear regressor.
///
/// Hyperparameters settable through [`Forecaster::set_params`]:
/// - `alpha` (float ≥ 0): ridge penalty, default 0.
/// - `fit_intercept` (bool): include an intercept term, default true.
///
/// # Example
/// ```
/// use forecast_select::forecaster::{Forecaster, Lags};
/// use forecast_select::models::AutoregLinear;
///
/// let y: Vec<f64> = (0..30).map(|i| i as f64).collect();
/// let mut model = AutoregLinear::new(Lags::upto(1).unwrap());
/// model.fit(&y, None).unwrap();
///
/// let pred = model.predict(3, None, None).unwrap();
/// assert_eq!(pred.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct AutoregLinear {
    lags: Lags,
    alpha: f64,
    fit_intercept: bool,
    coefficients: Option<Vec<f64>>,
    intercept: f64,
    train_tail: Option<Vec<f64>>,
    uses_exog: bool,
}

impl AutoregLinear {
    /// Create an unfitted forecaster with the given lag set.
    pub fn new(lags: Lags) -> Self {
        Self {
            lags,
            alpha: 0.0,
            fit_intercept: true,
            coefficients: None,
            intercept: 0.0,
            train_tail: None,
            uses_exog: false,
        }
    }

    /// Set the ridge penalty at construction time.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Current ridge penalty.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Learned lag coefficients (and the exog coefficient last, when fitted
    /// with exogenous data).
    pub fn coefficients(&self) -> Option<&[f64]> {
        self.coefficients.as_deref()
    }

    /// Learned intercept.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    fn clear_fit(&mut self) {
        self.coefficients = None;
        self.intercept = 0.0;
        self.train_tail = None;
        self.uses_exog = false;
    }

    fn feature_row(&self, window: &[f64], exog_value: Option<f64>) -> Vec<f64> {
        let mut row: Vec<f64> = self
            .lags
            .as_slice()
            .iter()
            .map(|&lag| window[window.len() - lag])
            .collect();
        if let Some(x) = exog_value {
            row.push(x);
        }
        row
    }
}

impl Forecaster for AutoregLinear {
    fn fit(&mut self, y: &[f64], exog: Option<&[f64]>) -> Result<()> {
        self.validate_series(y)?;
        if let Some(e) = exog {
            self.validate_exog(e)?;
            if e.len() != y.len() {
                return Err(SelectionError::DimensionMismatch {
                    expected: y.len(),
                    got: e.len(),
                });
            }
        }
        self.clear_fit();

        let max_lag = self.lags.max_lag();
        let n = y.len();
        if n <= max_lag {
            return Err(SelectionError::InvalidInput(format!(
                "need more than {} observations to fit lags {}, got {}",
                max_lag, self.lags, n
            )));
        }

        let n_features = self.lags.len() + usize::from(exog.is_some());
        let offset = usize::from(self.fit_intercept);
        let n_params = n_features + offset;

        // Accumulate the normal equations X'X and X'y directly.
        let mut xtx = vec![vec![0.0; n_params]; n_params];
        let mut xty = vec![0.0; n_params];

        for t in max_lag..n {
            let row = self.feature_row(&y[..t], exog.map(|e| e[t]));
            if self.fit_intercept {
                xtx[0][0] += 1.0;
                for (j, &xj) in row.iter().enumerate() {
                    xtx[0][j + 1] += xj;
                    xtx[j + 1][0] += xj;
                }
                xty[0] += y[t];
            }
            for (i, &xi) in row.iter().enumerate() {
                for (j, &xj) in row.iter().enumerate() {
                    xtx[i + offset][j + offset] += xi * xj;
                }
                xty[i + offset] += xi * y[t];
            }
        }

        // Ridge penalty on the feature coefficients, never the intercept;
        // the extra 1e-8 keeps collinear lag sets positive definite.
        for i in 0..n_params {
            if i >= offset {
                xtx[i][i] += self.alpha;
            }
            xtx[i][i] += 1e-8;
        }

        let beta = solve_symmetric(&xtx, &xty).ok_or_else(|| {
            SelectionError::InvalidInput(
                "autoregression failed: normal equations not positive definite".to_string(),
            )
        })?;

        self.intercept = if self.fit_intercept { beta[0] } else { 0.0 };
        self.coefficients = Some(beta[offset..].to_vec());
        self.train_tail = Some(y[n - max_lag..].to_vec());
        self.uses_exog = exog.is_some();
        Ok(())
    }

    fn predict(
        &self,
        steps: usize,
        last_window: Option<&[f64]>,
        exog: Option<&[f64]>,
    ) -> Result<Vec<f64>> {
        let coefficients = self.coefficients.as_ref().ok_or(SelectionError::FitRequired)?;
        let max_lag = self.lags.max_lag();

        let mut window: Vec<f64> = match last_window {
            Some(w) => {
                if w.len() < max_lag {
                    return Err(SelectionError::InvalidInput(format!(
                        "last_window holds {} observations but max_lag is {}",
                        w.len(),
                        max_lag
                    )));
                }
                w[w.len() - max_lag..].to_vec()
            }
            None => self
                .train_tail
                .clone()
                .ok_or(SelectionError::FitRequired)?,
        };

        if self.uses_exog != exog.is_some() {
            return Err(SelectionError::InvalidInput(
                "exog must be supplied exactly when the model was fitted with exog".to_string(),
            ));
        }
        if let Some(e) = exog {
            if e.len() != steps {
                return Err(SelectionError::DimensionMismatch {
                    expected: steps,
                    got: e.len(),
                });
            }
        }

        let mut predictions = Vec::with_capacity(steps);
        for h in 0..steps {
            let row = self.feature_row(&window, exog.map(|e| e[h]));
            let value = self.intercept
                + row
                    .iter()
                    .zip(coefficients.iter())
                    .map(|(x, c)| x * c)
                    .sum::<f64>();
            predictions.push(value);
            window.push(value);
        }

        Ok(predictions)
    }

    fn set_lags(&mut self, lags: Lags) {
        self.lags = lags;
        self.clear_fit();
    }

    fn set_params(&mut self, params: &ParamSet) -> Result<()> {
        for (name, value) in params {
            match name.as_str() {
                "alpha" => {
                    let alpha = value.as_f64().ok_or_else(|| {
                        SelectionError::InvalidConfiguration(
                            "alpha must be numeric".to_string(),
                        )
                    })?;
                    if alpha < 0.0 {
                        return Err(SelectionError::InvalidConfiguration(
                            "alpha must be non-negative".to_string(),
                        ));
                    }
                    self.alpha = alpha;
                }
                "fit_intercept" => {
                    self.fit_intercept = value.as_bool().ok_or_else(|| {
                        SelectionError::InvalidConfiguration(
                            "fit_intercept must be a bool".to_string(),
                        )
                    })?;
                }
                other => {
                    return Err(SelectionError::InvalidConfiguration(format!(
                        "unknown parameter '{}'",
                        other
                    )));
                }
            }
        }
        self.clear_fit();
        Ok(())
    }

    fn lags(&self) -> &Lags {
        &self.lags
    }

    fn name(&self) -> &str {
        "AutoregLinear"
    }
}

/// Solve a symmetric positive definite system with Cholesky decomposition.
fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }
            if i == j {
                if sum <= 0.0 {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // Forward substitution: L y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // Backward substitution: L' x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecaster::ParamValue;
    use approx::assert_relative_eq;

    fn ar1_series(n: usize, intercept: f64, coef: f64, start: f64) -> Vec<f64> {
        let mut y = Vec::with_capacity(n);
        y.push(start);
        for t in 1..n {
            y.push(intercept + coef * y[t - 1]);
        }
        y
    }

    #[test]
    fn recovers_ar1_process() {
        // Start away from the fixed point (10.0) so lagged values vary
        let y = ar1_series(40, 2.0, 0.8, 1.0);
        let mut model = AutoregLinear::new(Lags::upto(1).unwrap());
        model.fit(&y, None).unwrap();

        assert_relative_eq!(model.intercept(), 2.0, epsilon = 1e-3);
        assert_relative_eq!(model.coefficients().unwrap()[0], 0.8, epsilon = 1e-3);
    }

    #[test]
    fn predicts_linear_ramp_exactly() {
        // y[t] = 1 + y[t-1] with an intercept recovers the ramp exactly
        let y: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let mut model = AutoregLinear::new(Lags::upto(1).unwrap());
        model.fit(&y, None).unwrap();

        let pred = model.predict(3, None, None).unwrap();
        assert_relative_eq!(pred[0], 30.0, epsilon = 1e-4);
        assert_relative_eq!(pred[1], 31.0, epsilon = 1e-4);
        assert_relative_eq!(pred[2], 32.0, epsilon = 1e-4);
    }

    #[test]
    fn predict_from_last_window_matches_training_tail() {
        let y = ar1_series(50, 1.0, 0.9, 5.0);
        let mut model = AutoregLinear::new(Lags::upto(2).unwrap());
        model.fit(&y, None).unwrap();

        let implicit = model.predict(4, None, None).unwrap();
        let explicit = model.predict(4, Some(&y[48..]), None).unwrap();

        for (a, b) in implicit.iter().zip(explicit.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-10);
        }
    }

    #[test]
    fn predict_uses_only_window_tail() {
        let y = ar1_series(50, 1.0, 0.9, 5.0);
        let mut model = AutoregLinear::new(Lags::upto(2).unwrap());
        model.fit(&y, None).unwrap();

        // Extra leading history in the window must not change anything.
        let short = model.predict(3, Some(&y[48..]), None).unwrap();
        let long = model.predict(3, Some(&y[40..]), None).unwrap();
        for (a, b) in short.iter().zip(long.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-10);
        }
    }

    #[test]
    fn exog_coefficient_is_learned() {
        // y[t] = y[t-1] + 2 * exog[t]
        let exog: Vec<f64> = (0..40).map(|i| if i % 2 == 0 { 1.0 } else { 0.0 }).collect();
        let mut y = vec![1.0];
        for t in 1..40 {
            y.push(y[t - 1] + 2.0 * exog[t]);
        }

        let mut model = AutoregLinear::new(Lags::upto(1).unwrap());
        model.fit(&y, Some(&exog)).unwrap();

        let future_exog = [1.0, 0.0, 1.0];
        let pred = model.predict(3, None, Some(&future_exog)).unwrap();

        let mut expected = vec![y[39] + 2.0];
        expected.push(expected[0]);
        expected.push(expected[1] + 2.0);
        for (p, e) in pred.iter().zip(expected.iter()) {
            assert_relative_eq!(p, e, epsilon = 1e-3);
        }
    }

    #[test]
    fn exog_presence_must_match_fit() {
        let y = ar1_series(30, 1.0, 0.5, 6.0);
        let exog = vec![1.0; 30];

        let mut model = AutoregLinear::new(Lags::upto(1).unwrap());
        model.fit(&y, Some(&exog)).unwrap();
        assert!(matches!(
            model.predict(2, None, None),
            Err(SelectionError::InvalidInput(_))
        ));

        model.fit(&y, None).unwrap();
        assert!(matches!(
            model.predict(2, None, Some(&[1.0, 1.0])),
            Err(SelectionError::InvalidInput(_))
        ));
    }

    #[test]
    fn exog_length_must_match_steps() {
        let y = ar1_series(30, 1.0, 0.5, 6.0);
        let exog = vec![1.0; 30];
        let mut model = AutoregLinear::new(Lags::upto(1).unwrap());
        model.fit(&y, Some(&exog)).unwrap();

        assert!(matches!(
            model.predict(3, None, Some(&[1.0, 1.0])),
            Err(SelectionError::DimensionMismatch { expected: 3, got: 2 })
        ));
    }

    #[test]
    fn predict_before_fit_fails() {
        let model = AutoregLinear::new(Lags::upto(2).unwrap());
        assert_eq!(
            model.predict(3, None, None).unwrap_err(),
            SelectionError::FitRequired
        );
    }

    #[test]
    fn short_last_window_is_rejected() {
        let y = ar1_series(30, 1.0, 0.5, 6.0);
        let mut model = AutoregLinear::new(Lags::upto(3).unwrap());
        model.fit(&y, None).unwrap();

        assert!(matches!(
            model.predict(2, Some(&[1.0, 2.0]), None),
            Err(SelectionError::InvalidInput(_))
        ));
    }

    #[test]
    fn fit_requires_more_than_max_lag_observations() {
        let mut model = AutoregLinear::new(Lags::upto(5).unwrap());
        let y = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(matches!(
            model.fit(&y, None),
            Err(SelectionError::InvalidInput(_))
        ));
    }

    #[test]
    fn set_lags_clears_fitted_state() {
        let y = ar1_series(30, 1.0, 0.5, 6.0);
        let mut model = AutoregLinear::new(Lags::upto(1).unwrap());
        model.fit(&y, None).unwrap();
        assert!(model.coefficients().is_some());

        model.set_lags(Lags::upto(2).unwrap());
        assert!(model.coefficients().is_none());
        assert_eq!(model.max_lag(), 2);
    }

    #[test]
    fn set_params_applies_known_parameters() {
        let mut model = AutoregLinear::new(Lags::upto(1).unwrap());
        let mut params = ParamSet::new();
        params.insert("alpha".to_string(), ParamValue::Float(0.5));
        params.insert("fit_intercept".to_string(), ParamValue::Bool(false));

        model.set_params(&params).unwrap();
        assert_relative_eq!(model.alpha(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn set_params_rejects_unknown_or_ill_typed() {
        let mut model = AutoregLinear::new(Lags::upto(1).unwrap());

        let mut unknown = ParamSet::new();
        unknown.insert("gamma".to_string(), ParamValue::Float(0.1));
        assert!(matches!(
            model.set_params(&unknown),
            Err(SelectionError::InvalidConfiguration(_))
        ));

        let mut negative = ParamSet::new();
        negative.insert("alpha".to_string(), ParamValue::Float(-1.0));
        assert!(matches!(
            model.set_params(&negative),
            Err(SelectionError::InvalidConfiguration(_))
        ));

        let mut ill_typed = ParamSet::new();
        ill_typed.insert("fit_intercept".to_string(), ParamValue::Float(1.0));
        assert!(matches!(
            model.set_params(&ill_typed),
            Err(SelectionError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn heavier_ridge_shrinks_coefficients() {
        let y = ar1_series(60, 0.5, 0.9, 4.0);

        let mut plain = AutoregLinear::new(Lags::upto(1).unwrap());
        plain.fit(&y, None).unwrap();
        let mut ridged = AutoregLinear::new(Lags::upto(1).unwrap()).with_alpha(100.0);
        ridged.fit(&y, None).unwrap();

        let plain_coef = plain.coefficients().unwrap()[0].abs();
        let ridged_coef = ridged.coefficients().unwrap()[0].abs();
        assert!(ridged_coef < plain_coef);
    }

    #[test]
    fn model_name() {
        let model = AutoregLinear::new(Lags::upto(1).unwrap());
        assert_eq!(model.name(), "AutoregLinear");
    }
}
