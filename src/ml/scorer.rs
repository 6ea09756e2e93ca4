//! Scorer adapter
//!
//! A [`Scorer`] wraps a `metric(y_true, y_pred)` function so an evaluation
//! harness can call every metric the same way: `scorer.score(estimator, x, y)`
//! resolves to `sign * metric(y, estimator.predict(x))`. Error measures are
//! built with `greater_is_better = false`, so their sign is `-1.0` and
//! maximising the score minimises the error.

use crate::error::{Error, Result};
use crate::ml::metrics::regression;

/// Metric function signature accepted by [`make_scorer`]
pub type MetricFn = fn(&[f64], &[f64]) -> Result<f64>;

/// Anything that can produce predictions for an input of type `X`
pub trait Estimator<X: ?Sized> {
    /// Predict one value per sample of `x`
    fn predict(&self, x: &X) -> Result<Vec<f64>>;
}

/// Metric wrapped in the uniform scorer calling convention
#[derive(Debug, Clone)]
pub struct Scorer {
    name: String,
    metric: MetricFn,
    greater_is_better: bool,
}

impl Scorer {
    /// Name the scorer is registered under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether higher raw metric values are better
    pub fn greater_is_better(&self) -> bool {
        self.greater_is_better
    }

    /// Multiplier applied to the raw metric value
    pub fn sign(&self) -> f64 {
        if self.greater_is_better {
            1.0
        } else {
            -1.0
        }
    }

    /// Raw (unsigned) metric value
    pub fn metric_value(&self, y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
        (self.metric)(y_true, y_pred)
    }

    /// Signed score for predictions that were already computed
    pub fn score_predictions(&self, y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
        Ok(self.sign() * self.metric_value(y_true, y_pred)?)
    }

    /// Predict `x` with `estimator` and score the predictions against `y_true`
    pub fn score<X, E>(&self, estimator: &E, x: &X, y_true: &[f64]) -> Result<f64>
    where
        X: ?Sized,
        E: Estimator<X> + ?Sized,
    {
        let y_pred = estimator.predict(x)?;
        let score = self.score_predictions(y_true, &y_pred)?;
        log::debug!(
            "scorer '{}' evaluated {} samples: {}",
            self.name,
            y_true.len(),
            score
        );
        Ok(score)
    }
}

/// Wrap `metric` as a [`Scorer`]
///
/// With `greater_is_better = false` the harness receives `-metric(...)`.
pub fn make_scorer(name: impl Into<String>, metric: MetricFn, greater_is_better: bool) -> Scorer {
    Scorer {
        name: name.into(),
        metric,
        greater_is_better,
    }
}

lazy_static::lazy_static! {
    /// Process-wide RMSLE scorer
    static ref ROOT_MEAN_SQUARED_LOG_ERROR: Scorer = make_scorer(
        "neg_root_mean_squared_log_error",
        regression::root_mean_squared_log_error,
        false,
    );

    /// Named scorers available through [`get_scorer`]
    static ref SCORERS: Vec<Scorer> = vec![
        ROOT_MEAN_SQUARED_LOG_ERROR.clone(),
        make_scorer(
            "neg_mean_squared_log_error",
            regression::mean_squared_log_error,
            false,
        ),
        make_scorer(
            "neg_root_mean_squared_error",
            regression::root_mean_squared_error,
            false,
        ),
        make_scorer("neg_mean_squared_error", regression::mean_squared_error, false),
        make_scorer("neg_mean_absolute_error", regression::mean_absolute_error, false),
        make_scorer("r2", regression::r2_score, true),
    ];
}

/// Get the process-wide RMSLE scorer (`greater_is_better = false`)
pub fn root_mean_squared_log_error_scorer() -> &'static Scorer {
    &ROOT_MEAN_SQUARED_LOG_ERROR
}

/// Look up a registered scorer by name
pub fn get_scorer(name: &str) -> Result<&'static Scorer> {
    SCORERS
        .iter()
        .find(|scorer| scorer.name == name)
        .ok_or_else(|| {
            Error::KeyNotFound(format!(
                "スコアラー '{}' は登録されていません（利用可能: {}）",
                name,
                scorer_names().join(", ")
            ))
        })
}

/// Names of all registered scorers
pub fn scorer_names() -> Vec<&'static str> {
    SCORERS.iter().map(|scorer| scorer.name.as_str()).collect()
}
