// 特定の警告を無効化
#![allow(clippy::needless_return)]
#![allow(clippy::redundant_closure)]

pub mod config;
pub mod error;
pub mod ml;

// Re-export commonly used types
pub use config::{MetricKind, ScorerConfig};
pub use error::{Error, Result};
pub use ml::metrics::regression::{
    mean_squared_log_error, rmsle, root_mean_squared_log_error, MultiOutput, MultiOutputScore,
};
pub use ml::models::{DummyRegressor, DummyStrategy, SupervisedModel};
pub use ml::scorer::{
    get_scorer, make_scorer, root_mean_squared_log_error_scorer, Estimator, MetricFn, Scorer,
};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
