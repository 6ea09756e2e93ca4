//! Scorer configuration
//!
//! A [`ScorerConfig`] describes a scorer by metric and sign convention and
//! can be loaded from TOML, YAML or JSON:
//!
//! ```toml
//! name = "neg_root_mean_squared_log_error"
//! metric = "root_mean_squared_log_error"
//! greater_is_better = false
//! ```

use crate::error::{Error, Result};
use crate::ml::metrics::regression;
use crate::ml::scorer::{make_scorer, MetricFn, Scorer};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Metrics a scorer can be configured with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    RootMeanSquaredLogError,
    MeanSquaredLogError,
    RootMeanSquaredError,
    MeanSquaredError,
    MeanAbsoluteError,
    R2,
}

impl MetricKind {
    /// Metric function backing this kind
    pub fn metric(&self) -> MetricFn {
        match self {
            MetricKind::RootMeanSquaredLogError => regression::root_mean_squared_log_error,
            MetricKind::MeanSquaredLogError => regression::mean_squared_log_error,
            MetricKind::RootMeanSquaredError => regression::root_mean_squared_error,
            MetricKind::MeanSquaredError => regression::mean_squared_error,
            MetricKind::MeanAbsoluteError => regression::mean_absolute_error,
            MetricKind::R2 => regression::r2_score,
        }
    }

    /// Error measures are minimised; R2 is maximised
    pub fn is_error_measure(&self) -> bool {
        !matches!(self, MetricKind::R2)
    }
}

/// Configuration for a single scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// Name reported by the built scorer
    pub name: String,
    /// Metric to wrap
    pub metric: MetricKind,
    /// Whether higher raw metric values are better
    #[serde(default)]
    pub greater_is_better: bool,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        ScorerConfig {
            name: "neg_root_mean_squared_log_error".to_string(),
            metric: MetricKind::RootMeanSquaredLogError,
            greater_is_better: false,
        }
    }
}

impl ScorerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a config file, choosing the format from its extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        let content = fs::read_to_string(path)?;
        let config = match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&content)?,
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            _ => {
                return Err(Error::Format(format!(
                    "未対応の設定ファイル形式です: {}",
                    path.display()
                )))
            }
        };

        log::debug!("loaded scorer config '{}' from {}", config.name, path.display());
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Build the configured scorer
    pub fn build(&self) -> Scorer {
        if self.greater_is_better && self.metric.is_error_measure() {
            log::warn!(
                "scorer '{}' maximises error measure {:?}",
                self.name,
                self.metric
            );
        }
        make_scorer(self.name.clone(), self.metric.metric(), self.greater_is_better)
    }
}
