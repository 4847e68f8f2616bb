use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::layout::LayoutConfig;
use crate::select::year::DEFAULT_BLOCKED_YEAR;

// ---------------------------------------------------------------------------
// Metric selector descriptions
// ---------------------------------------------------------------------------

/// How a metric's domain is laid out in its selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    Linear,
    Angular,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSpec {
    /// Column name in the dataset.
    pub name: String,
    pub label: String,
    pub projection: Projection,
}

impl MetricSpec {
    fn new(name: &str, label: &str, projection: Projection) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            projection,
        }
    }
}

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub layout: LayoutConfig,
    /// Season shown on the year scale but never selectable.
    pub blocked_year: Option<i32>,
    pub win_pct_bins: usize,
    pub metric_bins: usize,
    pub metrics: Vec<MetricSpec>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            blocked_year: Some(DEFAULT_BLOCKED_YEAR),
            win_pct_bins: 15,
            metric_bins: 20,
            metrics: vec![
                MetricSpec::new("EFG_O", "Effective FG% (off.)", Projection::Linear),
                MetricSpec::new("EFG_D", "Effective FG% (def.)", Projection::Linear),
                MetricSpec::new("2P_O", "Two-point % (off.)", Projection::Linear),
                MetricSpec::new("2P_D", "Two-point % (def.)", Projection::Linear),
                MetricSpec::new("3P_O", "Three-point % (off.)", Projection::Angular),
                MetricSpec::new("3P_D", "Three-point % (def.)", Projection::Angular),
            ],
        }
    }
}

impl AppConfig {
    /// Read a JSON config file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn metrics_with(&self, projection: Projection) -> impl Iterator<Item = &MetricSpec> {
        self.metrics.iter().filter(move |m| m.projection == projection)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_split_metrics_by_projection() {
        let config = AppConfig::default();
        assert_eq!(config.metrics_with(Projection::Linear).count(), 4);
        let angular: Vec<&str> = config
            .metrics_with(Projection::Angular)
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(angular, ["3P_O", "3P_D"]);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{ "blocked_year": null, "layout": {{ "margin": 32.0 }},
                 "metrics": [{{ "name": "ADJOE", "label": "Adj. offence", "projection": "angular" }}] }}"#
        )
        .unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.blocked_year, None);
        assert_eq!(config.layout.margin, 32.0);
        assert_eq!(config.layout.min_radius, 15.0);
        assert_eq!(config.win_pct_bins, 15);
        assert_eq!(config.metrics.len(), 1);
        assert_eq!(config.metrics[0].projection, Projection::Angular);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert!(AppConfig::load(file.path()).is_err());
    }
}
