//! Acquisition configuration (acquisition.yaml).
//!
//! Supports environment variable substitution using `${VAR}` and
//! `${VAR:-default}` syntax.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use lst_common::GeoPoint;
use serde::{Deserialize, Serialize};

use crate::fetch::DEFAULT_DOWNLOAD_TIMEOUT;
use crate::query::{SceneQuery, DEFAULT_MAX_CLOUD_COVER, DEFAULT_RADIUS_M, DEFAULT_WINDOW_DAYS};
use crate::source::{LstSource, SourceDefinition, SourcePreference};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub query: QueryDefaults,
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDefaults {
    #[serde(default = "default_radius_m")]
    pub radius_m: f64,
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    #[serde(default = "default_max_cloud_cover")]
    pub max_cloud_cover: f64,
    #[serde(default)]
    pub prefer: SourcePreference,
}

fn default_sources() -> Vec<SourceDefinition> {
    LstSource::ALL
        .iter()
        .map(|s| s.default_definition())
        .collect()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_DOWNLOAD_TIMEOUT.as_secs()
}

fn default_radius_m() -> f64 {
    DEFAULT_RADIUS_M
}

fn default_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

fn default_max_cloud_cover() -> f64 {
    DEFAULT_MAX_CLOUD_COVER
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_RADIUS_M,
            window_days: DEFAULT_WINDOW_DAYS,
            max_cloud_cover: DEFAULT_MAX_CLOUD_COVER,
            prefer: SourcePreference::Auto,
        }
    }
}

impl AcquisitionConfig {
    /// Built-in sources and query defaults against `base_url`.
    pub fn with_gateway(base_url: impl Into<String>) -> Self {
        Self {
            gateway: GatewayConfig {
                base_url: base_url.into(),
                timeout_secs: default_timeout_secs(),
            },
            query: QueryDefaults::default(),
            sources: default_sources(),
        }
    }

    /// Parse YAML content after environment expansion, then validate.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let expanded = expand_env_vars(content)?;
        let config: AcquisitionConfig =
            serde_yaml::from_str(&expanded).context("Failed to parse acquisition config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn source(&self, kind: LstSource) -> Option<&SourceDefinition> {
        self.sources.iter().find(|s| s.kind == kind)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.gateway.timeout_secs)
    }

    /// A scene query at `point` using the configured defaults.
    pub fn query_for(&self, point: GeoPoint) -> SceneQuery {
        SceneQuery {
            radius_m: self.query.radius_m,
            window_days: self.query.window_days,
            max_cloud_cover: self.query.max_cloud_cover,
            ..SceneQuery::new(point)
        }
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.gateway.base_url.trim();
        anyhow::ensure!(!url.is_empty(), "gateway.base_url cannot be empty");
        anyhow::ensure!(
            url.starts_with("http://") || url.starts_with("https://"),
            "gateway.base_url must be an http(s) URL, got {}",
            url
        );
        anyhow::ensure!(
            self.gateway.timeout_secs > 0,
            "gateway.timeout_secs must be greater than 0"
        );

        anyhow::ensure!(
            self.query.radius_m.is_finite() && self.query.radius_m > 0.0,
            "query.radius_m must be positive"
        );
        anyhow::ensure!(
            self.query.window_days > 0,
            "query.window_days must be greater than 0"
        );
        anyhow::ensure!(
            (0.0..=100.0).contains(&self.query.max_cloud_cover),
            "query.max_cloud_cover must lie in [0, 100]"
        );

        anyhow::ensure!(!self.sources.is_empty(), "At least one source is required");
        let mut seen = HashSet::new();
        for source in &self.sources {
            anyhow::ensure!(
                seen.insert(source.kind),
                "Source {} is defined more than once",
                source.kind
            );
            anyhow::ensure!(
                !source.collection.is_empty(),
                "Source {} has an empty collection",
                source.kind
            );
            anyhow::ensure!(
                !source.bands.is_empty(),
                "Source {} must list at least one band",
                source.kind
            );
            anyhow::ensure!(
                source.scale_m > 0.0,
                "Source {} scale_m must be positive",
                source.kind
            );
            anyhow::ensure!(
                source.gain.is_finite() && source.gain != 0.0 && source.offset.is_finite(),
                "Source {} needs a finite non-zero gain and a finite offset",
                source.kind
            );
        }

        Ok(())
    }
}

/// Load and validate an acquisition config file.
pub fn load_acquisition_config<P: AsRef<Path>>(path: P) -> Result<AcquisitionConfig> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read acquisition config from {:?}", path.as_ref()))?;

    AcquisitionConfig::from_yaml_str(&content)
        .with_context(|| format!("Invalid acquisition config in {:?}", path.as_ref()))
}

// ============================================================================
// Environment Variable Expansion
// ============================================================================

/// Expand `${VAR}` and `${VAR:-default}` references.
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' || chars.peek() != Some(&'{') {
            result.push(ch);
            continue;
        }
        chars.next();

        let mut expr = String::new();
        loop {
            match chars.next() {
                Some('}') => break,
                Some(c) => expr.push(c),
                None => anyhow::bail!("Unclosed variable substitution: ${{{}", expr),
            }
        }
        result.push_str(&resolve_var_expr(&expr)?);
    }

    Ok(result)
}

fn resolve_var_expr(expr: &str) -> Result<String> {
    match expr.split_once(":-") {
        Some((name, default)) => match std::env::var(name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        },
        None => std::env::var(expr.trim())
            .with_context(|| format!("Environment variable {} not set", expr.trim())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_env_vars_simple() {
        std::env::set_var("LST_TEST_GATEWAY", "http://gw:9000");
        let out = expand_env_vars("base_url: ${LST_TEST_GATEWAY}/v1").unwrap();
        assert_eq!(out, "base_url: http://gw:9000/v1");
    }

    #[test]
    fn test_expand_env_vars_with_default() {
        std::env::remove_var("LST_TEST_UNSET");
        let out = expand_env_vars("timeout: ${LST_TEST_UNSET:-60}").unwrap();
        assert_eq!(out, "timeout: 60");
    }

    #[test]
    fn test_expand_env_vars_missing_required() {
        std::env::remove_var("LST_TEST_REQUIRED");
        assert!(expand_env_vars("${LST_TEST_REQUIRED}").is_err());
        assert!(expand_env_vars("${UNCLOSED").is_err());
    }

    #[test]
    fn test_plain_dollar_is_kept() {
        assert_eq!(expand_env_vars("cost: $5").unwrap(), "cost: $5");
    }

    #[test]
    fn test_minimal_yaml_uses_defaults() {
        let config =
            AcquisitionConfig::from_yaml_str("gateway:\n  base_url: http://localhost:8085\n")
                .unwrap();

        assert_eq!(config, AcquisitionConfig::with_gateway("http://localhost:8085"));
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert!(config.source(LstSource::Landsat).is_some());
        assert!(config.source(LstSource::Sentinel).is_some());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AcquisitionConfig::with_gateway("ftp://example");
        assert!(config.validate().is_err());

        config = AcquisitionConfig::with_gateway("http://example");
        config.query.window_days = 0;
        assert!(config.validate().is_err());

        config = AcquisitionConfig::with_gateway("http://example");
        config.sources.push(LstSource::Landsat.default_definition());
        assert!(config.validate().is_err());

        config = AcquisitionConfig::with_gateway("http://example");
        config.sources[0].bands.clear();
        assert!(config.validate().is_err());
    }
}
