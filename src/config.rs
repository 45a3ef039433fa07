//! Configuration for the dashboard client.
//!
//! Loaded from `.riskboard.toml` in the working directory, or from the
//! user's config directory, or defaulted entirely. Every field has a serde
//! default so a partial file works. The `[risk]` table is where the
//! per-view "high includes critical" choices live - widening is named
//! configuration, never inferred.

use crate::riskboard_error::RiskboardError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".riskboard.toml";

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> usize {
    10
}

fn default_true() -> bool {
    true
}

/// Backend endpoint and auth settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Transport-level timeout. There is no application-level retry on top.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Static bearer token; refresh is the gateway's job.
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            token: None,
        }
    }
}

/// Defaults applied to every collection view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewDefaults {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ViewDefaults {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Named per-view widening choices for the "high" risk filter.
///
/// The product historically disagreed with itself about whether a high-risk
/// view includes critical students; these two flags make the choice explicit
/// for each surface instead of unifying it silently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskPolicy {
    /// List pages: selecting the `high` filter also admits `critical` rows.
    #[serde(default)]
    pub widen_high_in_lists: bool,

    /// Summary cards: the high-risk count folds critical students in.
    #[serde(default = "default_true")]
    pub widen_high_in_summary: bool,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            widen_high_in_lists: false,
            widen_high_in_summary: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskboardConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub view: ViewDefaults,
    #[serde(default)]
    pub risk: RiskPolicy,
}

impl RiskboardConfig {
    /// Load configuration: an explicit path must exist; otherwise the
    /// working directory is tried, then the user config directory, then
    /// built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, RiskboardError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        for candidate in Self::search_paths() {
            if candidate.exists() {
                log::debug!("loading config from {}", candidate.display());
                return Self::from_file(&candidate);
            }
        }

        Ok(Self::default())
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("riskboard").join("riskboard.toml"));
        }
        paths
    }

    pub fn from_file(path: &Path) -> Result<Self, RiskboardError> {
        let content = fs::read_to_string(path).map_err(|err| {
            RiskboardError::config(format!("could not read {}: {err}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, RiskboardError> {
        let config: Self = toml::from_str(content)
            .map_err(|err| RiskboardError::config(format!("invalid config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), RiskboardError> {
        let mut problems = Vec::new();

        if self.view.page_size == 0 {
            problems.push("view.page_size must be greater than zero".to_string());
        }
        if self.api.timeout_secs == 0 {
            problems.push("api.timeout_secs must be greater than zero".to_string());
        }
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            problems.push(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(RiskboardError::config(problems.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = RiskboardConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.view.page_size, 10);
        assert!(!config.risk.widen_high_in_lists);
        assert!(config.risk.widen_high_in_summary);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = RiskboardConfig::from_toml_str(indoc! {r#"
            [api]
            base_url = "https://risk.example.edu/api"
        "#})
        .unwrap();
        assert_eq!(config.api.base_url, "https://risk.example.edu/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.view.page_size, 10);
    }

    #[test]
    fn test_risk_policy_flags() {
        let config = RiskboardConfig::from_toml_str(indoc! {r#"
            [risk]
            widen_high_in_lists = true
            widen_high_in_summary = false
        "#})
        .unwrap();
        assert!(config.risk.widen_high_in_lists);
        assert!(!config.risk.widen_high_in_summary);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = RiskboardConfig::from_toml_str(indoc! {r#"
            [view]
            page_size = 0
        "#})
        .unwrap_err();
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn test_non_http_base_url_rejected() {
        let err = RiskboardConfig::from_toml_str(indoc! {r#"
            [api]
            base_url = "ftp://example.edu"
        "#})
        .unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("riskboard.toml");
        std::fs::write(&path, "[view]\npage_size = 25\n").unwrap();

        let config = RiskboardConfig::load(Some(&path)).unwrap();
        assert_eq!(config.view.page_size, 25);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let err =
            RiskboardConfig::load(Some(Path::new("/nonexistent/riskboard.toml"))).unwrap_err();
        assert!(matches!(err, RiskboardError::Config { .. }));
    }
}
