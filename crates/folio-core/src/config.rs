//! Client configuration.
//!
//! Values are resolved in order: built-in defaults, an optional TOML file,
//! then `FOLIO_ENDPOINT` / `FOLIO_TIMEOUT_MS` from the environment. Callers
//! apply command-line overrides last and call [`FolioConfig::validate`].
//!
//! ```toml
//! endpoint = "http://127.0.0.1:5000/analyze"
//! timeout_ms = 5000
//! user_agent = "folio/0.1.0"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

pub const ENV_ENDPOINT: &str = "FOLIO_ENDPOINT";
pub const ENV_TIMEOUT_MS: &str = "FOLIO_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolioConfig {
    /// Valuation endpoint receiving the POST.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout budget.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:5000/analyze".to_string()
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_user_agent() -> String {
    concat!("folio/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl FolioConfig {
    /// Load configuration from a TOML file. Missing keys take defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Defaults or `path`, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_env(|name| std::env::var(name).ok())
    }

    /// Apply environment overrides through `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|v| !v.trim().is_empty()) {
            self.endpoint = endpoint.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS).filter(|v| !v.trim().is_empty()) {
            self.timeout_ms = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv {
                    name: ENV_TIMEOUT_MS,
                    value: raw.clone(),
                })?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.endpoint.as_str();
        let has_scheme = endpoint.starts_with("http://") || endpoint.starts_with("https://");
        let has_host = endpoint
            .split_once("://")
            .map(|(_, rest)| !rest.is_empty() && !rest.starts_with('/'))
            .unwrap_or(false);
        if !has_scheme || !has_host {
            return Err(ConfigError::InvalidEndpoint {
                value: self.endpoint.clone(),
            });
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }
}
