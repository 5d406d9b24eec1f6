//! Configuration data model and validation

use crate::types::{AppError, FailurePolicy, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Endpoint catalog: a local path or an http(s) URL
    #[serde(default = "default_catalog")]
    pub catalog: String,

    /// Batches per run, warm-up included
    #[serde(default = "default_batch_count")]
    pub batch_count: usize,

    /// Per-probe deadline in milliseconds
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Pause after each batch in milliseconds
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,

    /// JSON-RPC method sent with every probe
    #[serde(default = "default_rpc_method")]
    pub rpc_method: String,

    /// How failed measured batches enter the average
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,

    /// Print the summary and registry as JSON instead of text
    #[serde(default)]
    pub json_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            batch_count: default_batch_count(),
            probe_timeout_ms: default_probe_timeout_ms(),
            pacing_ms: default_pacing_ms(),
            rpc_method: default_rpc_method(),
            failure_policy: FailurePolicy::default(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
            json_output: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get probe timeout as Duration
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Get inter-batch pacing as Duration
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    /// Whether the catalog points at a remote URL rather than a file
    pub fn catalog_is_remote(&self) -> bool {
        self.catalog.contains("://")
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.catalog.trim().is_empty() {
            return Err(AppError::config("Catalog location cannot be empty"));
        }

        if self.catalog_is_remote() {
            match url::Url::parse(&self.catalog) {
                Ok(parsed) => {
                    if parsed.scheme() != "http" && parsed.scheme() != "https" {
                        return Err(AppError::config(format!(
                            "Catalog URL must use http or https: {}",
                            self.catalog
                        )));
                    }
                }
                Err(e) => {
                    return Err(AppError::config(format!("Invalid catalog URL '{}': {}", self.catalog, e)));
                }
            }
        }

        if self.batch_count < crate::defaults::MIN_BATCH_COUNT {
            return Err(AppError::config(format!(
                "Batch count must be at least {} (one warm-up plus one measured batch)",
                crate::defaults::MIN_BATCH_COUNT
            )));
        }

        if self.batch_count > crate::defaults::MAX_BATCH_COUNT {
            return Err(AppError::config(format!(
                "Batch count cannot exceed {}",
                crate::defaults::MAX_BATCH_COUNT
            )));
        }

        if self.probe_timeout_ms == 0 {
            return Err(AppError::config("Probe timeout must be greater than 0"));
        }

        if self.probe_timeout_ms > crate::defaults::MAX_PROBE_TIMEOUT_MS {
            return Err(AppError::config(format!(
                "Probe timeout cannot exceed {}ms",
                crate::defaults::MAX_PROBE_TIMEOUT_MS
            )));
        }

        if self.pacing_ms > crate::defaults::MAX_PACING_MS {
            return Err(AppError::config(format!(
                "Pacing cannot exceed {}ms",
                crate::defaults::MAX_PACING_MS
            )));
        }

        if self.rpc_method.trim().is_empty() {
            return Err(AppError::config("RPC method cannot be empty"));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(catalog) = std::env::var("RPC_CATALOG") {
            let catalog = catalog.trim();
            if !catalog.is_empty() {
                self.catalog = catalog.to_string();
            }
        }

        if let Ok(batch_count) = std::env::var("BATCH_COUNT") {
            self.batch_count = batch_count.trim().parse().map_err(|e| {
                AppError::config(format!("Invalid BATCH_COUNT value '{}': {}", batch_count, e))
            })?;
        }

        if let Ok(timeout) = std::env::var("PROBE_TIMEOUT_MS") {
            self.probe_timeout_ms = timeout.trim().parse().map_err(|e| {
                AppError::config(format!("Invalid PROBE_TIMEOUT_MS value '{}': {}", timeout, e))
            })?;
        }

        if let Ok(pacing) = std::env::var("PACING_MS") {
            self.pacing_ms = pacing.trim().parse().map_err(|e| {
                AppError::config(format!("Invalid PACING_MS value '{}': {}", pacing, e))
            })?;
        }

        if let Ok(method) = std::env::var("RPC_METHOD") {
            let method = method.trim();
            if !method.is_empty() {
                self.rpc_method = method.to_string();
            }
        }

        if let Ok(policy) = std::env::var("FAILURE_POLICY") {
            self.failure_policy = policy.parse()?;
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse().map_err(|e| {
                AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e))
            })?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_catalog() -> String {
    crate::defaults::DEFAULT_CATALOG.to_string()
}

fn default_batch_count() -> usize {
    crate::defaults::DEFAULT_BATCH_COUNT
}

fn default_probe_timeout_ms() -> u64 {
    crate::defaults::DEFAULT_PROBE_TIMEOUT.as_millis() as u64
}

fn default_pacing_ms() -> u64 {
    crate::defaults::DEFAULT_PACING.as_millis() as u64
}

fn default_rpc_method() -> String {
    crate::defaults::DEFAULT_RPC_METHOD.to_string()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.batch_count, 6);
        assert_eq!(config.probe_timeout(), Duration::from_millis(1000));
        assert_eq!(config.pacing(), Duration::from_millis(300));
        assert_eq!(config.rpc_method, "getTransactionCount");
        assert_eq!(config.failure_policy, FailurePolicy::Exclude);
    }

    #[test]
    fn test_batch_count_needs_a_measured_batch() {
        let mut config = Config::default();
        config.batch_count = 1;
        assert!(config.validate().is_err());

        config.batch_count = 2;
        assert!(config.validate().is_ok());

        config.batch_count = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_invalid() {
        let mut config = Config::default();
        config.probe_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_pacing_allowed() {
        let mut config = Config::default();
        config.pacing_ms = 0;
        assert!(config.validate().is_ok());

        config.pacing_ms = 60_001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_catalog_url_scheme() {
        let mut config = Config::default();
        config.catalog = "https://example.com/rpcnsList.json".to_string();
        assert!(config.catalog_is_remote());
        assert!(config.validate().is_ok());

        config.catalog = "ftp://example.com/rpcnsList.json".to_string();
        assert!(config.validate().is_err());

        config.catalog = "   ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_method_invalid() {
        let mut config = Config::default();
        config.rpc_method = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"batch_count": 3, "failure_policy": "invalidate"}"#).unwrap();
        assert_eq!(config.batch_count, 3);
        assert_eq!(config.failure_policy, FailurePolicy::Invalidate);
        assert_eq!(config.catalog, crate::defaults::DEFAULT_CATALOG);
        assert!(config.enable_color);
    }
}
