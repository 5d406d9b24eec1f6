//! Environment variable handling and .env file management

use crate::error::{AppError, ErrorContext, Result};
use crate::types::FailurePolicy;
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        Self::load_env_file_from(Path::new(".env"), debug)
    }

    /// Load a specific env file if it exists; existing variables win
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

            if debug {
                eprintln!("Loaded configuration from {}", path.display());
            }
        } else if debug {
            eprintln!("No {} found, using defaults and CLI arguments", path.display());
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# RPC Latency Bench Configuration
#
# Values here are defaults for rpcbench and can be overridden by
# environment variables and command-line arguments.

# Endpoint catalog: a local JSON file or an http(s) URL
# RPC_CATALOG=rpcnsList.json

# Batches per run; batch 0 is a warm-up and is not averaged
# BATCH_COUNT=6

# Per-probe deadline in milliseconds
# PROBE_TIMEOUT_MS=1000

# Pause after every batch in milliseconds
# PACING_MS=300

# JSON-RPC method sent with every probe
# RPC_METHOD=getTransactionCount

# Failed measured batches: exclude (drop from the mean) or invalidate (no average)
# FAILURE_POLICY=exclude

# Enable colored output (true/false)
# ENABLE_COLOR=true

# Example: a quick remote smoke run
# RPC_CATALOG=https://example.com/rpcnsList.json
# BATCH_COUNT=3
# PACING_MS=0
"#
        .to_string()
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        let content = Self::create_example_env_content();
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write example .env file {}", path.display()))
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "RPC_CATALOG" => {
                if value.is_empty() {
                    return Err(AppError::config("RPC_CATALOG cannot be empty"));
                }
                if value.contains("://") {
                    let parsed = url::Url::parse(value)
                        .map_err(|e| AppError::config(format!("Invalid RPC_CATALOG URL '{}': {}", value, e)))?;
                    if parsed.scheme() != "http" && parsed.scheme() != "https" {
                        return Err(AppError::config(format!("RPC_CATALOG must use http or https: {}", value)));
                    }
                }
            }
            "BATCH_COUNT" => {
                let count: usize = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid BATCH_COUNT value '{}': {}", value, e)))?;
                if !(crate::defaults::MIN_BATCH_COUNT..=crate::defaults::MAX_BATCH_COUNT).contains(&count) {
                    return Err(AppError::config(format!(
                        "BATCH_COUNT must be between {} and {}, got: {}",
                        crate::defaults::MIN_BATCH_COUNT,
                        crate::defaults::MAX_BATCH_COUNT,
                        count
                    )));
                }
            }
            "PROBE_TIMEOUT_MS" => {
                let timeout: u64 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid PROBE_TIMEOUT_MS value '{}': {}", value, e)))?;
                if timeout == 0 || timeout > crate::defaults::MAX_PROBE_TIMEOUT_MS {
                    return Err(AppError::config(format!(
                        "PROBE_TIMEOUT_MS must be between 1 and {}, got: {}",
                        crate::defaults::MAX_PROBE_TIMEOUT_MS,
                        timeout
                    )));
                }
            }
            "PACING_MS" => {
                let pacing: u64 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid PACING_MS value '{}': {}", value, e)))?;
                if pacing > crate::defaults::MAX_PACING_MS {
                    return Err(AppError::config(format!(
                        "PACING_MS cannot exceed {}, got: {}",
                        crate::defaults::MAX_PACING_MS,
                        pacing
                    )));
                }
            }
            "RPC_METHOD" => {
                if value.is_empty() || value.chars().any(char::is_whitespace) {
                    return Err(AppError::config(format!("Invalid RPC_METHOD value '{}'", value)));
                }
            }
            "FAILURE_POLICY" => {
                value.parse::<FailurePolicy>()?;
            }
            "ENABLE_COLOR" => {
                value
                    .parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e)))?;
            }
            _ => {}
        }

        Ok(())
    }

    /// All supported environment variables with descriptions and examples
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("RPC_CATALOG", "Endpoint catalog path or http(s) URL", "rpcnsList.json"),
            ("BATCH_COUNT", "Batches per run including warm-up (2-100)", "6"),
            ("PROBE_TIMEOUT_MS", "Per-probe deadline in milliseconds (1-60000)", "1000"),
            ("PACING_MS", "Pause after each batch in milliseconds (0-60000)", "300"),
            ("RPC_METHOD", "JSON-RPC method sent with every probe", "getTransactionCount"),
            ("FAILURE_POLICY", "exclude or invalidate", "exclude"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<18} {}\n", var, description));
            help.push_str(&format!("  {:<18} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Vec<String> {
        Self::get_supported_env_vars()
            .into_iter()
            .filter_map(|(name, _, _)| {
                let value = std::env::var(name).ok()?;
                Self::validate_env_var(name, &value).err().map(|e| format!("Warning: {}", e))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_example_content_lists_every_variable() {
        let content = EnvManager::create_example_env_content();

        for (name, _, _) in EnvManager::get_supported_env_vars() {
            assert!(content.contains(&format!("{}=", name)), "missing {}", name);
        }
    }

    #[test]
    fn test_save_example_file() {
        let temp_file = NamedTempFile::new().unwrap();
        EnvManager::save_example_env_file(temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("RPC Latency Bench Configuration"));
    }

    #[test]
    fn test_validate_env_var() {
        assert!(EnvManager::validate_env_var("RPC_CATALOG", "rpcnsList.json").is_ok());
        assert!(EnvManager::validate_env_var("RPC_CATALOG", "https://example.com/list.json").is_ok());
        assert!(EnvManager::validate_env_var("BATCH_COUNT", "6").is_ok());
        assert!(EnvManager::validate_env_var("PROBE_TIMEOUT_MS", "1000").is_ok());
        assert!(EnvManager::validate_env_var("PACING_MS", "0").is_ok());
        assert!(EnvManager::validate_env_var("RPC_METHOD", "getBlockHeight").is_ok());
        assert!(EnvManager::validate_env_var("FAILURE_POLICY", "invalidate").is_ok());
        assert!(EnvManager::validate_env_var("ENABLE_COLOR", "false").is_ok());
        assert!(EnvManager::validate_env_var("SOMETHING_ELSE", "whatever").is_ok());

        assert!(EnvManager::validate_env_var("RPC_CATALOG", "").is_err());
        assert!(EnvManager::validate_env_var("RPC_CATALOG", "ftp://example.com/list.json").is_err());
        assert!(EnvManager::validate_env_var("BATCH_COUNT", "1").is_err());
        assert!(EnvManager::validate_env_var("BATCH_COUNT", "101").is_err());
        assert!(EnvManager::validate_env_var("PROBE_TIMEOUT_MS", "0").is_err());
        assert!(EnvManager::validate_env_var("PROBE_TIMEOUT_MS", "60001").is_err());
        assert!(EnvManager::validate_env_var("PACING_MS", "-1").is_err());
        assert!(EnvManager::validate_env_var("RPC_METHOD", "get count").is_err());
        assert!(EnvManager::validate_env_var("FAILURE_POLICY", "ignore").is_err());
        assert!(EnvManager::validate_env_var("ENABLE_COLOR", "maybe").is_err());
    }

    #[test]
    fn test_save_example_file_to_missing_dir() {
        let err = EnvManager::save_example_env_file(Path::new("/nonexistent-dir/.env.example")).unwrap_err();
        assert_eq!(err.category(), "IO");
        assert!(err.to_string().contains("/nonexistent-dir/.env.example"));
    }

    #[test]
    fn test_display_env_help() {
        let help = EnvManager::display_env_help();

        assert!(help.contains("Supported Environment Variables:"));
        assert!(help.contains("RPC_CATALOG"));
        assert!(help.contains("FAILURE_POLICY"));
        assert!(help.contains("Configuration Priority"));
    }

    #[test]
    fn test_validate_current_env_reports_bad_values() {
        let _guard = crate::config::ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        for (name, _, _) in EnvManager::get_supported_env_vars() {
            std::env::remove_var(name);
        }
        assert!(EnvManager::validate_current_env().is_empty());

        std::env::set_var("BATCH_COUNT", "zero");
        let warnings = EnvManager::validate_current_env();
        std::env::remove_var("BATCH_COUNT");

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("BATCH_COUNT"));
    }

    #[test]
    fn test_load_env_file_from_path() {
        let _guard = crate::config::ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::remove_var("RPC_METHOD");

        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "RPC_METHOD=getSlot\n").unwrap();
        EnvManager::load_env_file_from(file.path(), false).unwrap();

        assert_eq!(std::env::var("RPC_METHOD").unwrap(), "getSlot");
        std::env::remove_var("RPC_METHOD");
    }
}
