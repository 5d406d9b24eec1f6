//! Configuration parsing from CLI arguments and environment variables

use crate::{cli::Cli, config::env::EnvManager, error::Result, models::Config};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Defaults, then .env, then environment, then CLI; validated last
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        EnvManager::load_env_file(self.cli.debug)?;
        if self.cli.debug {
            for warning in EnvManager::validate_current_env() {
                eprintln!("{}", warning);
            }
        }
        config.merge_from_env()?;
        self.apply_cli_overrides(&mut config);
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(ref catalog) = self.cli.catalog {
            config.catalog = catalog.clone();
        }
        if let Some(batches) = self.cli.batches {
            config.batch_count = batches;
        }
        if let Some(timeout_ms) = self.cli.timeout_ms {
            config.probe_timeout_ms = timeout_ms;
        }
        if let Some(pacing_ms) = self.cli.pacing_ms {
            config.pacing_ms = pacing_ms;
        }
        if let Some(ref method) = self.cli.method {
            config.rpc_method = method.clone();
        }
        if let Some(policy) = self.cli.failure_policy {
            config.failure_policy = policy;
        }

        if self.cli.color {
            config.enable_color = true;
        }
        if self.cli.no_color {
            config.enable_color = false;
        }

        // CLI-only flags
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;
        config.json_output = self.cli.json;

        if config.debug {
            eprintln!(
                "Applied CLI overrides: catalog={}, batch_count={}, probe_timeout={}ms, pacing={}ms",
                config.catalog, config.batch_count, config.probe_timeout_ms, config.pacing_ms
            );
        }
    }
}

/// Load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Configuration summary for debug output
pub fn display_config_summary(config: &Config) -> String {
    let summary = [
        format!("Catalog: {}", config.catalog),
        format!("Batches: {} (1 warm-up)", config.batch_count),
        format!("Probe Timeout: {}ms", config.probe_timeout_ms),
        format!("Pacing: {}ms", config.pacing_ms),
        format!("RPC Method: {}", config.rpc_method),
        format!("Failure Policy: {}", config.failure_policy),
        format!("Color Output: {}", config.enable_color),
        format!("Verbose: {}", config.verbose),
        format!("Debug: {}", config.debug),
        format!("JSON Output: {}", config.json_output),
    ];

    summary.join("\n")
}
