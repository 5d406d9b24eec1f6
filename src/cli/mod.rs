//! Command-line interface

use crate::error::Result;
use crate::types::{CategorySelection, FailurePolicy};
use clap::Parser;

/// RPC Latency Bench - batch-based latency comparison of JSON-RPC endpoints
#[derive(Parser, Debug, Clone)]
#[command(name = "rpcbench")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Category to benchmark: centralized, distributed, secured, or all
    #[arg(default_value = "centralized")]
    pub category: String,

    /// Endpoint catalog: JSON file path or http(s) URL
    #[arg(short, long)]
    pub catalog: Option<String>,

    /// Batches per run, warm-up batch included
    #[arg(short, long)]
    pub batches: Option<usize>,

    /// Per-probe deadline in milliseconds
    #[arg(short, long, value_parser = parse_millis)]
    pub timeout_ms: Option<u64>,

    /// Pause after every batch in milliseconds
    #[arg(long, value_parser = parse_millis)]
    pub pacing_ms: Option<u64>,

    /// JSON-RPC method sent with every probe
    #[arg(short, long)]
    pub method: Option<String>,

    /// How failed measured batches enter an average (exclude, invalidate)
    #[arg(long, value_parser = parse_failure_policy)]
    pub failure_policy: Option<FailurePolicy>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Print summaries and the results registry as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }
        if self.json && self.verbose {
            return Err("--verbose progress output cannot be combined with --json".to_string());
        }
        Ok(())
    }

    /// Parsed category selection
    pub fn category_selection(&self) -> Result<CategorySelection> {
        self.category.parse()
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }
}

/// Parse a millisecond count; rejects signs and hex
fn parse_millis(s: &str) -> std::result::Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid milliseconds: {}", s));
    }

    s.parse::<u64>().map_err(|_| format!("Invalid milliseconds: {}", s))
}

fn parse_failure_policy(s: &str) -> std::result::Result<FailurePolicy, String> {
    s.parse().map_err(|e: crate::error::AppError| e.to_string())
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    cfg!(unix)
}
