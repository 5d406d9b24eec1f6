//! RPC Latency Bench
//!
//! A batch-based latency benchmark for JSON-RPC endpoints. Endpoints are
//! grouped as centralized, distributed or secured; every run probes all
//! endpoints of one group concurrently over several batches, discards the
//! warm-up batch and reports per-endpoint averages plus the slowest and
//! fastest endpoint.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod output;
pub mod registry;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use catalog::{CatalogSource, EndpointCatalog};
pub use client::{Prober, RpcProbeClient};
pub use error::{AppError, ProbeError, Result};
pub use executor::{BatchRunner, RunnerConfig};
pub use models::{
    Config, EndpointAverage, EndpointDescriptor, EndpointExtreme, EndpointRunResult, ProbeOutcome,
    ProbeSample, RunResults, RunSummary,
};
pub use output::{JsonReporter, NullReporter, ResultReporter, TerminalReporter};
pub use registry::ResultsRegistry;
pub use stats::Aggregator;
pub use types::{Category, CategorySelection, FailurePolicy};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    /// One warm-up batch plus five measured ones
    pub const DEFAULT_BATCH_COUNT: usize = 6;
    pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(1000);
    pub const DEFAULT_PACING: Duration = Duration::from_millis(300);
    pub const DEFAULT_CATALOG: &str = "rpcnsList.json";
    pub const DEFAULT_RPC_METHOD: &str = "getTransactionCount";
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    pub const JSONRPC_VERSION: &str = "2.0";
    /// Request id sent with every probe; the literal string "null"
    pub const JSONRPC_REQUEST_ID: &str = "null";

    pub const MIN_BATCH_COUNT: usize = 2;
    pub const MAX_BATCH_COUNT: usize = 100;
    pub const MAX_PROBE_TIMEOUT_MS: u64 = 60_000;
    pub const MAX_PACING_MS: u64 = 60_000;
}
