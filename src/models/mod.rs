//! Data models and structures for the latency benchmark

pub mod config;
pub mod endpoint;
pub mod metrics;

// Re-export main model types
pub use config::Config;
pub use endpoint::EndpointDescriptor;
pub use metrics::{
    EndpointAverage, EndpointExtreme, EndpointRunResult, ProbeOutcome, ProbeSample, RunResults,
    RunSummary,
};
