//! Probe outcomes, per-endpoint run results and run summaries

use crate::models::endpoint::EndpointDescriptor;
use crate::types::FailurePolicy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a single timed probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// Response received and decoded within the timeout
    Success {
        /// Request start to decode completion, in milliseconds
        latency_ms: f64,
        /// The reply's `result` field, surfaced for display only
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<serde_json::Value>,
    },
    /// Timeout, network or decode failure
    Failure { cause: String },
}

impl ProbeOutcome {
    /// Create a successful outcome without a result value
    pub fn success(latency_ms: f64) -> Self {
        Self::Success {
            latency_ms,
            result: None,
        }
    }

    /// Create a successful outcome carrying the decoded result
    pub fn success_with_result(latency_ms: f64, result: Option<serde_json::Value>) -> Self {
        Self::Success { latency_ms, result }
    }

    /// Create a failed outcome
    pub fn failure(cause: impl Into<String>) -> Self {
        Self::Failure {
            cause: cause.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Latency if the probe succeeded
    pub fn latency_ms(&self) -> Option<f64> {
        match self {
            Self::Success { latency_ms, .. } => Some(*latency_ms),
            Self::Failure { .. } => None,
        }
    }

    /// Failure cause if the probe failed
    pub fn cause(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { cause } => Some(cause.as_str()),
        }
    }

    pub fn result(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Success { result, .. } => result.as_ref(),
            Self::Failure { .. } => None,
        }
    }
}

/// One recorded probe for one endpoint in one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeSample {
    /// Batch index; 0 is the warm-up batch
    pub batch: usize,
    pub outcome: ProbeOutcome,
    pub recorded_at: DateTime<Utc>,
}

impl ProbeSample {
    pub fn new(batch: usize, outcome: ProbeOutcome) -> Self {
        Self {
            batch,
            outcome,
            recorded_at: Utc::now(),
        }
    }

    /// Whether the sample counts toward the average
    pub fn is_measured(&self) -> bool {
        self.batch > 0
    }
}

/// Accumulated samples of one endpoint over one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointRunResult {
    pub endpoint: EndpointDescriptor,

    /// Samples in batch order
    pub samples: Vec<ProbeSample>,

    /// Average over measured batches, rounded to one decimal; set by the aggregator
    pub average_ms: Option<f64>,

    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl EndpointRunResult {
    pub fn new(endpoint: EndpointDescriptor) -> Self {
        Self {
            endpoint,
            samples: Vec::new(),
            average_ms: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn identity(&self) -> &str {
        &self.endpoint.name
    }

    /// Record the outcome of a batch
    pub fn record(&mut self, batch: usize, outcome: ProbeOutcome) {
        self.samples.push(ProbeSample::new(batch, outcome));
    }

    /// Sample recorded for a given batch
    pub fn sample(&self, batch: usize) -> Option<&ProbeSample> {
        self.samples.iter().find(|s| s.batch == batch)
    }

    /// Number of recorded batches, warm-up included
    pub fn recorded_batches(&self) -> usize {
        self.samples.len()
    }

    /// Samples that count toward the average
    pub fn measured_samples(&self) -> impl Iterator<Item = &ProbeSample> {
        self.samples.iter().filter(|s| s.is_measured())
    }

    pub fn measured_failures(&self) -> usize {
        self.measured_samples().filter(|s| !s.outcome.is_success()).count()
    }

    pub fn measured_successes(&self) -> usize {
        self.measured_samples().filter(|s| s.outcome.is_success()).count()
    }

    pub fn mark_completed(&mut self) {
        self.completed_at = Some(Utc::now());
    }
}

/// Per-endpoint results of one run, in catalog order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResults {
    pub run_id: String,
    pub category: String,
    pub batch_count: usize,
    pub entries: Vec<EndpointRunResult>,
}

impl RunResults {
    pub fn new(run_id: impl Into<String>, category: impl Into<String>, batch_count: usize) -> Self {
        Self {
            run_id: run_id.into(),
            category: category.into(),
            batch_count,
            entries: Vec::new(),
        }
    }

    /// Look up an endpoint's result by identity
    pub fn get(&self, identity: &str) -> Option<&EndpointRunResult> {
        self.entries.iter().find(|e| e.identity() == identity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EndpointRunResult> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Average of one endpoint in a run summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointAverage {
    pub identity: String,
    pub network: String,
    pub target: String,
    /// `None` when the failure policy leaves the endpoint without a mean
    pub average_ms: Option<f64>,
    /// Measured batches that succeeded
    pub measured: usize,
    /// Measured batches that failed
    pub failed: usize,
}

impl EndpointAverage {
    /// Average formatted the way reports show it
    pub fn format_average(&self) -> String {
        match self.average_ms {
            Some(avg) => format!("{:.1}ms", avg),
            None => "n/a".to_string(),
        }
    }
}

/// Slowest or fastest endpoint of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointExtreme {
    pub identity: String,
    pub average_ms: f64,
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub category: String,
    pub batch_count: usize,
    pub failure_policy: FailurePolicy,
    /// Endpoint averages in catalog order
    pub averages: Vec<EndpointAverage>,
    pub slowest: Option<EndpointExtreme>,
    pub fastest: Option<EndpointExtreme>,
    pub completed_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn is_empty(&self) -> bool {
        self.averages.is_empty()
    }

    /// Average of a given endpoint, if it has one
    pub fn average_for(&self, identity: &str) -> Option<f64> {
        self.averages
            .iter()
            .find(|a| a.identity == identity)
            .and_then(|a| a.average_ms)
    }

    /// Difference between slowest and fastest averages
    pub fn spread_ms(&self) -> Option<f64> {
        match (&self.slowest, &self.fastest) {
            (Some(slowest), Some(fastest)) => Some(round_one_decimal(slowest.average_ms - fastest.average_ms)),
            _ => None,
        }
    }
}

/// Round to one decimal place, the precision reports use
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
