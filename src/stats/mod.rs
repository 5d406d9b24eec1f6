//! Aggregation of batch samples into per-endpoint averages

use crate::{
    models::{
        metrics::round_one_decimal, EndpointAverage, EndpointExtreme, EndpointRunResult, RunResults,
        RunSummary,
    },
    types::FailurePolicy,
};
use chrono::Utc;

/// Reduces run results into averages plus slowest and fastest endpoints
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    policy: FailurePolicy,
}

impl Aggregator {
    pub fn new(policy: FailurePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Average of the measured batches of one endpoint, rounded to one decimal.
    ///
    /// Batch 0 never contributes. `None` when the failure policy leaves
    /// the endpoint without a mean.
    pub fn endpoint_average(&self, result: &EndpointRunResult) -> Option<f64> {
        let mut sum = 0.0;
        let mut count = 0usize;

        for sample in result.measured_samples() {
            match sample.outcome.latency_ms() {
                Some(latency) => {
                    sum += latency;
                    count += 1;
                }
                None => {
                    if self.policy == FailurePolicy::Invalidate {
                        return None;
                    }
                }
            }
        }

        if count == 0 {
            None
        } else {
            Some(round_one_decimal(sum / count as f64))
        }
    }

    /// Aggregate a run.
    ///
    /// Stores each endpoint's rounded average back on its entry, so
    /// aggregating the same samples again gives the same summary values.
    pub fn aggregate(&self, results: &mut RunResults) -> RunSummary {
        let mut averages = Vec::with_capacity(results.len());

        for entry in results.entries.iter_mut() {
            entry.average_ms = self.endpoint_average(entry);
            averages.push(EndpointAverage {
                identity: entry.endpoint.name.clone(),
                network: entry.endpoint.network.clone(),
                target: entry.endpoint.target.clone(),
                average_ms: entry.average_ms,
                measured: entry.measured_successes(),
                failed: entry.measured_failures(),
            });
        }

        let (slowest, fastest) = extremes(&averages);

        RunSummary {
            run_id: results.run_id.clone(),
            category: results.category.clone(),
            batch_count: results.batch_count,
            failure_policy: self.policy,
            averages,
            slowest,
            fastest,
            completed_at: Utc::now(),
        }
    }
}

/// Slowest and fastest average; strict comparison keeps the first of equals
pub fn extremes(averages: &[EndpointAverage]) -> (Option<EndpointExtreme>, Option<EndpointExtreme>) {
    let mut slowest: Option<(&str, f64)> = None;
    let mut fastest: Option<(&str, f64)> = None;

    for average in averages {
        let Some(value) = average.average_ms else {
            continue;
        };

        if slowest.map_or(true, |(_, current)| value > current) {
            slowest = Some((average.identity.as_str(), value));
        }
        if fastest.map_or(true, |(_, current)| value < current) {
            fastest = Some((average.identity.as_str(), value));
        }
    }

    let to_extreme = |(identity, average_ms): (&str, f64)| EndpointExtreme {
        identity: identity.to_string(),
        average_ms,
    };

    (slowest.map(to_extreme), fastest.map(to_extreme))
}

// Additional comprehensive tests in separate module
#[cfg(test)]
mod comprehensive_tests;
