//! Batch execution engine
//!
//! Runs a fixed number of batches over a set of endpoints. Every batch
//! probes all endpoints concurrently and waits for all of them to settle;
//! batches run strictly one after another with a pacing pause after each.
//! Batch 0 is a warm-up whose samples are recorded but never averaged.

use crate::{
    client::Prober,
    logging::{Logger, RunLogger},
    models::{Config, EndpointDescriptor, EndpointRunResult, ProbeOutcome, RunResults},
    output::ResultReporter,
};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Batch execution configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Batches per run, warm-up included
    pub batch_count: usize,
    /// Pause after every batch; not part of any latency
    pub pacing: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            batch_count: crate::defaults::DEFAULT_BATCH_COUNT,
            pacing: crate::defaults::DEFAULT_PACING,
        }
    }
}

impl From<&Config> for RunnerConfig {
    fn from(config: &Config) -> Self {
        Self {
            batch_count: config.batch_count,
            pacing: config.pacing(),
        }
    }
}

/// Request counters for one batch
#[derive(Debug, Default)]
struct ProgressCounters {
    requested: AtomicUsize,
    responded: AtomicUsize,
}

impl ProgressCounters {
    fn dispatch(&self, count: usize) -> usize {
        self.requested.fetch_add(count, Ordering::SeqCst) + count
    }

    fn settle(&self, outcome: &ProbeOutcome) {
        if outcome.is_success() {
            self.responded.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn snapshot(&self) -> (usize, usize) {
        (
            self.requested.load(Ordering::SeqCst),
            self.responded.load(Ordering::SeqCst),
        )
    }
}

/// Drives batches of concurrent probes over a set of endpoints
pub struct BatchRunner<P: Prober> {
    prober: P,
    config: RunnerConfig,
    run_logger: RunLogger,
}

impl<P: Prober> BatchRunner<P> {
    pub fn new(prober: P, config: RunnerConfig) -> Self {
        Self {
            prober,
            config,
            run_logger: RunLogger::new(Logger::quiet("RUNNER")),
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.run_logger = RunLogger::new(logger);
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn prober(&self) -> &P {
        &self.prober
    }

    /// Run all batches over `endpoints`.
    ///
    /// Returns one entry per endpoint in input order, each holding exactly
    /// `batch_count` samples. An empty endpoint list returns immediately
    /// without running or pacing any batch.
    pub async fn run(
        &self,
        category: &str,
        endpoints: &[EndpointDescriptor],
        reporter: &dyn ResultReporter,
    ) -> RunResults {
        let mut results = RunResults::new(Uuid::new_v4().to_string(), category, self.config.batch_count);

        if endpoints.is_empty() {
            self.run_logger
                .logger()
                .debug("No endpoints to probe")
                .field("category", category)
                .log()
                .await;
            return results;
        }

        results.entries = endpoints.iter().cloned().map(EndpointRunResult::new).collect();

        for batch in 0..self.config.batch_count {
            let outcomes = self.run_batch(batch, endpoints, reporter).await;

            for (entry, outcome) in results.entries.iter_mut().zip(outcomes) {
                entry.record(batch, outcome);
            }

            tokio::time::sleep(self.config.pacing).await;
        }

        for entry in &mut results.entries {
            entry.mark_completed();
        }

        results
    }

    /// Dispatch one probe per endpoint and wait for all of them
    async fn run_batch(
        &self,
        batch: usize,
        endpoints: &[EndpointDescriptor],
        reporter: &dyn ResultReporter,
    ) -> Vec<ProbeOutcome> {
        self.run_logger
            .log_batch_start(batch, self.config.batch_count, endpoints.len())
            .await;

        let counters = &ProgressCounters::default();
        let requested = counters.dispatch(endpoints.len());
        let (_, responded) = counters.snapshot();
        reporter.on_batch_progress(batch, requested, responded);

        let started = Instant::now();
        let probes = endpoints.iter().map(|endpoint| async move {
            let outcome = self.prober.probe(endpoint).await;

            counters.settle(&outcome);
            if !outcome.is_success() {
                self.run_logger.log_probe_failure(endpoint, batch, &outcome).await;
            }

            reporter.on_probe_result(endpoint, batch, &outcome);
            let (requested, responded) = counters.snapshot();
            reporter.on_batch_progress(batch, requested, responded);

            outcome
        });

        // join_all keeps input order, so outcomes line up with `endpoints`
        let outcomes = join_all(probes).await;

        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        self.run_logger
            .log_batch_complete(batch, succeeded, outcomes.len() - succeeded, started.elapsed())
            .await;

        outcomes
    }
}
