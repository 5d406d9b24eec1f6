//! Result reporter implementations

use super::{formatter::OutputFormatter, ResultReporter};
use crate::{
    error::Result,
    models::{EndpointDescriptor, ProbeOutcome, RunSummary},
    registry::ResultsRegistry,
    types::Category,
};
use serde::Serialize;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

/// Reporter that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl ResultReporter for NullReporter {
    fn on_batch_progress(&self, _batch: usize, _requested: usize, _responded: usize) {}
    fn on_probe_result(&self, _endpoint: &EndpointDescriptor, _batch: usize, _outcome: &ProbeOutcome) {}
    fn on_run_complete(&self, _summary: &RunSummary) {}
}

/// Prints progress, probe lines and summaries to stdout
pub struct TerminalReporter {
    formatter: Box<dyn OutputFormatter>,
    verbose: bool,
    current_batch: AtomicUsize,
}

impl TerminalReporter {
    pub fn new(formatter: Box<dyn OutputFormatter>, verbose: bool) -> Self {
        Self {
            formatter,
            verbose,
            current_batch: AtomicUsize::new(usize::MAX),
        }
    }

    /// Print a category header before a run starts
    pub fn announce(&self, category: Category, endpoints: usize) {
        println!();
        println!(
            "{}",
            self.formatter
                .format_header(&format!("Testing {} endpoints ({})", category, endpoints))
        );
    }
}

impl ResultReporter for TerminalReporter {
    fn on_run_start(&self, category: Category, endpoints: usize) {
        self.announce(category, endpoints);
    }

    fn on_batch_progress(&self, batch: usize, requested: usize, responded: usize) {
        let previous = self.current_batch.swap(batch, Ordering::SeqCst);
        if previous != batch {
            println!("{}", self.formatter.format_batch_start(batch, requested, responded));
        } else if self.verbose {
            println!("{}", self.formatter.format_progress(batch, requested, responded));
        }
    }

    fn on_probe_result(&self, endpoint: &EndpointDescriptor, batch: usize, outcome: &ProbeOutcome) {
        println!("{}", self.formatter.format_probe_result(endpoint, batch, outcome));
    }

    fn on_run_complete(&self, summary: &RunSummary) {
        self.current_batch.store(usize::MAX, Ordering::SeqCst);
        println!();
        println!("{}", self.formatter.format_summary(summary));
    }

    fn on_category_overhead(&self, baseline: Category, candidate: Category, overhead_ms: f64) {
        println!("{}", self.formatter.format_overhead(baseline, candidate, overhead_ms));
    }
}

/// Silent during runs; collects summaries for one JSON document at the end
#[derive(Debug, Default)]
pub struct JsonReporter {
    summaries: Mutex<Vec<RunSummary>>,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    summaries: &'a [RunSummary],
    registry: &'a ResultsRegistry,
}

impl JsonReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Summaries collected so far, in run order
    pub fn summaries(&self) -> Vec<RunSummary> {
        match self.summaries.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Render collected summaries together with the registry
    pub fn render(&self, registry: &ResultsRegistry) -> Result<String> {
        let summaries = self.summaries();
        let document = JsonDocument {
            summaries: &summaries,
            registry,
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

impl ResultReporter for JsonReporter {
    fn on_batch_progress(&self, _batch: usize, _requested: usize, _responded: usize) {}

    fn on_probe_result(&self, _endpoint: &EndpointDescriptor, _batch: usize, _outcome: &ProbeOutcome) {}

    fn on_run_complete(&self, summary: &RunSummary) {
        match self.summaries.lock() {
            Ok(mut guard) => guard.push(summary.clone()),
            Err(poisoned) => poisoned.into_inner().push(summary.clone()),
        }
    }
}

/// One reporter callback, as captured by [`RecordingReporter`]
#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    RunStart {
        category: Category,
        endpoints: usize,
    },
    BatchProgress {
        batch: usize,
        requested: usize,
        responded: usize,
    },
    ProbeResult {
        identity: String,
        batch: usize,
        outcome: ProbeOutcome,
    },
    RunComplete(RunSummary),
    CategoryOverhead {
        baseline: Category,
        candidate: Category,
        overhead_ms: f64,
    },
}

/// Records every callback in order
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ReportEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReportEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Probe results only, in arrival order
    pub fn probe_results(&self) -> Vec<(String, usize, ProbeOutcome)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ReportEvent::ProbeResult {
                    identity,
                    batch,
                    outcome,
                } => Some((identity, batch, outcome)),
                _ => None,
            })
            .collect()
    }

    pub fn summaries(&self) -> Vec<RunSummary> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ReportEvent::RunComplete(summary) => Some(summary),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ReportEvent) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

impl ResultReporter for RecordingReporter {
    fn on_run_start(&self, category: Category, endpoints: usize) {
        self.push(ReportEvent::RunStart { category, endpoints });
    }

    fn on_batch_progress(&self, batch: usize, requested: usize, responded: usize) {
        self.push(ReportEvent::BatchProgress {
            batch,
            requested,
            responded,
        });
    }

    fn on_probe_result(&self, endpoint: &EndpointDescriptor, batch: usize, outcome: &ProbeOutcome) {
        self.push(ReportEvent::ProbeResult {
            identity: endpoint.name.clone(),
            batch,
            outcome: outcome.clone(),
        });
    }

    fn on_run_complete(&self, summary: &RunSummary) {
        self.push(ReportEvent::RunComplete(summary.clone()));
    }

    fn on_category_overhead(&self, baseline: Category, candidate: Category, overhead_ms: f64) {
        self.push(ReportEvent::CategoryOverhead {
            baseline,
            candidate,
            overhead_ms,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FailurePolicy;

    fn empty_summary(category: &str) -> RunSummary {
        RunSummary {
            run_id: "r".to_string(),
            category: category.to_string(),
            batch_count: 6,
            failure_policy: FailurePolicy::Exclude,
            averages: Vec::new(),
            slowest: None,
            fastest: None,
            completed_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_recording_reporter_keeps_order() {
        let reporter = RecordingReporter::new();
        let endpoint = EndpointDescriptor::new("a", "centralized", "mainnet", "https://a");

        reporter.on_batch_progress(0, 1, 0);
        reporter.on_probe_result(&endpoint, 0, &ProbeOutcome::success(5.0));
        reporter.on_run_complete(&empty_summary("centralized"));

        let events = reporter.events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], ReportEvent::BatchProgress { batch: 0, .. }));
        assert_eq!(reporter.probe_results()[0].0, "a");
        assert_eq!(reporter.summaries().len(), 1);
    }

    #[test]
    fn test_json_reporter_renders_summaries_and_registry() {
        let reporter = JsonReporter::new();
        reporter.on_run_complete(&empty_summary("distributed"));

        let rendered = reporter.render(&ResultsRegistry::new()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["summaries"][0]["category"], "distributed");
        assert!(value["registry"].is_object());
    }
}
