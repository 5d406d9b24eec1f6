//! Process-wide store of the latest results per endpoint and per category

use crate::{
    models::{metrics::round_one_decimal, EndpointRunResult, RunResults, RunSummary},
    types::Category,
};
use serde::Serialize;
use std::collections::HashMap;

/// Latest run result per endpoint identity plus latest summary per category.
///
/// Recording a run overwrites whatever an earlier run stored for the same
/// identity or category.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ResultsRegistry {
    endpoints: HashMap<String, EndpointRunResult>,
    summaries: HashMap<String, RunSummary>,
}

impl ResultsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a finished run; replaces entries from earlier runs
    pub fn record(&mut self, results: &RunResults, summary: &RunSummary) {
        for entry in results.iter() {
            self.insert(entry.clone());
        }
        self.summaries.insert(summary.category.clone(), summary.clone());
    }

    /// Insert or overwrite a single endpoint's result
    pub fn insert(&mut self, result: EndpointRunResult) -> Option<EndpointRunResult> {
        self.endpoints.insert(result.identity().to_string(), result)
    }

    pub fn get(&self, identity: &str) -> Option<&EndpointRunResult> {
        self.endpoints.get(identity)
    }

    /// Latest summary for a category
    pub fn summary(&self, category: Category) -> Option<&RunSummary> {
        self.summaries.get(category.tag())
    }

    /// Fastest average of `candidate` minus fastest average of `baseline`,
    /// using the latest summary of each. Compares fastest against fastest
    /// rather than the first endpoint listed in each category.
    pub fn category_overhead(&self, baseline: Category, candidate: Category) -> Option<f64> {
        let baseline_fastest = self.summary(baseline)?.fastest.as_ref()?.average_ms;
        let candidate_fastest = self.summary(candidate)?.fastest.as_ref()?.average_ms;
        Some(round_one_decimal(candidate_fastest - baseline_fastest))
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Identities currently stored, sorted
    pub fn identities(&self) -> Vec<&str> {
        let mut identities: Vec<&str> = self.endpoints.keys().map(String::as_str).collect();
        identities.sort_unstable();
        identities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EndpointDescriptor, EndpointExtreme, ProbeOutcome};
    use crate::types::FailurePolicy;

    fn run(category: &str, name: &str, latency: f64) -> (RunResults, RunSummary) {
        let mut results = RunResults::new("run", category, 2);
        let mut entry = EndpointRunResult::new(EndpointDescriptor::new(name, category, "mainnet", "https://x"));
        entry.record(0, ProbeOutcome::success(latency));
        entry.record(1, ProbeOutcome::success(latency));
        entry.average_ms = Some(latency);
        results.entries.push(entry);

        let summary = RunSummary {
            run_id: "run".to_string(),
            category: category.to_string(),
            batch_count: 2,
            failure_policy: FailurePolicy::Exclude,
            averages: Vec::new(),
            slowest: Some(EndpointExtreme {
                identity: name.to_string(),
                average_ms: latency,
            }),
            fastest: Some(EndpointExtreme {
                identity: name.to_string(),
                average_ms: latency,
            }),
            completed_at: chrono::Utc::now(),
        };
        (results, summary)
    }

    #[test]
    fn test_second_run_replaces_first() {
        let mut registry = ResultsRegistry::new();

        let (first, first_summary) = run("centralized", "frankfurt", 40.0);
        registry.record(&first, &first_summary);
        let (second, second_summary) = run("centralized", "frankfurt", 25.0);
        registry.record(&second, &second_summary);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("frankfurt").unwrap().average_ms, Some(25.0));
        assert_eq!(
            registry.summary(Category::Centralized).unwrap().fastest.as_ref().unwrap().average_ms,
            25.0
        );
    }

    #[test]
    fn test_category_overhead() {
        let mut registry = ResultsRegistry::new();
        assert_eq!(registry.category_overhead(Category::Distributed, Category::Secured), None);

        let (distributed, distributed_summary) = run("distributed", "anycast", 20.4);
        registry.record(&distributed, &distributed_summary);
        assert_eq!(registry.category_overhead(Category::Distributed, Category::Secured), None);

        let (secured, secured_summary) = run("secured", "shielded", 35.6);
        registry.record(&secured, &secured_summary);

        assert_eq!(
            registry.category_overhead(Category::Distributed, Category::Secured),
            Some(15.2)
        );
        assert_eq!(registry.identities(), vec!["anycast", "shielded"]);
    }

    #[test]
    fn test_overhead_needs_a_fastest_endpoint() {
        let mut registry = ResultsRegistry::new();
        let (distributed, mut summary) = run("distributed", "anycast", 20.0);
        summary.fastest = None;
        registry.record(&distributed, &summary);

        let (secured, secured_summary) = run("secured", "shielded", 30.0);
        registry.record(&secured, &secured_summary);

        assert_eq!(registry.category_overhead(Category::Distributed, Category::Secured), None);
    }

    #[test]
    fn test_overhead_compares_fastest_endpoints_not_catalog_order() {
        let aggregated = |category: &str, endpoints: &[(&str, f64)]| {
            let mut results = RunResults::new(category, category, 2);
            for (name, latency) in endpoints {
                let mut entry =
                    EndpointRunResult::new(EndpointDescriptor::new(*name, category, "mainnet", "https://x"));
                entry.record(0, ProbeOutcome::success(*latency));
                entry.record(1, ProbeOutcome::success(*latency));
                results.entries.push(entry);
            }
            let summary = crate::stats::Aggregator::default().aggregate(&mut results);
            (results, summary)
        };

        let mut registry = ResultsRegistry::new();
        let (distributed, distributed_summary) = aggregated("distributed", &[("slow-dist", 50.0), ("fast-dist", 10.0)]);
        registry.record(&distributed, &distributed_summary);
        let (secured, secured_summary) = aggregated("secured", &[("slow-sec", 90.0), ("fast-sec", 30.0)]);
        registry.record(&secured, &secured_summary);

        // First-listed endpoints would give 40.0
        assert_eq!(
            registry.category_overhead(Category::Distributed, Category::Secured),
            Some(20.0)
        );
    }
}
