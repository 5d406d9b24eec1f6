//! Property-based tests for aggregation

use super::{extremes, Aggregator};
use crate::{
    models::{EndpointDescriptor, EndpointRunResult, ProbeOutcome, RunResults},
    types::FailurePolicy,
};
use proptest::collection::vec;
use proptest::prelude::*;

/// Property-based test generators
mod generators {
    use super::*;

    /// Latency in milliseconds with sub-millisecond precision
    pub fn latency() -> impl Strategy<Value = f64> {
        0.0f64..5000.0
    }

    /// Outcome that fails roughly one time in five
    pub fn outcome() -> impl Strategy<Value = ProbeOutcome> {
        prop_oneof![
            4 => latency().prop_map(ProbeOutcome::success),
            1 => prop_oneof![
                Just(ProbeOutcome::failure("timeout")),
                Just(ProbeOutcome::failure("network error: connection reset")),
                Just(ProbeOutcome::failure("decode error: expected value")),
            ],
        ]
    }

    /// One endpoint's samples over 2..=12 batches
    pub fn endpoint_result(name: String) -> impl Strategy<Value = EndpointRunResult> {
        vec(outcome(), 2..=12).prop_map(move |outcomes| {
            let mut result =
                EndpointRunResult::new(EndpointDescriptor::new(name.clone(), "centralized", "mainnet", "https://x"));
            for (batch, outcome) in outcomes.into_iter().enumerate() {
                result.record(batch, outcome);
            }
            result
        })
    }

    /// A run over 0..8 endpoints with unique identities
    pub fn run_results() -> impl Strategy<Value = RunResults> {
        (0usize..8)
            .prop_flat_map(|count| {
                (0..count)
                    .map(|idx| endpoint_result(format!("endpoint-{}", idx)))
                    .collect::<Vec<_>>()
            })
            .prop_map(|entries| {
                let mut results = RunResults::new("prop", "centralized", 6);
                results.entries = entries;
                results
            })
    }

    pub fn policy() -> impl Strategy<Value = FailurePolicy> {
        prop_oneof![Just(FailurePolicy::Exclude), Just(FailurePolicy::Invalidate)]
    }
}

mod property_tests {
    use super::*;

    proptest! {
        /// An average lies within the measured successful latencies
        #[test]
        fn average_between_measured_min_and_max(results in generators::run_results(), policy in generators::policy()) {
            let mut results = results;
            let summary = Aggregator::new(policy).aggregate(&mut results);

            for (entry, average) in results.iter().zip(&summary.averages) {
                if let Some(avg) = average.average_ms {
                    let measured: Vec<f64> = entry
                        .measured_samples()
                        .filter_map(|s| s.outcome.latency_ms())
                        .collect();
                    let min = measured.iter().cloned().fold(f64::INFINITY, f64::min);
                    let max = measured.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                    prop_assert!(avg >= min - 0.05 && avg <= max + 0.05);
                }
            }
        }

        /// The warm-up sample never changes the average
        #[test]
        fn warm_up_has_no_influence(results in generators::run_results(), warm_up in generators::outcome()) {
            let aggregator = Aggregator::default();
            let mut original = results.clone();
            let mut altered = results;
            for entry in altered.entries.iter_mut() {
                entry.samples[0].outcome = warm_up.clone();
            }

            let a = aggregator.aggregate(&mut original);
            let b = aggregator.aggregate(&mut altered);
            prop_assert_eq!(a.averages, b.averages);
        }

        /// Aggregating twice gives identical values
        #[test]
        fn aggregation_is_idempotent(results in generators::run_results(), policy in generators::policy()) {
            let aggregator = Aggregator::new(policy);
            let mut results = results;

            let first = aggregator.aggregate(&mut results);
            let second = aggregator.aggregate(&mut results);

            prop_assert_eq!(first.averages, second.averages);
            prop_assert_eq!(first.slowest, second.slowest);
            prop_assert_eq!(first.fastest, second.fastest);
        }

        /// Averages keep one decimal place
        #[test]
        fn averages_are_rounded(results in generators::run_results()) {
            let mut results = results;
            let summary = Aggregator::default().aggregate(&mut results);

            for average in summary.averages.iter().filter_map(|a| a.average_ms) {
                prop_assert!(((average * 10.0).round() - average * 10.0).abs() < 1e-6);
            }
        }

        /// Invalidate never produces an average Exclude would not
        #[test]
        fn invalidate_is_stricter_than_exclude(results in generators::run_results()) {
            let mut excluded = results.clone();
            let mut invalidated = results;

            let exclude = Aggregator::new(FailurePolicy::Exclude).aggregate(&mut excluded);
            let invalidate = Aggregator::new(FailurePolicy::Invalidate).aggregate(&mut invalidated);

            for (e, i) in exclude.averages.iter().zip(&invalidate.averages) {
                if let Some(avg) = i.average_ms {
                    prop_assert_eq!(e.average_ms, Some(avg));
                    prop_assert_eq!(i.failed, 0);
                }
            }
        }

        /// Slowest and fastest bound every average and are first of their value
        #[test]
        fn extremes_bound_all_averages(results in generators::run_results()) {
            let mut results = results;
            let summary = Aggregator::default().aggregate(&mut results);
            let (slowest, fastest) = extremes(&summary.averages);
            let values: Vec<(&str, f64)> = summary
                .averages
                .iter()
                .filter_map(|a| a.average_ms.map(|v| (a.identity.as_str(), v)))
                .collect();

            match (slowest, fastest) {
                (Some(slowest), Some(fastest)) => {
                    for (_, value) in &values {
                        prop_assert!(*value <= slowest.average_ms);
                        prop_assert!(*value >= fastest.average_ms);
                    }
                    let first_max = values.iter().find(|(_, v)| *v == slowest.average_ms).map(|(n, _)| *n);
                    let first_min = values.iter().find(|(_, v)| *v == fastest.average_ms).map(|(n, _)| *n);
                    prop_assert_eq!(first_max, Some(slowest.identity.as_str()));
                    prop_assert_eq!(first_min, Some(fastest.identity.as_str()));
                }
                (None, None) => prop_assert!(values.is_empty()),
                _ => prop_assert!(false, "slowest and fastest must both be present or absent"),
            }
        }
    }
}
