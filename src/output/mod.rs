//! Output formatting and result reporting
//!
//! The batch runner and the app talk to a [`ResultReporter`]; terminal,
//! JSON and recording implementations live in `reporter`.

mod colored;
mod formatter;
mod reporter;

pub use colored::{ColorScheme, ColoredFormatter, PerformanceLevel};
pub use formatter::{
    group_thousands, format_result_value, Alignment, Column, FormattingOptions, OutputFormatter,
    PlainFormatter, RowData,
};
pub use reporter::{JsonReporter, NullReporter, RecordingReporter, ReportEvent, TerminalReporter};

use crate::{
    models::{EndpointDescriptor, ProbeOutcome, RunSummary},
    types::Category,
};

/// Receives progress, per-probe outcomes and finished summaries
pub trait ResultReporter: Send + Sync {
    /// Called before the first batch of a run
    fn on_run_start(&self, _category: Category, _endpoints: usize) {}

    /// Called when a batch starts and after each of its probes settles.
    /// `requested` and `responded` count the current batch only;
    /// `responded` counts successful probes only.
    fn on_batch_progress(&self, batch: usize, requested: usize, responded: usize);

    /// Called once per settled probe
    fn on_probe_result(&self, endpoint: &EndpointDescriptor, batch: usize, outcome: &ProbeOutcome);

    /// Called after aggregation
    fn on_run_complete(&self, summary: &RunSummary);

    /// Latency a category adds over its baseline category
    fn on_category_overhead(&self, _baseline: Category, _candidate: Category, _overhead_ms: f64) {}
}

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            table_borders: true,
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Create the terminal reporter for the given settings
    pub fn create_terminal_reporter(enable_color: bool, verbose: bool) -> TerminalReporter {
        TerminalReporter::new(Self::create_formatter(enable_color, verbose), verbose)
    }
}
