//! Colored formatter implementation with terminal color support

use super::formatter::{
    batch_label, format_result_value, render_table, summary_columns, summary_rows, FormattingOptions,
    OutputFormatter,
};
use crate::{
    models::{EndpointDescriptor, ProbeOutcome, RunSummary},
    types::Category,
};
use colored::*;

/// Latency classification for color coding averages
#[derive(Debug, Clone, PartialEq)]
pub enum PerformanceLevel {
    Excellent, // < 50ms
    Good,      // 50-150ms
    Fair,      // 150-400ms
    Poor,      // >= 400ms
}

impl PerformanceLevel {
    /// Determine performance level from latency in milliseconds
    pub fn from_latency(latency_ms: f64) -> Self {
        if latency_ms < 50.0 {
            Self::Excellent
        } else if latency_ms < 150.0 {
            Self::Good
        } else if latency_ms < 400.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    /// Get color for this performance level
    pub fn color(&self) -> Color {
        match self {
            Self::Excellent => Color::Green,
            Self::Good => Color::Cyan,
            Self::Fair => Color::Yellow,
            Self::Poor => Color::Red,
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub error: Color,
    pub slowest: Color,
    pub fastest: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            error: Color::Red,
            slowest: Color::Red,
            fastest: Color::Green,
            muted: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self {
            options,
            color_scheme: ColorScheme::default(),
        }
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        Self { options, color_scheme }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    /// Apply bold formatting if colors are enabled
    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    fn dimmed(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.dimmed()
        } else {
            text.normal()
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> String {
        let rule = "=".repeat(title.chars().count());
        format!(
            "{}\n{}",
            self.bold(title).color(self.color_scheme.header),
            self.colorize(&rule, self.color_scheme.muted)
        )
    }

    fn format_batch_start(&self, batch: usize, requested: usize, responded: usize) -> String {
        format!(
            "{} {}",
            self.bold(&format!("-- {} --", batch_label(batch))),
            self.dimmed(&format!("requested {}, responded {}", requested, responded))
        )
    }

    fn format_progress(&self, batch: usize, requested: usize, responded: usize) -> String {
        self.dimmed(&format!("   {}: {}/{} responded", batch_label(batch), responded, requested))
            .to_string()
    }

    fn format_probe_result(&self, endpoint: &EndpointDescriptor, batch: usize, outcome: &ProbeOutcome) -> String {
        match outcome {
            ProbeOutcome::Success { latency_ms, result } => {
                let mut line = self
                    .colorize(
                        &format!(
                            "response from {} @ {} took {:.1}ms",
                            endpoint.name, endpoint.target, latency_ms
                        ),
                        self.color_scheme.success,
                    )
                    .to_string();
                line.push_str(&format!(" {}", self.dimmed(&format!("[{}]", batch_label(batch)))));
                if let Some(value) = result {
                    line.push_str(&format!(" result: {}", format_result_value(value)));
                }
                line
            }
            ProbeOutcome::Failure { cause } => format!(
                "{} {}",
                self.colorize(
                    &format!(
                        "error from {} ({}) @ {}: {}",
                        endpoint.name, endpoint.network, endpoint.target, cause
                    ),
                    self.color_scheme.error,
                ),
                self.dimmed(&format!("[{}]", batch_label(batch)))
            ),
        }
    }

    fn format_summary(&self, summary: &RunSummary) -> String {
        let mut output = self.format_header(&format!("Results: {}", summary.category));
        output.push('\n');

        if summary.is_empty() {
            output.push_str(
                &self
                    .colorize(
                        &format!("No endpoints matched category '{}'.", summary.category),
                        self.color_scheme.muted,
                    )
                    .to_string(),
            );
            return output;
        }

        // Table padding is computed on plain text; color is applied per line afterwards
        let table = render_table(&summary_columns(), &summary_rows(summary), self.options.table_borders);
        let lines: Vec<String> = table
            .lines()
            .map(|line| {
                let average = summary
                    .averages
                    .iter()
                    .find(|a| line.starts_with(&format!("| {} ", a.identity)));
                match average.and_then(|a| a.average_ms) {
                    Some(avg) => self
                        .colorize(line, PerformanceLevel::from_latency(avg).color())
                        .to_string(),
                    None => line.to_string(),
                }
            })
            .collect();
        output.push_str(&lines.join("\n"));
        output.push('\n');

        match (&summary.slowest, &summary.fastest) {
            (Some(slowest), Some(fastest)) => {
                output.push_str(&format!(
                    "Slowest: {}\n",
                    self.colorize(
                        &format!("{} {:.1}ms", slowest.identity, slowest.average_ms),
                        self.color_scheme.slowest
                    )
                ));
                output.push_str(&format!(
                    "Fastest: {}",
                    self.colorize(
                        &format!("{} {:.1}ms", fastest.identity, fastest.average_ms),
                        self.color_scheme.fastest
                    )
                ));
            }
            _ => output.push_str(
                &self
                    .colorize("No endpoint produced an average.", self.color_scheme.error)
                    .to_string(),
            ),
        }

        output
    }

    fn format_overhead(&self, baseline: Category, candidate: Category, overhead_ms: f64) -> String {
        format!(
            "{} adds {} over {} {}",
            self.bold(candidate.tag()),
            self.colorize(&format!("{:.1}ms", overhead_ms), self.color_scheme.slowest),
            baseline,
            self.dimmed("(fastest vs fastest)")
        )
    }
}
