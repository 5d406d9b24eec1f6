//! Core formatting traits and implementations
//!
//! This module defines the output formatting interface and provides
//! a plain text implementation with table formatting capabilities.

use crate::{
    models::{EndpointDescriptor, ProbeOutcome, RunSummary},
    types::Category,
};

/// Main trait for output formatting
pub trait OutputFormatter: Send + Sync {
    /// Format a header section
    fn format_header(&self, title: &str) -> String;

    /// Format the line shown when a batch starts
    fn format_batch_start(&self, batch: usize, requested: usize, responded: usize) -> String;

    /// Format a progress update within a batch
    fn format_progress(&self, batch: usize, requested: usize, responded: usize) -> String;

    /// Format one probe outcome
    fn format_probe_result(&self, endpoint: &EndpointDescriptor, batch: usize, outcome: &ProbeOutcome) -> String;

    /// Format the averages table plus slowest/fastest
    fn format_summary(&self, summary: &RunSummary) -> String;

    /// Format the latency one category adds over another
    fn format_overhead(&self, baseline: Category, candidate: Category, overhead_ms: f64) -> String;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Show per-probe progress counters
    pub verbose_mode: bool,
    /// Show table borders
    pub table_borders: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            table_borders: true,
        }
    }
}

/// Text alignment options
#[derive(Debug, Clone)]
pub enum Alignment {
    Left,
    Right,
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub alignment: Alignment,
}

impl Column {
    pub fn left(header: &str) -> Self {
        Self {
            header: header.to_string(),
            alignment: Alignment::Left,
        }
    }

    pub fn right(header: &str) -> Self {
        Self {
            header: header.to_string(),
            alignment: Alignment::Right,
        }
    }
}

/// Row data for table formatting
pub type RowData = Vec<String>;

/// Columns of the averages table
pub fn summary_columns() -> Vec<Column> {
    vec![
        Column::left("Endpoint"),
        Column::left("Network"),
        Column::right("Average"),
        Column::right("OK"),
        Column::right("Failed"),
    ]
}

/// Rows of the averages table, in catalog order
pub fn summary_rows(summary: &RunSummary) -> Vec<RowData> {
    summary
        .averages
        .iter()
        .map(|average| {
            vec![
                average.identity.clone(),
                average.network.clone(),
                average.format_average(),
                average.measured.to_string(),
                average.failed.to_string(),
            ]
        })
        .collect()
}

/// Render a table; cells are padded by character count
pub fn render_table(columns: &[Column], rows: &[RowData], borders: bool) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            rows.iter()
                .filter_map(|row| row.get(idx))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(column.header.chars().count())
        })
        .collect();

    let headers: RowData = columns.iter().map(|c| c.header.clone()).collect();
    let mut lines = Vec::with_capacity(rows.len() + 4);

    if borders {
        lines.push(horizontal_border(&widths));
    }
    lines.push(render_row(&headers, &widths, columns, borders));
    if borders {
        lines.push(horizontal_border(&widths));
    }
    for row in rows {
        lines.push(render_row(row, &widths, columns, borders));
    }
    if borders {
        lines.push(horizontal_border(&widths));
    }

    lines.join("\n")
}

fn render_row(cells: &[String], widths: &[usize], columns: &[Column], borders: bool) -> String {
    let mut row = String::new();
    if borders {
        row.push('|');
    }

    for ((cell, &width), column) in cells.iter().zip(widths).zip(columns) {
        let padded = align_text(cell, width, &column.alignment);
        if borders {
            row.push(' ');
            row.push_str(&padded);
            row.push_str(" |");
        } else {
            row.push_str(&padded);
            row.push_str("  ");
        }
    }

    row.trim_end().to_string()
}

fn horizontal_border(widths: &[usize]) -> String {
    let mut border = String::from("+");
    for &width in widths {
        border.push_str(&"-".repeat(width + 2));
        border.push('+');
    }
    border
}

/// Align text within specified width
pub fn align_text(text: &str, width: usize, alignment: &Alignment) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }

    let padding = " ".repeat(width - len);
    match alignment {
        Alignment::Left => format!("{}{}", text, padding),
        Alignment::Right => format!("{}{}", padding, text),
    }
}

/// Group an integer's digits in thousands: 1234567 -> "1,234,567"
pub fn group_thousands(value: i128) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Display form of a decoded `result`; integers are grouped
pub fn format_result_value(value: &serde_json::Value) -> String {
    if let Some(n) = value.as_u64() {
        group_thousands(n as i128)
    } else if let Some(n) = value.as_i64() {
        group_thousands(n as i128)
    } else {
        value.to_string()
    }
}

/// Label shown for a batch index
pub fn batch_label(batch: usize) -> String {
    if batch == 0 {
        "batch 0 (warm-up)".to_string()
    } else {
        format!("batch {}", batch)
    }
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> String {
        format!("{}\n{}", title, "=".repeat(title.chars().count()))
    }

    fn format_batch_start(&self, batch: usize, requested: usize, responded: usize) -> String {
        format!(
            "-- {} -- requested {}, responded {}",
            batch_label(batch),
            requested,
            responded
        )
    }

    fn format_progress(&self, batch: usize, requested: usize, responded: usize) -> String {
        format!("   {}: {}/{} responded", batch_label(batch), responded, requested)
    }

    fn format_probe_result(&self, endpoint: &EndpointDescriptor, batch: usize, outcome: &ProbeOutcome) -> String {
        match outcome {
            ProbeOutcome::Success { latency_ms, result } => {
                let mut line = format!(
                    "response from {} @ {} took {:.1}ms [{}]",
                    endpoint.name,
                    endpoint.target,
                    latency_ms,
                    batch_label(batch)
                );
                if let Some(value) = result {
                    line.push_str(&format!(" result: {}", format_result_value(value)));
                }
                line
            }
            ProbeOutcome::Failure { cause } => format!(
                "error from {} ({}) @ {}: {} [{}]",
                endpoint.name,
                endpoint.network,
                endpoint.target,
                cause,
                batch_label(batch)
            ),
        }
    }

    fn format_summary(&self, summary: &RunSummary) -> String {
        let mut output = self.format_header(&format!("Results: {}", summary.category));
        output.push('\n');

        if summary.is_empty() {
            output.push_str(&format!("No endpoints matched category '{}'.", summary.category));
            return output;
        }

        output.push_str(&render_table(
            &summary_columns(),
            &summary_rows(summary),
            self.options.table_borders,
        ));
        output.push('\n');

        match (&summary.slowest, &summary.fastest) {
            (Some(slowest), Some(fastest)) => {
                output.push_str(&format!("Slowest: {} {:.1}ms\n", slowest.identity, slowest.average_ms));
                output.push_str(&format!("Fastest: {} {:.1}ms", fastest.identity, fastest.average_ms));
            }
            _ => output.push_str("No endpoint produced an average."),
        }

        output
    }

    fn format_overhead(&self, baseline: Category, candidate: Category, overhead_ms: f64) -> String {
        format!(
            "{} adds {:.1}ms over {} (fastest vs fastest)",
            candidate, overhead_ms, baseline
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EndpointAverage, EndpointExtreme};
    use crate::types::FailurePolicy;

    fn plain() -> PlainFormatter {
        PlainFormatter::new(FormattingOptions {
            enable_color: false,
            ..FormattingOptions::default()
        })
    }

    fn summary() -> RunSummary {
        RunSummary {
            run_id: "run".to_string(),
            category: "centralized".to_string(),
            batch_count: 6,
            failure_policy: FailurePolicy::Exclude,
            averages: vec![
                EndpointAverage {
                    identity: "frankfurt".to_string(),
                    network: "mainnet".to_string(),
                    target: "https://fra".to_string(),
                    average_ms: Some(42.3),
                    measured: 5,
                    failed: 0,
                },
                EndpointAverage {
                    identity: "tokyo".to_string(),
                    network: "mainnet".to_string(),
                    target: "https://tyo".to_string(),
                    average_ms: None,
                    measured: 0,
                    failed: 5,
                },
            ],
            slowest: Some(EndpointExtreme {
                identity: "frankfurt".to_string(),
                average_ms: 42.3,
            }),
            fastest: Some(EndpointExtreme {
                identity: "frankfurt".to_string(),
                average_ms: 42.3,
            }),
            completed_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(328_453_129), "328,453,129");
        assert_eq!(group_thousands(-1_234_567), "-1,234,567");
    }

    #[test]
    fn test_format_result_value() {
        assert_eq!(format_result_value(&serde_json::json!(1234567)), "1,234,567");
        assert_eq!(format_result_value(&serde_json::json!("abc")), "\"abc\"");
        assert_eq!(format_result_value(&serde_json::json!(1.5)), "1.5");
    }

    #[test]
    fn test_probe_lines() {
        let endpoint = EndpointDescriptor::new("frankfurt", "centralized", "mainnet", "https://fra");

        let ok = plain().format_probe_result(
            &endpoint,
            1,
            &ProbeOutcome::success_with_result(12.34, Some(serde_json::json!(5000))),
        );
        assert_eq!(ok, "response from frankfurt @ https://fra took 12.3ms [batch 1] result: 5,000");

        let failed = plain().format_probe_result(&endpoint, 0, &ProbeOutcome::failure("timeout"));
        assert_eq!(failed, "error from frankfurt (mainnet) @ https://fra: timeout [batch 0 (warm-up)]");
    }

    #[test]
    fn test_summary_table() {
        let output = plain().format_summary(&summary());

        assert!(output.starts_with("Results: centralized"));
        assert!(output.contains("| frankfurt | mainnet |  42.3ms |"));
        assert!(output.contains("n/a"));
        assert!(output.contains("Slowest: frankfurt 42.3ms"));
        assert!(output.contains("Fastest: frankfurt 42.3ms"));
    }

    #[test]
    fn test_empty_summary() {
        let mut empty = summary();
        empty.averages.clear();
        empty.slowest = None;
        empty.fastest = None;

        let output = plain().format_summary(&empty);
        assert!(output.contains("No endpoints matched category 'centralized'."));
    }

    #[test]
    fn test_align_text() {
        assert_eq!(align_text("ab", 4, &Alignment::Left), "ab  ");
        assert_eq!(align_text("ab", 4, &Alignment::Right), "  ab");
        assert_eq!(align_text("abcdef", 4, &Alignment::Left), "abcdef");
    }

    #[test]
    fn test_overhead_line() {
        let line = plain().format_overhead(Category::Distributed, Category::Secured, 17.3);
        assert_eq!(line, "secured adds 17.3ms over distributed (fastest vs fastest)");
    }
}
