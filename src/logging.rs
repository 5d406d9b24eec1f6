//! Structured logging for benchmark runs
//!
//! Leveled entries carry key/value fields and are written as console
//! lines, or as JSON in debug mode. Loggers derived with [`Logger::child`]
//! share one context, so every entry written during a run carries that
//! run's correlation ID.
//!
//! Log output goes to stderr so stdout only carries reports.

use crate::error::AppError;
use crate::models::{Config, EndpointDescriptor, ProbeOutcome, RunSummary};
use chrono::{DateTime, Utc};
use colored::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    /// Errors that end the process
    Fatal = 5,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Terminal color for console output
    pub fn color(&self) -> Color {
        match self {
            LogLevel::Debug => Color::Cyan,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
            LogLevel::Fatal => Color::Magenta,
        }
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Correlation ID tying entries of one run together
    pub correlation_id: Option<String>,
    pub fields: HashMap<String, serde_json::Value>,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// One JSON object per line
    Json,
}

/// Context shared by a logger and its children
#[derive(Debug, Default)]
struct LogContext {
    current_correlation_id: Option<String>,
}

/// Logger implementation with multiple output formats
#[derive(Debug, Clone)]
pub struct Logger {
    min_level: LogLevel,
    use_color: bool,
    format: LogFormat,
    name: String,
    context: Arc<RwLock<LogContext>>,
}

impl Logger {
    /// Create a new logger
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            min_level: LogLevel::Info,
            use_color: true,
            format: LogFormat::Console,
            name: name.into(),
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Logger that only lets fatal entries through
    pub fn quiet(name: impl Into<String>) -> Self {
        let mut logger = Self::new(name);
        logger.set_level(LogLevel::Fatal);
        logger
    }

    /// Create a logger with specific configuration
    pub fn with_config(name: impl Into<String>, config: &Config) -> Self {
        let min_level = if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };

        Self {
            min_level,
            use_color: config.enable_color,
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            name: name.into(),
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Logger for another component sharing this logger's context
    pub fn child(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LogLevel {
        self.min_level
    }

    /// Set minimum log level
    pub fn set_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    /// Start a correlated operation and return its correlation ID
    pub async fn start_operation(&self, operation_name: &str) -> String {
        let correlation_id = Uuid::new_v4().to_string();
        {
            let mut context = self.context.write().await;
            context.current_correlation_id = Some(correlation_id.clone());
        }

        self.info(&format!("Started {}", operation_name))
            .correlation_id(&correlation_id)
            .field("operation", operation_name)
            .field("operation_type", "start")
            .log()
            .await;

        correlation_id
    }

    /// End a correlated operation
    pub async fn end_operation(&self, correlation_id: &str, operation_name: &str, success: bool) {
        self.info(&format!("Completed {} (success: {})", operation_name, success))
            .correlation_id(correlation_id)
            .field("operation", operation_name)
            .field("operation_type", "end")
            .field("success", success)
            .log()
            .await;

        let mut context = self.context.write().await;
        if context.current_correlation_id.as_deref() == Some(correlation_id) {
            context.current_correlation_id = None;
        }
    }

    /// Correlation ID of the operation in progress, if any
    pub async fn current_correlation_id(&self) -> Option<String> {
        self.context.read().await.current_correlation_id.clone()
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    async fn write_entry(&self, mut entry: LogEntry) {
        if !self.would_log(entry.level) {
            return;
        }

        if entry.correlation_id.is_none() {
            entry.correlation_id = self.current_correlation_id().await;
        }

        let output = self.render(&entry);
        let _ = writeln!(io::stderr(), "{}", output);
    }

    /// Render an entry in the configured format
    pub fn render(&self, entry: &LogEntry) -> String {
        match self.format {
            LogFormat::Console => self.format_console(entry),
            LogFormat::Json => self.format_json(entry),
        }
    }

    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = format!("{:>5}", entry.level.as_str());
        let formatted_level = if self.use_color {
            level_str.as_str().color(entry.level.color()).to_string()
        } else {
            level_str
        };

        let mut output = format!("{} {} [{}] {}", timestamp, formatted_level, entry.logger, entry.message);

        if let Some(correlation_id) = &entry.correlation_id {
            let short: String = correlation_id.chars().take(8).collect();
            output.push_str(&format!(" [{}]", short));
        }

        if !entry.fields.is_empty() {
            let mut fields: Vec<String> = entry.fields.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            fields.sort();
            output.push_str(&format!(" {{{}}}", fields.join(", ")));
        }

        output
    }

    fn format_json(&self, entry: &LogEntry) -> String {
        match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(_) => serde_json::json!({
                "error": "Failed to serialize log entry",
                "message": entry.message,
            })
            .to_string(),
        }
    }
}

/// Builder pattern for creating log entries
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                correlation_id: None,
                fields: HashMap::new(),
            },
        }
    }

    pub fn correlation_id(mut self, id: &str) -> Self {
        self.entry.correlation_id = Some(id.to_string());
        self
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Add endpoint identity fields
    pub fn endpoint(self, endpoint: &EndpointDescriptor) -> Self {
        self.field("endpoint", &endpoint.name)
            .field("network", &endpoint.network)
            .field("target", &endpoint.target)
    }

    /// Add probe outcome fields
    pub fn outcome(self, outcome: &ProbeOutcome) -> Self {
        match outcome {
            ProbeOutcome::Success { latency_ms, .. } => self.field("success", true).field("latency_ms", latency_ms),
            ProbeOutcome::Failure { cause } => self.field("success", false).field("cause", cause),
        }
    }

    /// Add error information
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_exit_code", error.exit_code())
    }

    /// Entry built so far
    pub fn entry(&self) -> &LogEntry {
        &self.entry
    }

    /// Finalize and write the log entry
    pub async fn log(self) {
        self.logger.write_entry(self.entry).await;
    }
}

/// Logger with helpers for the events of a benchmark run
#[derive(Debug, Clone)]
pub struct RunLogger {
    logger: Logger,
}

impl RunLogger {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub async fn log_batch_start(&self, batch: usize, batch_count: usize, endpoints: usize) {
        self.logger
            .debug(&format!("Dispatching batch {}", batch))
            .field("batch", batch)
            .field("batch_count", batch_count)
            .field("warm_up", batch == 0)
            .field("endpoints", endpoints)
            .log()
            .await;
    }

    pub async fn log_batch_complete(&self, batch: usize, succeeded: usize, failed: usize, elapsed: Duration) {
        self.logger
            .debug(&format!("Batch {} settled", batch))
            .field("batch", batch)
            .field("succeeded", succeeded)
            .field("failed", failed)
            .field("elapsed_ms", elapsed.as_secs_f64() * 1000.0)
            .log()
            .await;
    }

    pub async fn log_probe_failure(&self, endpoint: &EndpointDescriptor, batch: usize, outcome: &ProbeOutcome) {
        self.logger
            .debug("Probe failed")
            .endpoint(endpoint)
            .field("batch", batch)
            .outcome(outcome)
            .log()
            .await;
    }

    pub async fn log_run_summary(&self, summary: &RunSummary) {
        let mut builder = self
            .logger
            .info(&format!("Run complete for {}", summary.category))
            .field("run_id", &summary.run_id)
            .field("endpoints", summary.averages.len())
            .field("batch_count", summary.batch_count)
            .field("failure_policy", summary.failure_policy.as_str());

        if let Some(fastest) = &summary.fastest {
            builder = builder.field("fastest", &fastest.identity).field("fastest_ms", fastest.average_ms);
        }
        if let Some(slowest) = &summary.slowest {
            builder = builder.field("slowest", &slowest.identity).field("slowest_ms", slowest.average_ms);
        }

        builder.log().await;
    }

    pub async fn log_error(&self, error: &AppError, context: Option<&str>) {
        let mut builder = self.logger.error(&error.to_string()).error_info(error);
        if let Some(ctx) = context {
            builder = builder.field("context", ctx);
        }
        builder.log().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> LogEntry {
        LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::Info,
            message: "Test message".to_string(),
            logger: "TEST".to_string(),
            correlation_id: Some("0123456789abcdef".to_string()),
            fields: {
                let mut map = HashMap::new();
                map.insert("key".to_string(), serde_json::Value::String("value".to_string()));
                map
            },
        }
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Error < LogLevel::Fatal);
    }

    #[test]
    fn test_logger_with_config() {
        let config = Config {
            debug: true,
            enable_color: false,
            ..Default::default()
        };
        let logger = Logger::with_config("TEST", &config);
        assert_eq!(logger.level(), LogLevel::Debug);
        assert_eq!(logger.format, LogFormat::Json);

        let verbose = Config {
            verbose: true,
            ..Default::default()
        };
        assert_eq!(Logger::with_config("TEST", &verbose).level(), LogLevel::Info);
        assert_eq!(Logger::with_config("TEST", &Config::default()).level(), LogLevel::Warn);
    }

    #[test]
    fn test_would_log() {
        let mut logger = Logger::new("TEST");
        logger.set_level(LogLevel::Warn);

        assert!(!logger.would_log(LogLevel::Debug));
        assert!(logger.would_log(LogLevel::Warn));
        assert!(logger.would_log(LogLevel::Fatal));
        assert!(!Logger::quiet("TEST").would_log(LogLevel::Error));
    }

    #[tokio::test]
    async fn test_child_shares_context() {
        let logger = Logger::new("APP");
        let child = logger.child("RUN");

        let correlation_id = logger.start_operation("centralized run").await;
        assert_eq!(child.current_correlation_id().await, Some(correlation_id.clone()));
        assert_eq!(child.name(), "RUN");

        logger.end_operation(&correlation_id, "centralized run", true).await;
        assert_eq!(child.current_correlation_id().await, None);
    }

    #[test]
    fn test_end_operation_keeps_newer_correlation() {
        tokio_test::block_on(async {
            let logger = Logger::quiet("TEST");
            let first = logger.start_operation("centralized run").await;
            let second = logger.start_operation("distributed run").await;

            logger.end_operation(&first, "centralized run", true).await;
            assert_eq!(logger.current_correlation_id().await, Some(second));
        });
    }

    #[test]
    fn test_builder_fields() {
        let logger = Logger::new("TEST");
        let endpoint = EndpointDescriptor::new("frankfurt", "centralized", "mainnet", "https://fra");

        let builder = logger
            .debug("probe")
            .endpoint(&endpoint)
            .outcome(&ProbeOutcome::failure("timeout"));

        let fields = &builder.entry().fields;
        assert_eq!(fields["endpoint"], "frankfurt");
        assert_eq!(fields["success"], false);
        assert_eq!(fields["cause"], "timeout");

        let error = logger.error("failed").error_info(&AppError::catalog_load("missing"));
        assert_eq!(error.entry().fields["error_category"], "CATALOG");
        assert_eq!(error.entry().fields["error_exit_code"], 4);
    }

    #[test]
    fn test_log_formats() {
        let plain = Config {
            enable_color: false,
            ..Default::default()
        };
        let console = Logger::with_config("TEST", &plain).render(&entry());
        assert!(console.contains(" INFO [TEST] Test message [01234567]"));
        assert!(console.contains("key=\"value\""));

        let debug = Config {
            debug: true,
            ..Default::default()
        };
        let rendered = Logger::with_config("TEST", &debug).render(&entry());
        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(json["level"], "Info");
        assert_eq!(json["fields"]["key"], "value");
    }

    #[tokio::test]
    async fn test_run_logger_helpers_do_not_panic() {
        let run_logger = RunLogger::new(Logger::quiet("RUN"));
        let endpoint = EndpointDescriptor::new("a", "centralized", "mainnet", "https://a");

        run_logger.log_batch_start(0, 6, 1).await;
        run_logger.log_probe_failure(&endpoint, 0, &ProbeOutcome::failure("timeout")).await;
        run_logger.log_batch_complete(0, 0, 1, Duration::from_millis(3)).await;
        run_logger.log_error(&AppError::catalog_load("missing"), Some("loading")).await;
    }
}
