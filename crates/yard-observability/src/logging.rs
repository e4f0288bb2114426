//! Structured logging with session context.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use yard_catalog::SessionId;

/// Log level for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trace => write!(f, "TRACE"),
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown log level: {0}")]
pub struct ParseLevelError(String);

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// A structured log entry.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Session id for correlation.
    pub session: String,
    /// Product group the session is browsing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Additional structured fields.
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
    /// Microseconds since the logger was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_us: Option<u64>,
}

impl LogEntry {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    pub fn to_human(&self) -> String {
        let mut s = format!("[{}] {}", self.level, self.message);

        if let Some(group) = &self.group {
            s.push_str(&format!(" <{}>", group));
        }
        if let Some(elapsed) = self.elapsed_us {
            s.push_str(&format!(" ({}us)", elapsed));
        }

        if !self.fields.is_empty() {
            s.push_str(" | ");
            let fields: Vec<String> = self
                .fields
                .iter()
                .map(|(k, v)| match v {
                    serde_json::Value::String(text) => format!("{}={}", k, text),
                    other => format!("{}={}", k, other),
                })
                .collect();
            s.push_str(&fields.join(" "));
        }

        s
    }
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON lines, for log aggregation.
    Json,
    /// Human-readable lines, for terminals.
    #[default]
    Human,
}

/// Where rendered entries go.
#[derive(Debug, Clone, Default)]
pub enum LogOutput {
    #[default]
    Stderr,
    /// Forward to `tracing` at the matching level.
    Tracing,
    /// Keep rendered lines in memory.
    Buffer(Arc<Mutex<Vec<String>>>),
}

impl LogOutput {
    pub fn buffer() -> Self {
        LogOutput::Buffer(Arc::new(Mutex::new(Vec::new())))
    }

    /// Lines captured by a buffer output.
    pub fn lines(&self) -> Vec<String> {
        match self {
            LogOutput::Buffer(lines) => lines.lock().map(|l| l.clone()).unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    fn write(&self, level: LogLevel, line: String) {
        match self {
            LogOutput::Stderr => eprintln!("{}", line),
            LogOutput::Tracing => match level {
                LogLevel::Trace => tracing::trace!("{}", line),
                LogLevel::Debug => tracing::debug!("{}", line),
                LogLevel::Info => tracing::info!("{}", line),
                LogLevel::Warn => tracing::warn!("{}", line),
                LogLevel::Error => tracing::error!("{}", line),
            },
            LogOutput::Buffer(lines) => {
                if let Ok(mut lines) = lines.lock() {
                    lines.push(line);
                }
            }
        }
    }
}

/// Structured logger carrying a shopper session id.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    session: SessionId,
    group: Option<String>,
    start_time: std::time::Instant,
    min_level: LogLevel,
    format: LogFormat,
    output: LogOutput,
}

impl StructuredLogger {
    pub fn new(session: SessionId) -> Self {
        Self {
            session,
            group: None,
            start_time: std::time::Instant::now(),
            min_level: LogLevel::Warn,
            format: LogFormat::Human,
            output: LogOutput::Stderr,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message, BTreeMap::new());
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message, BTreeMap::new());
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message, BTreeMap::new());
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message, BTreeMap::new());
    }

    pub fn log_with_fields(
        &self,
        level: LogLevel,
        message: &str,
        fields: BTreeMap<String, serde_json::Value>,
    ) {
        self.log(level, message, fields);
    }

    /// Whether entries at `level` are written.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn log(&self, level: LogLevel, message: &str, fields: BTreeMap<String, serde_json::Value>) {
        if !self.enabled(level) {
            return;
        }

        let entry = LogEntry {
            level,
            message: message.to_string(),
            session: self.session.to_string(),
            group: self.group.clone(),
            fields,
            elapsed_us: Some(self.elapsed_us()),
        };

        let line = match self.format {
            LogFormat::Json => entry.to_json(),
            LogFormat::Human => entry.to_human(),
        };
        self.output.write(level, line);
    }

    pub fn session(&self) -> &SessionId {
        &self.session
    }

    pub fn elapsed_us(&self) -> u64 {
        self.start_time.elapsed().as_micros() as u64
    }
}

/// Builder for log entries with fluent API.
pub struct LogBuilder<'a> {
    logger: &'a StructuredLogger,
    level: LogLevel,
    message: String,
    fields: BTreeMap<String, serde_json::Value>,
}

impl<'a> LogBuilder<'a> {
    pub fn new(logger: &'a StructuredLogger, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            logger,
            level,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a string field.
    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields
            .insert(key.to_string(), serde_json::json!(value.into()));
        self
    }

    pub fn field_u64(mut self, key: &str, value: u64) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    pub fn field_bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Add any JSON value.
    pub fn field_value(mut self, key: &str, value: serde_json::Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn emit(self) {
        self.logger.log(self.level, &self.message, self.fields);
    }
}

impl StructuredLogger {
    pub fn info_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Info, message)
    }

    pub fn warn_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Warn, message)
    }

    pub fn debug_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Debug, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logger(format: LogFormat) -> (StructuredLogger, LogOutput) {
        let output = LogOutput::buffer();
        let logger = StructuredLogger::new(SessionId::new("s-1"))
            .with_group("pg-2x4")
            .with_format(format)
            .with_min_level(LogLevel::Info)
            .with_output(output.clone());
        (logger, output)
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("WARN".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("trace".parse::<LogLevel>(), Ok(LogLevel::Trace));
        assert!("loud".parse::<LogLevel>().is_err());
        assert!(LogLevel::Error > LogLevel::Warn);
    }

    #[test]
    fn test_min_level_filters() {
        let (logger, output) = logger(LogFormat::Human);
        logger.debug("hidden");
        logger.info("shown");
        assert_eq!(output.lines().len(), 1);
        assert!(output.lines()[0].starts_with("[INFO] shown <pg-2x4>"));
    }

    #[test]
    fn test_json_entry_has_session_and_fields() {
        let (logger, output) = logger(LogFormat::Json);
        logger
            .warn_builder("quantity adjusted")
            .field_u64("quantity", 12)
            .field("direction", "up")
            .emit();

        let line: serde_json::Value = serde_json::from_str(&output.lines()[0]).unwrap();
        assert_eq!(line["level"], "warn");
        assert_eq!(line["session"], "s-1");
        assert_eq!(line["group"], "pg-2x4");
        assert_eq!(line["quantity"], 12);
        assert_eq!(line["direction"], "up");
    }

    #[test]
    fn test_human_fields() {
        let entry = LogEntry {
            level: LogLevel::Warn,
            message: "choice replaced".to_string(),
            session: "s".to_string(),
            group: None,
            fields: [("attribute".to_string(), serde_json::json!("length"))]
                .into_iter()
                .collect(),
            elapsed_us: None,
        };
        assert_eq!(entry.to_human(), "[WARN] choice replaced | attribute=length");
    }
}
