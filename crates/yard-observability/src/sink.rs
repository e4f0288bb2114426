//! Catalog diagnostics as structured log entries.

use std::collections::BTreeMap;

use yard_catalog::events::{CatalogEvent, EventSink, Severity};

use crate::logging::{LogLevel, StructuredLogger};

/// Event sink that writes each catalog event through a [`StructuredLogger`],
/// with the event's fields as log fields.
#[derive(Debug, Clone)]
pub struct LoggerSink {
    logger: StructuredLogger,
}

impl LoggerSink {
    pub fn new(logger: StructuredLogger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &StructuredLogger {
        &self.logger
    }
}

/// Log level for an event severity.
pub fn level_for(severity: Severity) -> LogLevel {
    match severity {
        Severity::Debug => LogLevel::Debug,
        Severity::Warn => LogLevel::Warn,
        Severity::Error => LogLevel::Error,
    }
}

impl EventSink for LoggerSink {
    fn emit(&self, event: &CatalogEvent) {
        let level = level_for(event.severity());
        if !self.logger.enabled(level) {
            return;
        }

        let fields: BTreeMap<String, serde_json::Value> = match serde_json::to_value(event) {
            Ok(serde_json::Value::Object(map)) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        };
        self.logger.log_with_fields(level, &event.message(), fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogFormat, LogOutput};
    use yard_catalog::catalog::Attribute;
    use yard_catalog::SessionId;

    fn sink(min_level: LogLevel) -> (LoggerSink, LogOutput) {
        let output = LogOutput::buffer();
        let logger = StructuredLogger::new(SessionId::new("s-9"))
            .with_format(LogFormat::Json)
            .with_min_level(min_level)
            .with_output(output.clone());
        (LoggerSink::new(logger), output)
    }

    #[test]
    fn test_event_fields_become_log_fields() {
        let (sink, output) = sink(LogLevel::Debug);
        sink.emit(&CatalogEvent::KeyNotFound {
            group: "pg1".to_string(),
            key: "zzz".to_string(),
        });

        let line: serde_json::Value = serde_json::from_str(&output.lines()[0]).unwrap();
        assert_eq!(line["level"], "error");
        assert_eq!(line["event"], "key_not_found");
        assert_eq!(line["group"], "pg1");
        assert_eq!(line["key"], "zzz");
        assert_eq!(line["session"], "s-9");
    }

    #[test]
    fn test_levels_follow_severity() {
        let (sink, output) = sink(LogLevel::Warn);
        sink.emit(&CatalogEvent::InvalidChoice {
            attribute: Attribute::Length,
            value: "200".to_string(),
        });
        assert!(output.lines().is_empty());

        sink.emit(&CatalogEvent::QuantitySearchExhausted {
            start: 1,
            limit: 100,
        });
        let line: serde_json::Value = serde_json::from_str(&output.lines()[0]).unwrap();
        assert_eq!(line["level"], "warn");
        assert_eq!(line["limit"], 100);
    }
}
