//! Diagnostic events emitted by the engine.
//!
//! Resolution and pricing never log directly. They hand structured
//! [`CatalogEvent`]s to an [`EventSink`], and control flow does not depend
//! on what the sink does with them.

use std::sync::Mutex;

use serde::Serialize;

use crate::catalog::Attribute;

/// Severity of a diagnostic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Warn,
    Error,
}

/// A structured diagnostic event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CatalogEvent {
    /// A resolved or requested key is not in the group.
    KeyNotFound { group: String, key: String },
    /// Raw records carried an unknown category.
    UnrecognizedCategory { category: String },
    /// A fetch returned nothing usable.
    NoData { query: String, reason: String },
    /// Two keys share an attribute path; the later key owns the leaf.
    PathCollision {
        group: String,
        kept: String,
        replaced: String,
    },
    /// A caller choice was not among the available values.
    InvalidChoice { attribute: Attribute, value: String },
    /// Greedy tier decomposition left a remainder for this variant.
    IndivisibleQuantity { variant: String, quantity: u64 },
    /// A quantity search found nothing purchasable.
    QuantitySearchExhausted { start: u64, limit: u64 },
}

impl CatalogEvent {
    /// Stable event name.
    pub fn name(&self) -> &'static str {
        match self {
            CatalogEvent::KeyNotFound { .. } => "key_not_found",
            CatalogEvent::UnrecognizedCategory { .. } => "unrecognized_category",
            CatalogEvent::NoData { .. } => "no_data",
            CatalogEvent::PathCollision { .. } => "path_collision",
            CatalogEvent::InvalidChoice { .. } => "invalid_choice",
            CatalogEvent::IndivisibleQuantity { .. } => "indivisible_quantity",
            CatalogEvent::QuantitySearchExhausted { .. } => "quantity_search_exhausted",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            CatalogEvent::KeyNotFound { .. }
            | CatalogEvent::UnrecognizedCategory { .. }
            | CatalogEvent::NoData { .. } => Severity::Error,
            CatalogEvent::PathCollision { .. }
            | CatalogEvent::IndivisibleQuantity { .. }
            | CatalogEvent::QuantitySearchExhausted { .. } => Severity::Warn,
            CatalogEvent::InvalidChoice { .. } => Severity::Debug,
        }
    }

    /// Human-readable message.
    pub fn message(&self) -> String {
        match self {
            CatalogEvent::KeyNotFound { group, key } => {
                format!("Group {} does not contain a variant with key {}", group, key)
            }
            CatalogEvent::UnrecognizedCategory { category } => {
                format!("Unknown product category: {}", category)
            }
            CatalogEvent::NoData { query, reason } => {
                format!("No data for {}: {}", query, reason)
            }
            CatalogEvent::PathCollision {
                group,
                kept,
                replaced,
            } => format!(
                "Keys {} and {} in group {} share an attribute path; keeping {}",
                replaced, kept, group, kept
            ),
            CatalogEvent::InvalidChoice { attribute, value } => {
                format!("Choice {}={} is not available", attribute, value)
            }
            CatalogEvent::IndivisibleQuantity { variant, quantity } => {
                format!("Tiers of {} cannot make up {} pieces", variant, quantity)
            }
            CatalogEvent::QuantitySearchExhausted { start, limit } => {
                format!(
                    "No purchasable quantity found from {} within {}",
                    start, limit
                )
            }
        }
    }
}

/// Receiver for diagnostic events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &CatalogEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &CatalogEvent) {
        match event.severity() {
            Severity::Error => {
                tracing::error!(event = event.name(), "{}", event.message())
            }
            Severity::Warn => tracing::warn!(event = event.name(), "{}", event.message()),
            Severity::Debug => {
                tracing::debug!(event = event.name(), "{}", event.message())
            }
        }
    }
}

/// Discards events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &CatalogEvent) {}
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<CatalogEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events.
    pub fn events(&self) -> Vec<CatalogEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Names of recorded events, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(CatalogEvent::name).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &CatalogEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink() {
        let sink = RecordingSink::new();
        sink.emit(&CatalogEvent::UnrecognizedCategory {
            category: "hardware".to_string(),
        });
        assert_eq!(sink.names(), vec!["unrecognized_category"]);

        sink.clear();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let event = CatalogEvent::KeyNotFound {
            group: "pg1".to_string(),
            key: "zzz".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "key_not_found");
        assert_eq!(json["key"], "zzz");
    }

    #[test]
    fn test_severity() {
        let event = CatalogEvent::QuantitySearchExhausted { start: 1, limit: 10 };
        assert_eq!(event.severity(), Severity::Warn);
        assert!(event.message().contains("from 1"));
    }
}
