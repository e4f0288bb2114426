//! Structured logging for catalog sessions.
//!
//! This crate provides:
//! - `StructuredLogger` - Structured logging with session correlation
//! - `LogBuilder` - Fluent construction of log entries with fields
//! - `LoggerSink` - Catalog diagnostics rendered as structured log entries

mod logging;
mod sink;

pub use logging::*;
pub use sink::*;

pub use yard_catalog::SessionId;
