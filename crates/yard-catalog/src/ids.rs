//! Newtype IDs for type-safe identifiers.
//!
//! Using newtypes prevents accidentally mixing up different ID types,
//! e.g., passing a FacilityId where a VariantId is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A unique identifier.
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(VariantId);
define_id!(GroupId);
define_id!(FacilityId);
define_id!(SessionId);

impl VariantId {
    /// The terminal component of a compound id (everything after the last `#`).
    ///
    /// Ids without a separator are returned whole.
    pub fn terminal(&self) -> &str {
        self.0.rsplit('#').next().unwrap_or(&self.0)
    }
}

impl SessionId {
    /// Generate a new session id for log correlation.
    pub fn generate() -> Self {
        Self(generate_id())
    }
}

/// Generate a unique ID using timestamp and a process-wide counter.
fn generate_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);

    let counter = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{:x}{:04x}", timestamp as u64, counter & 0xffff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = VariantId::new("lumber#f1#a1b2c3");
        assert_eq!(id.as_str(), "lumber#f1#a1b2c3");
    }

    #[test]
    fn test_terminal_component() {
        assert_eq!(VariantId::new("lumber#f1#a1b2c3").terminal(), "a1b2c3");
        assert_eq!(VariantId::new("a1b2c3").terminal(), "a1b2c3");
        assert_eq!(VariantId::new("f1#").terminal(), "");
    }

    #[test]
    fn test_session_generation() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_id_serializes_as_string() {
        let id = FacilityId::new("f1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"f1\"");
    }
}
