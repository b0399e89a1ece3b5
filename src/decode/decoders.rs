//! Decoder implementations

use super::types::RecordDecoder;
use serde_json::Value;

/// Field holding the records of a page
pub const RECORDS_FIELD: &str = "objects";

// ============================================================================
// Container Decoder
// ============================================================================

/// Unwraps the record array stored under a top-level field
///
/// Records are returned in page order and passed through untouched. A page
/// whose container is absent, null, or not an array yields no records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerDecoder {
    field: String,
}

impl Default for ContainerDecoder {
    fn default() -> Self {
        Self::new(RECORDS_FIELD)
    }
}

impl ContainerDecoder {
    /// Create a decoder for the given container field
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Name of the container field
    pub fn field(&self) -> &str {
        &self.field
    }
}

impl RecordDecoder for ContainerDecoder {
    fn decode_value(&self, page: Value) -> Vec<Value> {
        match page {
            Value::Object(mut map) => match map.remove(&self.field) {
                Some(Value::Array(records)) => records,
                Some(other) if !other.is_null() => {
                    tracing::debug!(
                        "Ignoring non-array '{}' container in page",
                        self.field
                    );
                    Vec::new()
                }
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }
}
