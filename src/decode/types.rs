//! Decoder traits

use serde_json::Value;

/// Trait for decoding pages into records
pub trait RecordDecoder: Send + Sync {
    /// Extract the records from an already parsed page
    fn decode_value(&self, page: Value) -> Vec<Value>;
}
