//! Request body serialization.

use crate::error::{RestError, Result};

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Turns a request payload into text plus the content type it is sent with.
///
/// Payloads arrive as `serde_json::Value` so the trait stays object safe; the
/// request builder converts the caller's `Serialize` type first.
pub trait Serializer: Send + Sync {
    fn content_type(&self) -> &str;

    fn serialize(&self, value: &serde_json::Value) -> Result<String>;
}

/// Compact JSON via `serde_json`.
#[derive(Debug, Clone)]
pub struct JsonSerializer {
    content_type: String,
}

impl JsonSerializer {
    pub fn new() -> Self {
        Self::with_content_type(JSON_CONTENT_TYPE)
    }

    pub fn with_content_type(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
        }
    }
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Serializer for JsonSerializer {
    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn serialize(&self, value: &serde_json::Value) -> Result<String> {
        serde_json::to_string(value).map_err(|e| RestError::SerializationError(e.to_string()))
    }
}
