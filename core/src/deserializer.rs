//! Content-type keyed response deserialization.
//!
//! # Design
//! A `DeserializerRegistry` maps an exact content-type string to a
//! `Deserializer`. Lookups never parse wildcards or quality values:
//! `text/json` and `application/json` are different keys that happen to
//! share an implementation. The registry is filled before it is handed to a
//! client and only read afterwards.
//!
//! A `Deserializer` hands out a type-erased format deserializer over the
//! response text, and the caller's type is decoded straight from it. There
//! is no intermediate `serde_json::Value`, so a typed decode through the
//! registry gives exactly what decoding the text directly would.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::error::{RestError, Result};

/// Content types served by `JsonDeserializer` in the default registry.
pub const JSON_CONTENT_TYPES: [&str; 4] = [
    "application/json",
    "text/json",
    "text/x-json",
    "text/javascript",
];

/// Callback that decodes a value out of a format deserializer.
pub type Visit<'v, 'de> =
    dyn FnMut(&mut dyn erased_serde::Deserializer<'de>) -> Result<(), erased_serde::Error> + 'v;

/// Turns response text into a format deserializer for one content type.
pub trait Deserializer: Send + Sync {
    /// Build a deserializer over `content` and pass it to `visit`. Input left
    /// over after `visit` returns is an error.
    fn deserialize_with<'de>(&self, content: &'de str, visit: &mut Visit<'_, 'de>) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDeserializer;

impl Deserializer for JsonDeserializer {
    fn deserialize_with<'de>(&self, content: &'de str, visit: &mut Visit<'_, 'de>) -> Result<()> {
        let mut json = serde_json::Deserializer::from_str(content);
        {
            let mut erased = <dyn erased_serde::Deserializer>::erase(&mut json);
            visit(&mut erased).map_err(|e| RestError::DeserializationError(e.to_string()))?;
        }
        json.end()
            .map_err(|e| RestError::DeserializationError(e.to_string()))
    }
}

#[derive(Clone, Default)]
pub struct DeserializerRegistry {
    handlers: HashMap<String, Arc<dyn Deserializer>>,
}

impl DeserializerRegistry {
    /// Registry with no content types.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with every JSON content type mapped to `JsonDeserializer`.
    pub fn with_defaults() -> Self {
        let json: Arc<dyn Deserializer> = Arc::new(JsonDeserializer);
        let mut registry = Self::empty();
        for content_type in JSON_CONTENT_TYPES {
            registry
                .handlers
                .insert(content_type.to_string(), Arc::clone(&json));
        }
        registry
    }

    /// Add or replace the handler for `content_type`.
    pub fn register(
        mut self,
        content_type: impl Into<String>,
        deserializer: impl Deserializer + 'static,
    ) -> Self {
        self.handlers
            .insert(content_type.into(), Arc::new(deserializer));
        self
    }

    pub fn get(&self, content_type: &str) -> Option<&dyn Deserializer> {
        self.handlers.get(content_type).map(|d| d.as_ref())
    }

    pub fn contains(&self, content_type: &str) -> bool {
        self.handlers.contains_key(content_type)
    }

    /// Decode `content` with the handler registered for `content_type`.
    pub fn deserialize<T: DeserializeOwned>(&self, content_type: &str, content: &str) -> Result<T> {
        let deserializer = self
            .get(content_type)
            .ok_or_else(|| RestError::NoDeserializer(content_type.to_string()))?;

        let mut data: Option<T> = None;
        deserializer.deserialize_with(content, &mut |format| {
            data = Some(erased_serde::deserialize::<T>(format)?);
            Ok(())
        })?;
        data.ok_or_else(|| {
            RestError::DeserializationError(format!("{content_type} handler produced no value"))
        })
    }
}

impl std::fmt::Debug for DeserializerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut content_types: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        content_types.sort_unstable();
        f.debug_struct("DeserializerRegistry")
            .field("content_types", &content_types)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Customer {
        id: u32,
    }

    #[test]
    fn defaults_cover_the_json_family() {
        let registry = DeserializerRegistry::with_defaults();
        for content_type in JSON_CONTENT_TYPES {
            let customer: Customer = registry.deserialize(content_type, r#"{"id":7}"#).unwrap();
            assert_eq!(customer, Customer { id: 7 }, "{content_type}");
        }
    }

    #[test]
    fn lookup_is_exact() {
        let registry = DeserializerRegistry::with_defaults();
        assert!(registry.contains("application/json"));
        assert!(!registry.contains("Application/JSON"));
        assert!(!registry.contains("application/*"));
    }

    #[test]
    fn unknown_content_type_is_an_error() {
        let registry = DeserializerRegistry::with_defaults();
        let err = registry.deserialize::<Customer>("text/plain", "hello").unwrap_err();
        assert!(matches!(err, RestError::NoDeserializer(ref ct) if ct == "text/plain"));
    }

    #[test]
    fn malformed_body_is_a_deserialization_error() {
        let registry = DeserializerRegistry::with_defaults();
        let err = registry.deserialize::<Customer>("application/json", "not json").unwrap_err();
        assert!(matches!(err, RestError::DeserializationError(_)));
    }

    #[test]
    fn shape_mismatch_is_a_deserialization_error() {
        let registry = DeserializerRegistry::with_defaults();
        let err = registry
            .deserialize::<Customer>("application/json", r#"{"name":"Jane"}"#)
            .unwrap_err();
        assert!(matches!(err, RestError::DeserializationError(_)));
    }

    #[test]
    fn trailing_input_is_a_deserialization_error() {
        let registry = DeserializerRegistry::with_defaults();
        let err = registry
            .deserialize::<Customer>("application/json", r#"{"id":1} {"id":2}"#)
            .unwrap_err();
        assert!(matches!(err, RestError::DeserializationError(_)));
    }

    #[test]
    fn decoding_matches_serde_json_directly() {
        let registry = DeserializerRegistry::with_defaults();

        let big = "18446744073709551616";
        let via_registry: u128 = registry.deserialize("application/json", big).unwrap();
        assert_eq!(via_registry, serde_json::from_str::<u128>(big).unwrap());

        let precise = "0.30000000000000004";
        let via_registry: f64 = registry.deserialize("text/json", precise).unwrap();
        assert_eq!(via_registry, serde_json::from_str::<f64>(precise).unwrap());

        let duplicated = r#"{"id":1,"id":2}"#;
        assert!(serde_json::from_str::<Customer>(duplicated).is_err());
        let err = registry
            .deserialize::<Customer>("application/json", duplicated)
            .unwrap_err();
        assert!(matches!(err, RestError::DeserializationError(ref m) if m.contains("duplicate")));
    }

    #[test]
    fn custom_handlers_can_be_registered() {
        use serde::de::IntoDeserializer;

        struct PlainText;
        impl Deserializer for PlainText {
            fn deserialize_with<'de>(
                &self,
                content: &'de str,
                visit: &mut Visit<'_, 'de>,
            ) -> Result<()> {
                let text: serde::de::value::StrDeserializer<'de, serde::de::value::Error> =
                    content.trim().into_deserializer();
                let mut erased = <dyn erased_serde::Deserializer>::erase(text);
                visit(&mut erased).map_err(|e| RestError::DeserializationError(e.to_string()))
            }
        }

        let registry = DeserializerRegistry::empty().register("text/plain", PlainText);
        let greeting: String = registry.deserialize("text/plain", " hello\n").unwrap();
        assert_eq!(greeting, "hello");
        assert!(!registry.contains("application/json"));
    }
}
