//! # Value Conversion Registry
//!
//! Filter values arrive as JSON scalars but must be bound with the backing
//! field's type (a UUID column compared against a parsed UUID, not its
//! string form). [`ValueRegistry`] maps a field's declared `type_key` to a
//! conversion closure from raw JSON value to [`sea_orm::Value`].
//!
//! The registry is an explicit instance threaded through application setup:
//! register converters before request handling begins and share it
//! read-only afterwards. Lookup of an unregistered type key is not an error
//! - the raw value passes through unchanged.

use chrono::{DateTime, Utc};
use sea_orm::Value;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Conversion closure from raw JSON value to bound SQL value.
pub type ConvertFn =
    Arc<dyn Fn(&serde_json::Value) -> Result<Value, ConversionError> + Send + Sync>;

/// A failed conversion: the offending raw value and the expected layout.
///
/// The fit pass attaches the field name and surfaces this as
/// [`crate::GridError::Conversion`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionError {
    /// The raw value that failed to convert
    pub value: String,
    /// Human description of the expected layout
    pub expected: String,
}

impl ConversionError {
    fn new(value: &serde_json::Value, expected: impl Into<String>) -> Self {
        Self {
            value: raw_to_display(value),
            expected: expected.into(),
        }
    }
}

/// Registry of per-type-key value converters.
#[derive(Clone, Default)]
pub struct ValueRegistry {
    converters: HashMap<String, ConvertFn>,
}

impl ValueRegistry {
    /// An empty registry; every type key passes values through unchanged.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in converters: `"timestamp"` (RFC 3339,
    /// normalized to UTC) and `"uuid"`.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("timestamp", |raw| {
            let s = raw
                .as_str()
                .ok_or_else(|| ConversionError::new(raw, "an RFC 3339 timestamp"))?;
            let parsed = DateTime::parse_from_rfc3339(s)
                .map_err(|_| ConversionError::new(raw, "an RFC 3339 timestamp"))?;
            Ok(Value::from(parsed.with_timezone(&Utc)))
        });
        registry.register("uuid", |raw| {
            let s = raw
                .as_str()
                .ok_or_else(|| ConversionError::new(raw, "a UUID"))?;
            let parsed =
                Uuid::parse_str(s).map_err(|_| ConversionError::new(raw, "a UUID"))?;
            Ok(Value::from(parsed))
        });
        registry
    }

    /// Register a converter for a type key, replacing any existing one.
    ///
    /// Registration belongs to application setup; the registry is read-only
    /// during request handling.
    pub fn register<F>(&mut self, type_key: impl Into<String>, convert: F)
    where
        F: Fn(&serde_json::Value) -> Result<Value, ConversionError> + Send + Sync + 'static,
    {
        self.converters.insert(type_key.into(), Arc::new(convert));
    }

    /// Convert a raw value for the given type key.
    ///
    /// A missing or unregistered type key passes the value through with the
    /// default JSON-to-SQL mapping.
    pub fn convert(
        &self,
        type_key: Option<&str>,
        raw: &serde_json::Value,
    ) -> Result<Value, ConversionError> {
        match type_key.and_then(|key| self.converters.get(key)) {
            Some(convert) => convert(raw),
            None => Ok(passthrough(raw)),
        }
    }
}

/// Default JSON-to-SQL value mapping for unregistered types.
fn passthrough(raw: &serde_json::Value) -> Value {
    match raw {
        serde_json::Value::String(s) => Value::from(s.clone()),
        serde_json::Value::Bool(b) => Value::from(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else {
                Value::from(n.as_f64().unwrap_or_default())
            }
        }
        serde_json::Value::Null => Value::String(None),
        // Arrays and objects have no scalar SQL form; bind their JSON text
        other => Value::from(other.to_string()),
    }
}

fn raw_to_display(raw: &serde_json::Value) -> String {
    match raw {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
