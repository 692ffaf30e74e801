//! Schema-less entity records
//!
//! A [`DynamicRecord`] is whatever object the server sent, field for field,
//! in arrival order. Presentation code reads it only through the coercing
//! accessors, which never fail.

use crate::error::RecordError;
use crate::title::TitleStrategy;
use crate::value::{FieldValue, NOT_AVAILABLE};
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Field names probed by [`DynamicRecord::describe`], in order
pub const DESCRIPTION_KEYS: [&str; 2] = ["description", "desc"];

/// Returned by [`DynamicRecord::describe`] when no description field resolves
pub const NO_DESCRIPTION: &str = "Description not available";

/// Ordered field map for one API entity
///
/// Equality is structural: same keys with equal values, independent of
/// field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DynamicRecord {
    fields: IndexMap<String, FieldValue>,
}

impl DynamicRecord {
    /// Create an empty record
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a decoded JSON value
    ///
    /// # Errors
    /// - `RecordError::NotAnObject` if the value is not a JSON object
    pub fn from_json(value: Value) -> Result<Self, RecordError> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(RecordError::NotAnObject {
                found: json_kind(&other),
            }),
        }
    }

    /// Build from JSON text
    ///
    /// # Errors
    /// - `RecordError::Json` if the text is not valid JSON
    /// - `RecordError::NotAnObject` if it is valid JSON but not an object
    pub fn from_json_str(text: &str) -> Result<Self, RecordError> {
        Self::from_json(serde_json::from_str(text)?)
    }

    /// Build from a JSON object, copying every top-level field
    #[must_use]
    pub fn from_map(map: Map<String, Value>) -> Self {
        let fields = map
            .into_iter()
            .map(|(key, value)| (key, FieldValue::from_json(value)))
            .collect();
        Self { fields }
    }

    /// Insert or replace a field
    ///
    /// A replaced field keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.fields.insert(key.into(), value.into())
    }

    /// Builder form of [`DynamicRecord::insert`]
    #[inline]
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Coerced string for `key`, `"N/A"` when missing or absent
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> String {
        self.get_or(key, NOT_AVAILABLE)
    }

    /// Coerced string for `key`, `fallback` when missing or absent
    #[must_use]
    pub fn get_or(&self, key: &str, fallback: &str) -> String {
        self.fields
            .get(key)
            .map_or_else(|| fallback.to_string(), |value| value.render_or(fallback))
    }

    /// Raw field value
    #[inline]
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Check whether a field name is present
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Field names in arrival order
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.fields.keys().map(String::as_str)
    }

    /// First field name, if any
    #[inline]
    #[must_use]
    pub fn first_key(&self) -> Option<&str> {
        self.fields.keys().next().map(String::as_str)
    }

    /// Fields in arrival order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &FieldValue)> + '_ {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether the record has no fields
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Best-effort description text
    ///
    /// Probes [`DESCRIPTION_KEYS`] in order and returns the first value that
    /// does not coerce to the fallback; otherwise [`NO_DESCRIPTION`].
    #[must_use]
    pub fn describe(&self) -> String {
        DESCRIPTION_KEYS
            .iter()
            .map(|key| self.get(key))
            .find(|value| value != NOT_AVAILABLE)
            .unwrap_or_else(|| NO_DESCRIPTION.to_string())
    }

    /// Title under the default positional heuristic (first field wins)
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> String {
        TitleStrategy::FirstField.title_of(self)
    }

    /// Title under an explicit strategy
    #[inline]
    #[must_use]
    pub fn display_name_with(&self, strategy: &TitleStrategy) -> String {
        strategy.title_of(self)
    }

    /// Every field as `(key, display string)` in arrival order
    #[must_use]
    pub fn rendered_fields(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|(key, value)| (key.clone(), value.render_or(NOT_AVAILABLE)))
            .collect()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for DynamicRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let fields = iter
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self { fields }
    }
}

impl<'de> Deserialize<'de> for DynamicRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::<String, Value>::deserialize(deserializer).map(Self::from_map)
    }
}

impl Serialize for DynamicRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
