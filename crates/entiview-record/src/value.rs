//! Field values for schema-less records
//!
//! Provides [`FieldValue`], the closed set of shapes a top-level entity field
//! can take once it has been read off the wire.

use serde::{Serialize, Serializer};
use serde_json::{Number, Value};
use std::fmt::{self, Display, Formatter};

/// Literal used when a field is missing or carries no value
pub const NOT_AVAILABLE: &str = "N/A";

/// One top-level field value of a [`DynamicRecord`](crate::DynamicRecord)
///
/// Nested objects and arrays are not flattened; they are kept as their JSON
/// text in [`FieldValue::Opaque`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// JSON string
    Text(String),
    /// JSON number, kept in its arrival representation
    Number(Number),
    /// JSON boolean
    Boolean(bool),
    /// JSON `null`
    Absent,
    /// Object or array, as serialized JSON text
    Opaque(String),
}

impl FieldValue {
    /// Convert a decoded JSON value
    #[must_use]
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            Value::Number(number) => Self::Number(number),
            Value::Bool(flag) => Self::Boolean(flag),
            Value::Null => Self::Absent,
            nested @ (Value::Array(_) | Value::Object(_)) => Self::Opaque(nested.to_string()),
        }
    }

    /// Whether the value is the "not available" sentinel
    #[inline]
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Display string, or `None` for [`FieldValue::Absent`]
    #[must_use]
    pub fn render(&self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text.clone()),
            Self::Number(number) => Some(number.to_string()),
            Self::Boolean(flag) => Some(flag.to_string()),
            Self::Absent => None,
            Self::Opaque(raw) => Some(raw.clone()),
        }
    }

    /// Display string with `fallback` standing in for absence
    #[inline]
    #[must_use]
    pub fn render_or(&self, fallback: &str) -> String {
        self.render().unwrap_or_else(|| fallback.to_string())
    }

    /// Back to a JSON value
    ///
    /// Opaque text that no longer parses is returned as a JSON string.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Number(number) => Value::Number(number.clone()),
            Self::Boolean(flag) => Value::Bool(*flag),
            Self::Absent => Value::Null,
            Self::Opaque(raw) => {
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()))
            }
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_or(NOT_AVAILABLE))
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self::from_json(value)
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<bool> for FieldValue {
    fn from(flag: bool) -> Self {
        Self::Boolean(flag)
    }
}

impl From<i64> for FieldValue {
    fn from(number: i64) -> Self {
        Self::Number(number.into())
    }
}

impl From<f64> for FieldValue {
    /// Non-finite floats have no JSON form and become [`FieldValue::Absent`].
    fn from(number: f64) -> Self {
        Number::from_f64(number).map_or(Self::Absent, Self::Number)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_covers_every_shape() {
        assert_eq!(FieldValue::from_json(json!("x")), FieldValue::Text("x".into()));
        assert_eq!(FieldValue::from_json(json!(25)), FieldValue::from(25_i64));
        assert_eq!(FieldValue::from_json(json!(true)), FieldValue::Boolean(true));
        assert_eq!(FieldValue::from_json(Value::Null), FieldValue::Absent);
        assert_eq!(
            FieldValue::from_json(json!({"a": 1})),
            FieldValue::Opaque(r#"{"a":1}"#.into())
        );
        assert_eq!(
            FieldValue::from_json(json!([1, "two"])),
            FieldValue::Opaque(r#"[1,"two"]"#.into())
        );
    }

    #[test]
    fn numbers_render_as_they_arrived() {
        assert_eq!(FieldValue::from_json(json!(25)).render().unwrap(), "25");
        assert_eq!(FieldValue::from_json(json!(95.5)).render().unwrap(), "95.5");
        assert_eq!(FieldValue::from_json(json!(-3)).render().unwrap(), "-3");
    }

    #[test]
    fn absent_uses_fallback() {
        assert_eq!(FieldValue::Absent.render(), None);
        assert_eq!(FieldValue::Absent.render_or("none"), "none");
        assert_eq!(FieldValue::Absent.to_string(), NOT_AVAILABLE);
    }

    #[test]
    fn non_finite_float_is_absent() {
        assert!(FieldValue::from(f64::NAN).is_absent());
        assert!(FieldValue::from(None::<bool>).is_absent());
    }

    #[test]
    fn opaque_serializes_as_nested_json() {
        let value = FieldValue::from_json(json!({"inner": [1, 2]}));
        assert_eq!(serde_json::to_value(&value).unwrap(), json!({"inner": [1, 2]}));
    }
}
