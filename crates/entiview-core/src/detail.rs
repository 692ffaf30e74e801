//! Detail view payloads
//!
//! A [`DetailPayload`] is a materialized snapshot of one record: every
//! field as an ordered `(key, display string)` pair. It does not borrow the
//! live record, so a refresh cannot change a detail view already handed out.

use entiview_client::Keypass;
use entiview_record::DynamicRecord;
use serde::Serialize;

/// Title used when the payload has no fields
pub const DEFAULT_DETAIL_TITLE: &str = "Entity Details";

/// Ordered snapshot of a record for the detail view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetailPayload {
    fields: Vec<(String, String)>,
}

impl DetailPayload {
    /// Snapshot `record`
    #[must_use]
    pub fn from_record(record: &DynamicRecord) -> Self {
        Self {
            fields: record.rendered_fields(),
        }
    }

    /// All fields in arrival order
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Display string of `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First value, or [`DEFAULT_DETAIL_TITLE`]
    #[must_use]
    pub fn title(&self) -> &str {
        self.fields
            .first()
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_DETAIL_TITLE)
    }

    /// Fields whose key does not mention a description
    #[must_use]
    pub fn properties(&self) -> Vec<(&str, &str)> {
        self.fields
            .iter()
            .filter(|(key, _)| !is_description_key(key))
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    /// Fields whose key mentions a description
    #[must_use]
    pub fn descriptions(&self) -> Vec<(&str, &str)> {
        self.fields
            .iter()
            .filter(|(key, _)| is_description_key(key))
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    /// Text body of the detail view
    ///
    /// Numbered `Property N: value` paragraphs, then one
    /// `Description: value` paragraph per description field.
    #[must_use]
    pub fn render(&self) -> String {
        let mut blocks: Vec<String> = self
            .properties()
            .into_iter()
            .enumerate()
            .map(|(i, (_, value))| format!("Property {}: {value}", i + 1))
            .collect();
        blocks.extend(
            self.descriptions()
                .into_iter()
                .map(|(_, value)| format!("Description: {value}")),
        );
        blocks.join("\n\n")
    }
}

fn is_description_key(key: &str) -> bool {
    key.to_lowercase().contains("desc")
}

/// Everything the detail view needs: the snapshot plus the active keypass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub payload: DetailPayload,
    pub keypass: Keypass,
}
