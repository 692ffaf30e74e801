//! Title selection for records whose shape is unknown
//!
//! The server sends no hint about which field names an entity. The default
//! treats the first arriving field as the title; deployments that know their
//! shape can name the fields to probe instead.

use crate::record::DynamicRecord;
use crate::value::NOT_AVAILABLE;
use serde::{Deserialize, Serialize};

/// Returned when a record has no fields at all
pub const UNNAMED_ENTITY: &str = "Unnamed Entity";

/// How a record's display title is chosen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleStrategy {
    /// Value of the first field in arrival order
    #[default]
    FirstField,
    /// First named field with a value, then the first field
    Fields(Vec<String>),
}

impl TitleStrategy {
    /// Probe the given field names before falling back to the first field
    #[must_use]
    pub fn fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fields(names.into_iter().map(Into::into).collect())
    }

    /// Title for `record`
    #[must_use]
    pub fn title_of(&self, record: &DynamicRecord) -> String {
        match self {
            Self::FirstField => first_field_title(record),
            Self::Fields(names) => names
                .iter()
                .filter_map(|name| record.field(name))
                .find_map(|value| value.render())
                .unwrap_or_else(|| first_field_title(record)),
        }
    }
}

fn first_field_title(record: &DynamicRecord) -> String {
    record.first_key().map_or_else(
        || UNNAMED_ENTITY.to_string(),
        |key| record.get_or(key, NOT_AVAILABLE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn widget() -> DynamicRecord {
        DynamicRecord::from_json(json!({"id": 1, "name": "Widget", "label": null})).unwrap()
    }

    #[test]
    fn first_field_is_default() {
        assert_eq!(TitleStrategy::default().title_of(&widget()), "1");
    }

    #[test]
    fn named_fields_are_probed_in_order() {
        let strategy = TitleStrategy::fields(["title", "name"]);
        assert_eq!(strategy.title_of(&widget()), "Widget");
    }

    #[test]
    fn absent_named_field_is_skipped() {
        let strategy = TitleStrategy::fields(["label", "name"]);
        assert_eq!(strategy.title_of(&widget()), "Widget");
    }

    #[test]
    fn named_fields_fall_back_to_first_field() {
        let strategy = TitleStrategy::fields(["title"]);
        assert_eq!(strategy.title_of(&widget()), "1");
        assert_eq!(strategy.title_of(&DynamicRecord::new()), UNNAMED_ENTITY);
    }

    #[test]
    fn strategy_reads_from_config_text() {
        let strategy: TitleStrategy = serde_json::from_value(json!({"fields": ["name"]})).unwrap();
        assert_eq!(strategy, TitleStrategy::fields(["name"]));
    }
}
