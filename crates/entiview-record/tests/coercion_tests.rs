use entiview_record::{DynamicRecord, NOT_AVAILABLE, UNNAMED_ENTITY};
use proptest::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Map, Value};

fn expected_coercion(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null => NOT_AVAILABLE.to_string(),
        nested => nested.to_string(),
    }
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        ".{0,12}".prop_map(Value::String),
        any::<i64>().prop_map(Value::from),
        (-1.0e9f64..1.0e9f64).prop_map(Value::from),
        any::<bool>().prop_map(Value::Bool),
        Just(Value::Null),
    ]
}

fn json_value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(2, 8, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,4}", inner), 0..4)
                .prop_map(|pairs| Value::Object(pairs.into_iter().collect())),
        ]
    })
}

fn json_object() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::vec(("[a-z_]{1,8}", json_value()), 0..8)
        .prop_map(|pairs| pairs.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_get_matches_coerced_source(object in json_object()) {
        let record = DynamicRecord::from_map(object.clone());

        for (key, value) in &object {
            prop_assert_eq!(record.get(key), expected_coercion(value));
        }
    }

    #[test]
    fn prop_missing_keys_return_fallback(object in json_object(), fallback in ".{0,6}") {
        let record = DynamicRecord::from_map(object);
        let missing = "KEY-NOT-IN-LOWERCASE-ALPHABET";

        prop_assert_eq!(record.get(missing), NOT_AVAILABLE);
        prop_assert_eq!(record.get_or(missing, &fallback), fallback);
    }

    #[test]
    fn prop_keys_keep_arrival_order(object in json_object()) {
        let record = DynamicRecord::from_map(object.clone());
        let keys: Vec<&str> = record.keys().collect();
        let source: Vec<&str> = object.keys().map(String::as_str).collect();

        prop_assert_eq!(keys, source);
    }

    #[test]
    fn prop_display_name_is_first_value(object in json_object()) {
        let record = DynamicRecord::from_map(object.clone());

        match object.iter().next() {
            Some((_, value)) => prop_assert_eq!(record.display_name(), expected_coercion(value)),
            None => prop_assert_eq!(record.display_name(), UNNAMED_ENTITY),
        }
    }
}

#[test]
fn wire_order_decides_the_title() {
    let record = DynamicRecord::from_json_str(r#"{"id": 1, "name": "Widget"}"#).unwrap();
    assert_eq!(record.display_name(), record.get("id"));
    assert_eq!(record.display_name(), "1");

    let reordered = DynamicRecord::from_json_str(r#"{"name": "Widget", "id": 1}"#).unwrap();
    assert_eq!(reordered.display_name(), "Widget");
    assert_eq!(record, reordered);
}
