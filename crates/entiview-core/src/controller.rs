//! Record list controller
//!
//! Holds the records of the latest dashboard load in server order. Each
//! [`set_collection`](RecordListController::set_collection) replaces the
//! list wholesale and reports a [`ListDiff`] against the previous one so a
//! view can update incrementally.

use crate::detail::DetailPayload;
use crate::diff::ListDiff;
use crate::error::ControllerError;
use entiview_record::{DynamicRecord, RecordCollection, TitleStrategy};
use serde::Serialize;

/// Shown in place of the first property of a record with no fields
pub const NO_DATA: &str = "No data found";

/// One row of the entity list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSummary {
    /// Title under the controller's strategy
    pub title: String,
    /// First field value, or [`NO_DATA`]
    pub first: String,
    /// Second field value, if the record has one
    pub second: Option<String>,
    /// Best-effort description
    pub description: String,
}

impl RecordSummary {
    /// Summarize `record`
    #[must_use]
    pub fn of(record: &DynamicRecord, strategy: &TitleStrategy) -> Self {
        let mut values = record.keys().map(|key| record.get(key));
        Self {
            title: record.display_name_with(strategy),
            first: values.next().unwrap_or_else(|| NO_DATA.to_string()),
            second: values.next(),
            description: record.describe(),
        }
    }
}

/// Ordered list of records with selection and diffing
#[derive(Debug, Clone, Default)]
pub struct RecordListController {
    strategy: TitleStrategy,
    records: Vec<DynamicRecord>,
    declared_total: i64,
}

impl RecordListController {
    /// Create an empty controller
    #[inline]
    #[must_use]
    pub fn new(strategy: TitleStrategy) -> Self {
        Self {
            strategy,
            records: Vec::new(),
            declared_total: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn strategy(&self) -> &TitleStrategy {
        &self.strategy
    }

    /// Title of `record` under this controller's strategy
    #[inline]
    #[must_use]
    pub fn title_of(&self, record: &DynamicRecord) -> String {
        record.display_name_with(&self.strategy)
    }

    /// Replace the list and diff it against the previous one
    ///
    /// Records are the same item when their titles match and changed when
    /// they are not structurally equal.
    pub fn set_collection(&mut self, collection: RecordCollection) -> ListDiff {
        let declared_total = collection.declared_total();
        let records = collection.into_records();
        let diff = ListDiff::compute(&self.records, &records, |record| self.title_of(record));

        tracing::debug!(
            inserted = diff.inserted().len(),
            removed = diff.removed().len(),
            changed = diff.changed().len(),
            "record list replaced"
        );
        self.records = records;
        self.declared_total = declared_total;
        diff
    }

    /// Records in server order
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[DynamicRecord] {
        &self.records
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at `index`
    ///
    /// # Errors
    /// `ControllerError::IndexOutOfRange` if `index >= len`
    pub fn select_record(&self, index: usize) -> Result<&DynamicRecord, ControllerError> {
        self.records.get(index).ok_or(ControllerError::IndexOutOfRange {
            index,
            len: self.records.len(),
        })
    }

    /// Detached snapshot of `record` for the detail view
    #[inline]
    #[must_use]
    pub fn build_detail_payload(&self, record: &DynamicRecord) -> DetailPayload {
        DetailPayload::from_record(record)
    }

    /// One summary row per record
    #[must_use]
    pub fn summaries(&self) -> Vec<RecordSummary> {
        self.records
            .iter()
            .map(|record| RecordSummary::of(record, &self.strategy))
            .collect()
    }

    /// Total the server declared, which may differ from [`len`](Self::len)
    #[inline]
    #[must_use]
    pub fn declared_total(&self) -> i64 {
        self.declared_total
    }

    #[must_use]
    pub fn total_mismatch(&self) -> bool {
        i64::try_from(self.records.len()).map_or(true, |len| len != self.declared_total)
    }

    /// Drop all records
    pub fn clear(&mut self) {
        self.records.clear();
        self.declared_total = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: serde_json::Value) -> DynamicRecord {
        DynamicRecord::from_json(value).unwrap()
    }

    fn collection(values: Vec<serde_json::Value>, total: i64) -> RecordCollection {
        RecordCollection::new(values.into_iter().map(record).collect(), total)
    }

    #[test]
    fn first_load_is_all_inserts() {
        let mut controller = RecordListController::default();
        let diff = controller.set_collection(collection(
            vec![json!({"name": "a"}), json!({"name": "b"})],
            2,
        ));
        assert_eq!(diff.inserted(), vec![0, 1]);
        assert_eq!(controller.len(), 2);
        assert!(!controller.total_mismatch());
    }

    #[test]
    fn refresh_reports_changes_by_title() {
        let mut controller = RecordListController::default();
        controller.set_collection(collection(
            vec![json!({"name": "a", "n": 1}), json!({"name": "b", "n": 2})],
            2,
        ));

        let diff = controller.set_collection(collection(
            vec![json!({"name": "b", "n": 3}), json!({"name": "c"})],
            10,
        ));
        assert_eq!(diff.removed(), vec![0]);
        assert_eq!(diff.changed(), vec![0]);
        assert_eq!(diff.inserted(), vec![1]);
        assert_eq!(controller.declared_total(), 10);
        assert!(controller.total_mismatch());
    }

    #[test]
    fn strategy_decides_identity() {
        let mut controller = RecordListController::new(TitleStrategy::fields(["name"]));
        controller.set_collection(collection(vec![json!({"id": 1, "name": "a"})], 1));

        let diff = controller.set_collection(collection(vec![json!({"id": 2, "name": "a"})], 1));
        assert_eq!(diff.changed(), vec![0]);
        assert_eq!(controller.summaries()[0].title, "a");
    }

    #[test]
    fn select_out_of_range() {
        let mut controller = RecordListController::default();
        controller.set_collection(collection(vec![json!({"id": 1})], 1));

        assert_eq!(controller.select_record(0).unwrap().get("id"), "1");
        assert_eq!(
            controller.select_record(1),
            Err(ControllerError::IndexOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn summaries_follow_field_order() {
        let mut controller = RecordListController::default();
        controller.set_collection(collection(
            vec![
                json!({"artistName": "Monet", "nationality": "French", "desc": "Lilies"}),
                json!({"only": true}),
                json!({}),
            ],
            3,
        ));

        let rows = controller.summaries();
        assert_eq!(
            rows[0],
            RecordSummary {
                title: "Monet".into(),
                first: "Monet".into(),
                second: Some("French".into()),
                description: "Lilies".into(),
            }
        );
        assert_eq!(rows[1].second, None);
        assert_eq!(rows[2].first, NO_DATA);
        assert_eq!(rows[2].title, "Unnamed Entity");
        assert_eq!(rows[2].description, "Description not available");
    }

    #[test]
    fn clear_empties_everything() {
        let mut controller = RecordListController::default();
        controller.set_collection(collection(vec![json!({"id": 1})], 4));
        controller.clear();
        assert!(controller.is_empty());
        assert_eq!(controller.declared_total(), 0);
    }
}
