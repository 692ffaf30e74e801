//! Record collections as returned by the dashboard endpoint

use crate::record::DynamicRecord;
use serde::Serialize;

/// Records of one dashboard fetch plus the server's declared total
///
/// `declared_total` is advisory; it is carried for display and never
/// reconciled with the number of records actually received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordCollection {
    records: Vec<DynamicRecord>,
    declared_total: i64,
}

impl RecordCollection {
    /// Create a collection
    #[inline]
    #[must_use]
    pub fn new(records: Vec<DynamicRecord>, declared_total: i64) -> Self {
        Self {
            records,
            declared_total,
        }
    }

    /// Records in server order
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[DynamicRecord] {
        &self.records
    }

    /// Take ownership of the records
    #[inline]
    #[must_use]
    pub fn into_records(self) -> Vec<DynamicRecord> {
        self.records
    }

    /// Server-declared total
    #[inline]
    #[must_use]
    pub fn declared_total(&self) -> i64 {
        self.declared_total
    }

    /// Number of records received
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether no records were received
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the declared total differs from the received count
    #[must_use]
    pub fn total_mismatch(&self) -> bool {
        i64::try_from(self.records.len()).map_or(true, |len| len != self.declared_total)
    }
}

impl<'a> IntoIterator for &'a RecordCollection {
    type Item = &'a DynamicRecord;
    type IntoIter = std::slice::Iter<'a, DynamicRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_total_is_informational() {
        let records = vec![DynamicRecord::new().with_field("id", 1_i64)];

        let agreeing = RecordCollection::new(records.clone(), 1);
        assert!(!agreeing.total_mismatch());

        let diverging = RecordCollection::new(records, 40);
        assert_eq!(diverging.len(), 1);
        assert_eq!(diverging.declared_total(), 40);
        assert!(diverging.total_mismatch());
    }

    #[test]
    fn empty_collection() {
        let empty = RecordCollection::default();
        assert!(empty.is_empty());
        assert!(!empty.total_mismatch());
        assert_eq!(empty.into_iter().count(), 0);
    }
}
