//! List diff for incremental refresh
//!
//! Items are matched by an identity key (for records, the display name)
//! along a longest common subsequence. Matched pairs are then compared
//! structurally to tell changed from unchanged.

use serde::Serialize;

/// One step of a [`ListDiff`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Change {
    /// Same identity and equal content
    Unchanged { old: usize, new: usize },
    /// Same identity, different content
    Changed { old: usize, new: usize },
    /// Only in the new list
    Inserted { new: usize },
    /// Only in the old list
    Removed { old: usize },
}

/// Edit script from an old list to a new one, in list order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListDiff {
    changes: Vec<Change>,
}

impl ListDiff {
    /// Diff `old` against `new`, matching items by `key`
    pub fn compute<T, K, F>(old: &[T], new: &[T], key: F) -> Self
    where
        T: PartialEq,
        K: PartialEq,
        F: Fn(&T) -> K,
    {
        let old_keys: Vec<K> = old.iter().map(&key).collect();
        let new_keys: Vec<K> = new.iter().map(&key).collect();
        let (n, m) = (old_keys.len(), new_keys.len());

        // lcs[i][j] = LCS length of old_keys[i..] and new_keys[j..]
        let mut lcs = vec![vec![0usize; m + 1]; n + 1];
        for i in (0..n).rev() {
            for j in (0..m).rev() {
                lcs[i][j] = if old_keys[i] == new_keys[j] {
                    lcs[i + 1][j + 1] + 1
                } else {
                    lcs[i + 1][j].max(lcs[i][j + 1])
                };
            }
        }

        let mut changes = Vec::with_capacity(n.max(m));
        let (mut i, mut j) = (0, 0);
        while i < n && j < m {
            if old_keys[i] == new_keys[j] {
                changes.push(if old[i] == new[j] {
                    Change::Unchanged { old: i, new: j }
                } else {
                    Change::Changed { old: i, new: j }
                });
                i += 1;
                j += 1;
            } else if lcs[i + 1][j] >= lcs[i][j + 1] {
                changes.push(Change::Removed { old: i });
                i += 1;
            } else {
                changes.push(Change::Inserted { new: j });
                j += 1;
            }
        }
        changes.extend((i..n).map(|old| Change::Removed { old }));
        changes.extend((j..m).map(|new| Change::Inserted { new }));

        Self { changes }
    }

    #[inline]
    #[must_use]
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// New-list positions that were inserted
    #[must_use]
    pub fn inserted(&self) -> Vec<usize> {
        self.changes
            .iter()
            .filter_map(|c| match c {
                Change::Inserted { new } => Some(*new),
                _ => None,
            })
            .collect()
    }

    /// Old-list positions that were removed
    #[must_use]
    pub fn removed(&self) -> Vec<usize> {
        self.changes
            .iter()
            .filter_map(|c| match c {
                Change::Removed { old } => Some(*old),
                _ => None,
            })
            .collect()
    }

    /// New-list positions whose content changed
    #[must_use]
    pub fn changed(&self) -> Vec<usize> {
        self.changes
            .iter()
            .filter_map(|c| match c {
                Change::Changed { new, .. } => Some(*new),
                _ => None,
            })
            .collect()
    }

    /// New-list positions carried over untouched
    #[must_use]
    pub fn unchanged(&self) -> Vec<usize> {
        self.changes
            .iter()
            .filter_map(|c| match c {
                Change::Unchanged { new, .. } => Some(*new),
                _ => None,
            })
            .collect()
    }

    /// Check whether the lists were equal
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.changes
            .iter()
            .all(|c| matches!(c, Change::Unchanged { .. }))
    }
}
