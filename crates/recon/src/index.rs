use std::collections::HashMap;

use crate::model::{DuplicateKey, KeyedRow, Side};

/// Key → position of the last row holding that key.
///
/// Stores positions rather than references so the indexed slice can be
/// consumed afterwards; `get` re-borrows the rows it was built from.
#[derive(Debug, Clone, Default)]
pub struct OccurrenceIndex {
    positions: HashMap<String, usize>,
    counts: HashMap<String, usize>,
}

impl OccurrenceIndex {
    /// Later duplicates overwrite earlier ones (last-write-wins).
    pub fn build(rows: &[KeyedRow]) -> Self {
        let mut index = Self::default();
        for (i, keyed) in rows.iter().enumerate() {
            index.positions.insert(keyed.key.clone(), i);
            *index.counts.entry(keyed.key.clone()).or_insert(0) += 1;
        }
        index
    }

    pub fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.positions.get(key).copied()
    }

    /// Look up `key` in the rows this index was built from.
    pub fn get<'r>(&self, rows: &'r [KeyedRow], key: &str) -> Option<&'r KeyedRow> {
        self.position(key).and_then(|i| rows.get(i))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Keys seen on more than one row, sorted by key.
    pub fn duplicates(&self, side: Side) -> Vec<DuplicateKey> {
        let mut dups: Vec<DuplicateKey> = self
            .counts
            .iter()
            .filter(|&(_, &count)| count > 1)
            .map(|(key, &count)| DuplicateKey {
                side,
                key: key.clone(),
                count,
            })
            .collect();
        dups.sort_by(|a, b| a.key.cmp(&b.key));
        dups
    }
}
