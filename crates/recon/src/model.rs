use std::collections::HashSet;

use serde::Serialize;

use crate::summary::MergeSummary;

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One record: column name → value, in column order.
///
/// Rows are narrow (a spreadsheet export rarely has more than a few dozen
/// columns), so lookups scan the field list rather than hashing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == column)
    }

    /// Overwrite `column` in place, or append it when the row doesn't have it yet.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.set(column, value);
        }
        row
    }
}

/// A row that survived preprocessing, carrying its key value as read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedRow {
    pub key: String,
    pub row: Row,
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One parsed input file: header order plus data rows.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Human-readable source name (usually the file path), used in errors.
    pub label: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

// ---------------------------------------------------------------------------
// Columns of interest
// ---------------------------------------------------------------------------

/// Column names taken from the baseline's schema sample row.
///
/// Membership is all that matters to the merge; `names()` keeps the sample
/// row's order for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterestColumns {
    names: Vec<String>,
    lookup: HashSet<String>,
}

impl InterestColumns {
    pub fn contains(&self, column: &str) -> bool {
        self.lookup.contains(column)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for InterestColumns {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut columns = InterestColumns::default();
        for name in iter {
            let name = name.into();
            if columns.lookup.insert(name.clone()) {
                columns.names.push(name);
            }
        }
        columns
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Keys per outcome, in the order their pass visited them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Baseline,
    Incoming,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Baseline => write!(f, "baseline"),
            Self::Incoming => write!(f, "incoming"),
        }
    }
}

/// A key that appears on more than one row of the same input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateKey {
    pub side: Side,
    pub key: String,
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MergeResult {
    pub meta: MergeMeta,
    /// Surviving baseline rows in original order, then added rows in incoming order.
    pub rows: Vec<KeyedRow>,
    pub columns_of_interest: InterestColumns,
    pub classification: Classification,
    pub summary: MergeSummary,
    pub duplicates: Vec<DuplicateKey>,
}

impl MergeResult {
    /// Plain rows for serialization.
    pub fn output_rows(&self) -> impl Iterator<Item = &Row> + Clone {
        self.rows.iter().map(|keyed| &keyed.row)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeMeta {
    pub baseline: String,
    pub incoming: String,
    pub key_column: String,
    pub engine_version: String,
    pub run_at: String,
}
