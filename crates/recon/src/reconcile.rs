// Two-pass merge of an incoming snapshot into a baseline.
// Pure function: rows in, merged rows + per-key classification out.

use crate::index::OccurrenceIndex;
use crate::model::{Classification, InterestColumns, KeyedRow, Row};

#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    pub rows: Vec<KeyedRow>,
    pub classification: Classification,
}

/// Merge `incoming` into `baseline`.
///
/// Pass 1 walks the baseline: rows whose key is gone from `incoming` are
/// removed, the rest take the incoming value of every column of interest that
/// differs. Pass 2 walks `incoming` and appends rows whose key was not in the
/// original baseline, keeping only columns of interest.
///
/// Values are compared byte-for-byte; nothing is trimmed or coerced.
pub fn reconcile(
    baseline: Vec<KeyedRow>,
    incoming: &[KeyedRow],
    interest: &InterestColumns,
) -> Reconciliation {
    // Membership for pass 2 must reflect the baseline before any removals
    let baseline_index = OccurrenceIndex::build(&baseline);
    let incoming_index = OccurrenceIndex::build(incoming);

    let mut classification = Classification::default();
    let mut rows = Vec::with_capacity(baseline.len());

    // Pass 1: remove + update
    for mut keyed in baseline {
        let Some(source) = incoming_index.get(incoming, &keyed.key) else {
            classification.removed.push(keyed.key);
            continue;
        };

        if apply_updates(&mut keyed.row, &source.row, interest) {
            classification.updated.push(keyed.key.clone());
        } else {
            classification.unchanged.push(keyed.key.clone());
        }
        rows.push(keyed);
    }

    // Pass 2: add
    for keyed in incoming {
        if baseline_index.contains(&keyed.key) {
            continue;
        }
        rows.push(KeyedRow {
            key: keyed.key.clone(),
            row: project(&keyed.row, interest),
        });
        classification.added.push(keyed.key.clone());
    }

    Reconciliation { rows, classification }
}

/// Copy differing interest-column values from `source` into `target`.
/// Returns whether anything changed.
fn apply_updates(target: &mut Row, source: &Row, interest: &InterestColumns) -> bool {
    let mut touched = false;
    for (column, value) in source.iter() {
        if !interest.contains(column) {
            continue;
        }
        if target.get(column) != Some(value) {
            target.set(column, value);
            touched = true;
        }
    }
    touched
}

/// New row holding only the interest columns present in `source`, in `source` order.
fn project(source: &Row, interest: &InterestColumns) -> Row {
    source
        .iter()
        .filter(|(column, _)| interest.contains(column))
        .collect()
}
