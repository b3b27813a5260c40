use crate::error::MergeError;
use crate::model::{InterestColumns, KeyedRow};

/// Columns of interest = the columns of the baseline's first row.
///
/// The first row is the authoritative schema: a column that only exists in the
/// incoming snapshot is never carried into the merge. An empty baseline has no
/// sample, which is fatal.
pub fn columns_of_interest(baseline: &[KeyedRow], key_column: &str) -> Result<InterestColumns, MergeError> {
    let sample = baseline.first().ok_or_else(|| MergeError::EmptyBaseline {
        column: key_column.to_string(),
    })?;

    Ok(sample.row.columns().collect())
}
