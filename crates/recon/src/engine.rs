use crate::config::MergeConfig;
use crate::error::MergeError;
use crate::index::OccurrenceIndex;
use crate::link::{annotate, LinkTemplate};
use crate::model::{MergeMeta, MergeResult, Side, Snapshot};
use crate::preprocess::retain_keyed;
use crate::reconcile::reconcile;
use crate::schema::columns_of_interest;
use crate::summary::MergeSummary;

/// Run one merge per config. Returns merged rows + classification + summary.
pub fn run(config: &MergeConfig, baseline: Snapshot, incoming: Snapshot) -> Result<MergeResult, MergeError> {
    config.validate()?;

    let key_column = config.key_column.as_str();
    check_key_column(&baseline, key_column)?;
    check_key_column(&incoming, key_column)?;

    let baseline_label = baseline.label;
    let incoming_label = incoming.label;

    let baseline = retain_keyed(baseline.rows, key_column);
    let incoming = retain_keyed(incoming.rows, key_column);

    let interest = columns_of_interest(&baseline.rows, key_column)?;

    let mut duplicates = OccurrenceIndex::build(&baseline.rows).duplicates(Side::Baseline);
    duplicates.extend(OccurrenceIndex::build(&incoming.rows).duplicates(Side::Incoming));

    let baseline_rows = baseline.rows.len();
    let incoming_rows = incoming.rows.len();

    let mut merged = reconcile(baseline.rows, &incoming.rows, &interest);
    annotate(
        &mut merged.rows,
        &config.link.column,
        &LinkTemplate::new(config.link.template.as_str()),
    );

    let summary = MergeSummary {
        baseline_rows,
        incoming_rows,
        dropped_baseline: baseline.dropped,
        dropped_incoming: incoming.dropped,
        merged_rows: merged.rows.len(),
        ..MergeSummary::from_classification(&merged.classification)
    };

    Ok(MergeResult {
        meta: MergeMeta {
            baseline: baseline_label,
            incoming: incoming_label,
            key_column: key_column.to_string(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        rows: merged.rows,
        columns_of_interest: interest,
        classification: merged.classification,
        summary,
        duplicates,
    })
}

/// The only schema check: the key column must be in the header.
pub fn check_key_column(snapshot: &Snapshot, key_column: &str) -> Result<(), MergeError> {
    if snapshot.columns.iter().any(|c| c == key_column) {
        Ok(())
    } else {
        Err(MergeError::MissingKeyColumn {
            source: snapshot.label.clone(),
            column: key_column.to_string(),
        })
    }
}
