//! `snapmerge <baseline> <incoming>` — load both snapshots, merge, write, report.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use snapmerge_recon::model::{Classification, DuplicateKey, MergeMeta, Snapshot};
use snapmerge_recon::{MergeConfig, MergeError, MergeResult, MergeSummary};

use crate::output::{dated_output_path, today};
use crate::CliError;

/// Parsed command-line options for one merge run.
pub struct MergeArgs {
    pub baseline: PathBuf,
    pub incoming: PathBuf,
    pub config: Option<PathBuf>,
    pub key_column: Option<String>,
    pub link_column: Option<String>,
    pub link_template: Option<String>,
    pub output_prefix: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub dry_run: bool,
    pub json: bool,
}

/// Machine-readable run report for `--json`.
#[derive(Serialize)]
struct RunReport<'a> {
    meta: &'a MergeMeta,
    output: Option<String>,
    dry_run: bool,
    columns_of_interest: &'a [String],
    summary: &'a MergeSummary,
    classification: &'a Classification,
    duplicates: &'a [DuplicateKey],
}

pub async fn cmd_merge(args: MergeArgs) -> Result<(), CliError> {
    let config = resolve_config(&args).await?;

    info!("Baseline file: {}", args.baseline.display());
    info!("Incoming file: {}", args.incoming.display());

    // Both parses run concurrently; the first failure aborts the run
    let (baseline, incoming) = tokio::try_join!(
        load_snapshot(args.baseline.clone()),
        load_snapshot(args.incoming.clone())
    )?;

    let result = snapmerge_recon::run(&config, baseline, incoming).map_err(merge_err)?;
    log_result(&result);

    let output_path = args.output.clone().unwrap_or_else(|| {
        dated_output_path(Path::new(&config.output.directory), &config.output.prefix, today())
    });

    // A failed write is reported after the summary; the merge itself is done
    let written = if args.dry_run {
        info!("Dry run: not writing {}", output_path.display());
        Ok(None)
    } else {
        snapmerge_io::csv::export(result.output_rows(), &output_path)
            .map(|()| {
                info!("Success! Results were written to {}", output_path.display());
                Some(output_path)
            })
            .map_err(|e| CliError::write(format!("cannot write output: {e}")))
    };

    let output_label = written
        .as_ref()
        .ok()
        .and_then(|path| path.as_ref())
        .map(|path| path.display().to_string());
    print_report(&result, output_label, args.dry_run, args.json)?;

    written.map(|_| ())
}

/// Defaults < config file < individual flags.
async fn resolve_config(args: &MergeArgs) -> Result<MergeConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            let text = tokio::fs::read_to_string(path).await.map_err(|e| {
                CliError::args(format!("cannot read config {}: {e}", path.display()))
            })?;
            MergeConfig::from_toml(&text).map_err(|e| CliError::args(format!("{}: {e}", path.display())))?
        }
        None => MergeConfig::default(),
    };

    if let Some(ref key_column) = args.key_column {
        config.key_column = key_column.clone();
    }
    if let Some(ref link_column) = args.link_column {
        config.link.column = link_column.clone();
    }
    if let Some(ref link_template) = args.link_template {
        config.link.template = link_template.clone();
    }
    if let Some(ref prefix) = args.output_prefix {
        config.output.prefix = prefix.clone();
    }
    if let Some(ref dir) = args.output_dir {
        config.output.directory = dir.display().to_string();
    }

    config.validate().map_err(|e| CliError::args(e.to_string()))?;
    Ok(config)
}

async fn load_snapshot(path: PathBuf) -> Result<Snapshot, CliError> {
    info!("Reading {}", path.display());

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| CliError::input(format!("cannot read {}: {e}", path.display())))?;

    let label = path.display().to_string();
    tokio::task::spawn_blocking(move || {
        let content = snapmerge_io::csv::decode(bytes);
        snapmerge_io::csv::parse_snapshot(&label, &content)
    })
    .await
    .map_err(|e| CliError::internal(format!("parse task for {} failed: {e}", path.display())))?
    .map_err(|e| CliError::input(format!("cannot parse {e}")))
}

fn merge_err(err: MergeError) -> CliError {
    match err {
        MergeError::MissingKeyColumn { .. } => CliError::precondition(err.to_string())
            .with_hint("pick the ID column with --key-column or key_column in the config"),
        MergeError::EmptyBaseline { .. } => CliError::precondition(err.to_string())
            .with_hint("the baseline needs at least one row with a key value to sample its columns"),
        MergeError::ConfigParse(_) | MergeError::ConfigValidation(_) => CliError::args(err.to_string()),
    }
}

fn log_result(result: &MergeResult) {
    let s = &result.summary;
    info!("Rows in baseline file: {}", s.baseline_rows);
    info!("Rows in incoming file: {}", s.incoming_rows);
    if s.dropped_baseline > 0 || s.dropped_incoming > 0 {
        info!(
            "Skipped rows without a {} value: {} baseline, {} incoming",
            result.meta.key_column, s.dropped_baseline, s.dropped_incoming,
        );
    }

    for column in result.columns_of_interest.names() {
        debug!("Column of interest: {column}");
    }

    // Last row wins for a repeated key; earlier rows with that key are shadowed
    if !result.duplicates.is_empty() {
        warn!(
            "{} key(s) appear on more than one row; the last occurrence is used for matching",
            result.duplicates.len(),
        );
        for dup in &result.duplicates {
            debug!("{} key {:?} appears {} times", dup.side, dup.key, dup.count);
        }
    }
}

fn print_report(
    result: &MergeResult,
    output: Option<String>,
    dry_run: bool,
    json: bool,
) -> Result<(), CliError> {
    if json {
        let report = RunReport {
            meta: &result.meta,
            output,
            dry_run,
            columns_of_interest: result.columns_of_interest.names(),
            summary: &result.summary,
            classification: &result.classification,
            duplicates: &result.duplicates,
        };
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::internal(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
        return Ok(());
    }

    let s = &result.summary;
    println!("Added rows: {}", s.added);
    println!("Removed rows: {}", s.removed);
    println!("Updated rows: {}", s.updated);
    println!("Unchanged rows: {}", s.unchanged);
    Ok(())
}
