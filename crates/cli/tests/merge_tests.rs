// End-to-end tests for the `snapmerge` binary.
// Run with: cargo test -p snapmerge-cli --test merge_tests -- --nocapture

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

/// Binary running inside `dir`, isolated from the caller's environment.
fn snapmerge(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_snapmerge"));
    cmd.current_dir(dir);
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("SNAPMERGE_CONFIG");
    cmd
}

fn run_brainstorms(dir: &Path, extra: &[&str]) -> Output {
    snapmerge(dir)
        .arg(fixture("brainstorms_old.csv"))
        .arg(fixture("brainstorms_new.csv"))
        .args(extra)
        .output()
        .expect("run snapmerge")
}

fn csv_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".csv"))
        .collect();
    names.sort();
    names
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[test]
fn writes_dated_results_file_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_brainstorms(dir.path(), &[]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let files = csv_files(dir.path());
    assert_eq!(files.len(), 1, "files: {files:?}");
    let name = &files[0];
    assert!(name.starts_with("results_"), "unexpected name {name}");

    // results_M_D_YYYY.csv
    let parts: Vec<&str> = name.trim_end_matches(".csv").split('_').collect();
    assert_eq!(parts.len(), 4, "unexpected name {name}");
    assert!(parts[1..].iter().all(|p| p.parse::<u32>().is_ok()));
    assert!(!parts[1].starts_with('0') && !parts[2].starts_with('0'));
}

#[test]
fn merged_file_contents() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("merged.csv");
    let output = run_brainstorms(dir.path(), &["--output", out.to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let content = std::fs::read_to_string(&out).unwrap();
    let expected = "\
Brainstorm_ID,Title,Status,Votes,Owner,Brainstorm_URL
1002,\"Export to PDF, with charts\",Delivered,41,raj,\"=HYPERLINK(\"\"https://community.workday.com/brainstorms/1002\"\", \"\"Link\"\")\"
1003,Bulk edit workers,Open,7,lee,\"=HYPERLINK(\"\"https://community.workday.com/brainstorms/1003\"\", \"\"Link\"\")\"
1004,Mobile approvals,Open,3,,\"=HYPERLINK(\"\"https://community.workday.com/brainstorms/1004\"\", \"\"Link\"\")\"
";
    assert_eq!(content, expected);
}

#[test]
fn prints_category_counts() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_brainstorms(dir.path(), &["--dry-run"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "Added rows: 1\nRemoved rows: 1\nUpdated rows: 1\nUnchanged rows: 1\n"
    );
}

#[test]
fn progress_goes_to_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_brainstorms(dir.path(), &["--dry-run"]);

    let err = stderr(&output);
    assert!(err.contains("brainstorms_old.csv"), "stderr: {err}");
    assert!(err.contains("Rows in baseline file: 3"), "stderr: {err}");
    assert!(err.contains("Rows in incoming file: 3"), "stderr: {err}");
}

#[test]
fn quiet_suppresses_progress() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_brainstorms(dir.path(), &["--dry-run", "--quiet"]);

    assert!(output.status.success());
    assert!(!stderr(&output).contains("Rows in baseline file"));
    assert!(stdout(&output).contains("Added rows: 1"));
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_brainstorms(dir.path(), &["--dry-run"]);

    assert!(output.status.success());
    assert!(csv_files(dir.path()).is_empty());
}

#[test]
fn json_report() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("merged.csv");
    let output = run_brainstorms(dir.path(), &["--json", "--output", out.to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(report["summary"]["added"], 1);
    assert_eq!(report["summary"]["removed"], 1);
    assert_eq!(report["summary"]["updated"], 1);
    assert_eq!(report["summary"]["unchanged"], 1);
    assert_eq!(report["summary"]["dropped_baseline"], 1);
    assert_eq!(report["classification"]["removed"][0], "1001");
    assert_eq!(report["classification"]["added"][0], "1004");
    assert_eq!(report["meta"]["key_column"], "Brainstorm_ID");
    assert_eq!(report["output"], out.display().to_string());
    assert_eq!(report["dry_run"], false);
    assert_eq!(
        report["columns_of_interest"],
        serde_json::json!(["Brainstorm_ID", "Title", "Status", "Votes", "Owner"])
    );
}

#[test]
fn config_file_and_semicolon_input() {
    let dir = tempfile::tempdir().unwrap();
    let output = snapmerge(dir.path())
        .arg(fixture("ideas_old.csv"))
        .arg(fixture("ideas_new.csv"))
        .arg("--config")
        .arg(fixture("ideas.toml"))
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let files = csv_files(dir.path());
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("ideas_"), "files: {files:?}");

    let content = std::fs::read_to_string(dir.path().join(&files[0])).unwrap();
    assert_eq!(
        content,
        "ID,Title,Link\n2,Else entirely,https://ideas.example.com/2\n3,New one,https://ideas.example.com/3\n"
    );
}

#[test]
fn config_from_environment_and_flag_override() {
    let dir = tempfile::tempdir().unwrap();
    let output = snapmerge(dir.path())
        .env("SNAPMERGE_CONFIG", fixture("ideas.toml"))
        .arg(fixture("ideas_old.csv"))
        .arg(fixture("ideas_new.csv"))
        .args(["--output-prefix", "sync", "--dry-run", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["meta"]["key_column"], "ID");
    assert_eq!(report["dry_run"], true);
    assert!(report["output"].is_null());
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn missing_input_aborts_before_merge() {
    let dir = tempfile::tempdir().unwrap();
    let output = snapmerge(dir.path())
        .arg(fixture("brainstorms_old.csv"))
        .arg(dir.path().join("nope.csv"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("nope.csv"));
    assert!(stdout(&output).is_empty());
    assert!(csv_files(dir.path()).is_empty());
}

#[test]
fn missing_key_column() {
    let dir = tempfile::tempdir().unwrap();
    let output = snapmerge(dir.path())
        .arg(fixture("brainstorms_old.csv"))
        .arg(fixture("no_key.csv"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(4));
    let err = stderr(&output);
    assert!(err.contains("missing key column 'Brainstorm_ID'"), "stderr: {err}");
    assert!(err.contains("hint:"), "stderr: {err}");
}

#[test]
fn failure_lines_survive_quiet_and_log_filter() {
    let dir = tempfile::tempdir().unwrap();
    let output = snapmerge(dir.path())
        .env("RUST_LOG", "off")
        .arg(fixture("brainstorms_old.csv"))
        .arg(fixture("no_key.csv"))
        .arg("--quiet")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(4));
    let err = stderr(&output);
    let lines: Vec<&str> = err.lines().collect();
    assert_eq!(lines.len(), 2, "stderr: {err}");
    assert!(lines[0].starts_with("error: "), "stderr: {err}");
    assert!(lines[0].contains("missing key column 'Brainstorm_ID'"));
    assert!(lines[1].starts_with("hint:  "), "stderr: {err}");
}

#[test]
fn baseline_without_keyed_rows() {
    let dir = tempfile::tempdir().unwrap();
    let output = snapmerge(dir.path())
        .arg(fixture("footer_only.csv"))
        .arg(fixture("brainstorms_new.csv"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("cannot derive columns of interest"));
    assert!(csv_files(dir.path()).is_empty());
}

#[test]
fn invalid_link_template_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_brainstorms(dir.path(), &["--link-template", "https://no-placeholder.test/"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("{key}"));
}

#[test]
fn unwritable_output_still_prints_summary() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("no_such_dir").join("merged.csv");
    let output = run_brainstorms(dir.path(), &["--output", out.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(5));
    assert!(stdout(&output).contains("Updated rows: 1"));
    assert!(stderr(&output).contains("cannot write output"));
    assert!(!out.exists());
}

#[test]
fn both_inputs_required() {
    let dir = tempfile::tempdir().unwrap();
    let output = snapmerge(dir.path())
        .arg(fixture("brainstorms_old.csv"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
}
