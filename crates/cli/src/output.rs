//! Dated output naming: `{prefix}_{M}_{D}_{YYYY}.csv`.

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};

/// `results` + 2024-01-15 → `results_1_15_2024.csv` (month and day unpadded).
pub fn output_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}_{}_{}_{}.csv", date.month(), date.day(), date.year())
}

pub fn dated_output_path(directory: &Path, prefix: &str, date: NaiveDate) -> PathBuf {
    directory.join(output_file_name(prefix, date))
}

/// Today's date in the local time zone.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
