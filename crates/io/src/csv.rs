// CSV snapshot import/export

use std::io::Read;
use std::path::Path;

use snapmerge_recon::model::{Row, Snapshot};

use crate::EXTRA_FIELD_PREFIX;

pub fn import(path: &Path) -> Result<Snapshot, String> {
    let content = read_file_as_utf8(path)?;
    parse_snapshot(&path.display().to_string(), &content)
}

/// Parse CSV text with a header row into a snapshot.
///
/// Rows may be ragged: missing trailing cells are left out of the row, cells
/// past the header width are named `field{N}` by 1-based position.
pub fn parse_snapshot(label: &str, content: &str) -> Result<Snapshot, String> {
    let delimiter = sniff_delimiter(content);
    parse_with_delimiter(label, content, delimiter)
}

pub fn parse_with_delimiter(label: &str, content: &str, delimiter: u8) -> Result<Snapshot, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| format!("{label}: {e}"))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| format!("{label}: {e}"))?;
        let row: Row = record
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let column = match columns.get(i) {
                    Some(name) => name.clone(),
                    None => format!("{EXTRA_FIELD_PREFIX}{}", i + 1),
                };
                (column, value)
            })
            .collect();
        rows.push(row);
    }

    Ok(Snapshot {
        label: label.to_string(),
        columns,
        rows,
    })
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Must produce >1 field on the header line to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Score: (lines with the header's field count) * field_count
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| format!("{}: {e}", path.display()))?;
    Ok(decode(bytes))
}

/// Decode raw file bytes, dropping a UTF-8 byte order mark.
pub fn decode(bytes: Vec<u8>) -> String {
    // Try UTF-8 first; on failure, recover the buffer from the error
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (common for Excel-exported CSVs)
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };

    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Header for a set of rows: every column that appears, in first-seen order.
pub fn union_columns<'a>(rows: impl IntoIterator<Item = &'a Row>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for column in row.columns() {
            if !columns.iter().any(|c| c == column) {
                columns.push(column.to_string());
            }
        }
    }
    columns
}

/// Serialize rows under a union header. Columns a row lacks are written empty.
pub fn to_csv_string<'a, I>(rows: I) -> Result<String, String>
where
    I: IntoIterator<Item = &'a Row>,
    I::IntoIter: Clone,
{
    let rows = rows.into_iter();
    let columns = union_columns(rows.clone());
    if columns.is_empty() {
        return Ok(String::new());
    }

    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(&columns).map_err(|e| e.to_string())?;

    for row in rows {
        let record = columns.iter().map(|c| row.get(c).unwrap_or(""));
        writer.write_record(record).map_err(|e| e.to_string())?;
    }

    let bytes = writer.into_inner().map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}

/// Write rows to `path` atomically: the full file goes to a `.tmp` sibling,
/// then replaces `path` by rename. On any failure `path` is left as it was.
pub fn export<'a, I>(rows: I, path: &Path) -> Result<(), String>
where
    I: IntoIterator<Item = &'a Row>,
    I::IntoIter: Clone,
{
    let content = to_csv_string(rows)?;

    let tmp_path = path.with_extension("csv.tmp");
    std::fs::write(&tmp_path, content).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        format!("{}: {e}", tmp_path.display())
    })?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        format!("{}: {e}", path.display())
    })
}
