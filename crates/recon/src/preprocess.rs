use crate::model::{KeyedRow, Row};

/// Rows that passed the key check, plus how many didn't.
#[derive(Debug, Clone, Default)]
pub struct Preprocessed {
    pub rows: Vec<KeyedRow>,
    pub dropped: usize,
}

/// Keep only rows with a usable key.
///
/// A key is usable when it still has characters after all spaces (U+0020)
/// are removed; tabs and other whitespace count as content. Rows without the
/// key column at all (short CSV lines, spreadsheet footer rows) are dropped
/// the same way. Neither case is an error.
pub fn retain_keyed(rows: Vec<Row>, key_column: &str) -> Preprocessed {
    let mut out = Preprocessed::default();

    for row in rows {
        let key = match row.get(key_column) {
            Some(value) if has_key(value) => value.to_string(),
            _ => {
                out.dropped += 1;
                continue;
            }
        };
        out.rows.push(KeyedRow { key, row });
    }

    out
}

fn has_key(value: &str) -> bool {
    value.chars().any(|c| c != ' ')
}
