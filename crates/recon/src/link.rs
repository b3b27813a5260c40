use crate::config::KEY_PLACEHOLDER;
use crate::model::KeyedRow;

/// URL/formula template with a `{key}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTemplate {
    template: String,
}

impl LinkTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self { template: template.into() }
    }

    pub fn render(&self, key: &str) -> String {
        self.template.replace(KEY_PLACEHOLDER, key)
    }
}

/// Set `column` on every row to the rendered link for that row's key.
/// Any existing value under `column` is overwritten.
pub fn annotate(rows: &mut [KeyedRow], column: &str, template: &LinkTemplate) {
    for keyed in rows.iter_mut() {
        let link = template.render(&keyed.key);
        keyed.row.set(column, link);
    }
}
