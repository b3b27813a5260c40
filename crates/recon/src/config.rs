use serde::Deserialize;

use crate::error::MergeError;

pub const DEFAULT_KEY_COLUMN: &str = "Brainstorm_ID";
pub const DEFAULT_LINK_COLUMN: &str = "Brainstorm_URL";
pub const DEFAULT_LINK_TEMPLATE: &str =
    r#"=HYPERLINK("https://community.workday.com/brainstorms/{key}", "Link")"#;
pub const DEFAULT_OUTPUT_PREFIX: &str = "results";

/// Placeholder substituted with the row key when rendering a link.
pub const KEY_PLACEHOLDER: &str = "{key}";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeConfig {
    #[serde(default = "default_key_column")]
    pub key_column: String,
    #[serde(default)]
    pub link: LinkConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            key_column: default_key_column(),
            link: LinkConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Link + Output
// ---------------------------------------------------------------------------

/// Derived hyperlink column appended to every merged row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkConfig {
    #[serde(default = "default_link_column")]
    pub column: String,
    /// Must contain `{key}`.
    #[serde(default = "default_link_template")]
    pub template: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            column: default_link_column(),
            template: default_link_template(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// File name prefix; the local date is appended (`results_1_15_2024.csv`).
    #[serde(default = "default_output_prefix")]
    pub prefix: String,
    #[serde(default = "default_output_directory")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prefix: default_output_prefix(),
            directory: default_output_directory(),
        }
    }
}

fn default_key_column() -> String {
    DEFAULT_KEY_COLUMN.into()
}

fn default_link_column() -> String {
    DEFAULT_LINK_COLUMN.into()
}

fn default_link_template() -> String {
    DEFAULT_LINK_TEMPLATE.into()
}

fn default_output_prefix() -> String {
    DEFAULT_OUTPUT_PREFIX.into()
}

fn default_output_directory() -> String {
    ".".into()
}

// ---------------------------------------------------------------------------
// Parsing + validation
// ---------------------------------------------------------------------------

impl MergeConfig {
    pub fn from_toml(input: &str) -> Result<Self, MergeError> {
        let config: MergeConfig =
            toml::from_str(input).map_err(|e| MergeError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MergeError> {
        if self.key_column.trim().is_empty() {
            return Err(MergeError::ConfigValidation("key_column must not be empty".into()));
        }

        if self.link.column.trim().is_empty() {
            return Err(MergeError::ConfigValidation("link.column must not be empty".into()));
        }

        // The link column is overwritten on every row, so it can't double as the key
        if self.link.column == self.key_column {
            return Err(MergeError::ConfigValidation(format!(
                "link.column '{}' must differ from key_column",
                self.link.column
            )));
        }

        if !self.link.template.contains(KEY_PLACEHOLDER) {
            return Err(MergeError::ConfigValidation(format!(
                "link.template must contain {KEY_PLACEHOLDER}"
            )));
        }

        let prefix = &self.output.prefix;
        if prefix.trim().is_empty() {
            return Err(MergeError::ConfigValidation("output.prefix must not be empty".into()));
        }
        if prefix.contains('/') || prefix.contains('\\') {
            return Err(MergeError::ConfigValidation(format!(
                "output.prefix '{prefix}' must be a file name, not a path (use output.directory)"
            )));
        }

        Ok(())
    }
}
