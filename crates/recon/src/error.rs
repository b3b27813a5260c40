use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty key column, template without placeholder, etc.).
    ConfigValidation(String),
    /// An input's header row does not contain the key column.
    MissingKeyColumn { source: String, column: String },
    /// No baseline row survived preprocessing, so there is no schema sample.
    EmptyBaseline { column: String },
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingKeyColumn { source, column } => {
                write!(f, "{source}: missing key column '{column}'")
            }
            Self::EmptyBaseline { column } => {
                write!(f, "baseline has no rows with a '{column}' value; cannot derive columns of interest")
            }
        }
    }
}

impl std::error::Error for MergeError {}
