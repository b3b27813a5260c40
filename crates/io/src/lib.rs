// File I/O operations

pub mod csv;

/// Header given to cells beyond the header row's width, numbered from 1.
pub const EXTRA_FIELD_PREFIX: &str = "field";
