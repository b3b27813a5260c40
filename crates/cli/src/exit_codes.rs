//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! | Code | Description                                              |
//! |------|----------------------------------------------------------|
//! | 0    | Success                                                  |
//! | 1    | General error (unspecified)                              |
//! | 2    | Usage error (bad arguments, unreadable or invalid config)|
//! | 3    | Input error (either snapshot unreadable or malformed)    |
//! | 4    | Precondition failed (missing key column, empty baseline) |
//! | 5    | Output write failed                                      |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments or config.
pub const EXIT_USAGE: u8 = 2;

/// A snapshot could not be read or parsed. Nothing is merged or written.
pub const EXIT_INPUT: u8 = 3;

/// Merge cannot start: key column absent from a header, or no keyed baseline rows.
pub const EXIT_PRECONDITION: u8 = 4;

/// The merge ran but the output file could not be written.
/// The summary is still printed.
pub const EXIT_WRITE: u8 = 5;
