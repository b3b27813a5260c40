//! `snapmerge-recon` — Keyed snapshot reconciliation engine.
//!
//! Pure engine crate: receives two parsed snapshots, returns the merged rows and
//! their classification. No CLI or IO dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod link;
pub mod model;
pub mod preprocess;
pub mod reconcile;
pub mod schema;
pub mod summary;

pub use config::MergeConfig;
pub use engine::run;
pub use error::MergeError;
pub use model::{Classification, InterestColumns, KeyedRow, MergeResult, Row, Snapshot};
pub use summary::MergeSummary;
