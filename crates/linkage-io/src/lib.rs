//! Linkage IO - the `RecordLoader` contract and a CSV implementation.
//!
//! `linkage-core` never depends on this crate; a loader is only needed to
//! drive the orchestrator from the CLI. Library callers may instead pass an
//! in-memory `Vec<Record>` directly to `linkage-core`.

pub mod csv_loader;
pub mod error;
pub mod loader;

pub use csv_loader::CsvRecordLoader;
pub use error::LoaderError;
pub use loader::RecordLoader;
