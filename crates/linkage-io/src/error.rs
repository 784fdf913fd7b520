//! Typed errors for record loaders.

use thiserror::Error;

/// Errors a `RecordLoader` implementation can raise. The core treats these
/// as opaque and reports them unchanged to its caller as a
/// `LoaderFailure`.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed CSV record: {0}")]
    Csv(#[from] csv::Error),

    #[error("id column '{0}' not found in header")]
    MissingIdColumn(String),
}
