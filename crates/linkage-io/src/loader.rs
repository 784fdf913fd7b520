//! The `RecordLoader` contract: an external collaborator the core never
//! depends on directly.

use linkage_core::Record;

use crate::error::LoaderError;

pub trait RecordLoader {
    /// Returns a finite list of records.
    fn load_all(&self) -> Result<Vec<Record>, LoaderError>;

    /// Yields records in a batch; the core does not assume order beyond
    /// that each record appears once across the full set of batches.
    fn load_batches(&self, size: usize, offset: usize) -> Result<Vec<Record>, LoaderError>;
}
