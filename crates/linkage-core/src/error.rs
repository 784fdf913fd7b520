//! Typed errors for the linkage core.

use thiserror::Error;

/// Errors raised by the orchestrator at its two designated points: option
/// validation (fail fast, before any work) and loader failure (reported
/// unchanged from the external collaborator).
#[derive(Debug, Error)]
pub enum LinkageError {
    /// Options failed validation. Carries the first violated invariant.
    #[error("invalid configuration: {reason}")]
    ConfigurationInvalid { reason: String },

    /// The external record loader failed. The core does not interpret the
    /// cause; it surfaces it unchanged.
    #[error("loader failed: {0}")]
    LoaderFailure(String),
}
