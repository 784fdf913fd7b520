//! Linkage Core - blocking, weighted string similarity, Fellegi-Sunter
//! scoring, EM estimation, and union-find clustering for record linkage.
//!
//! This crate provides the core record-linkage engine. Database loading,
//! logging/config wiring, and result persistence live in sibling crates;
//! this crate is pure, CPU-bound, in-memory computation.

pub mod blocking;
pub mod em;
pub mod error;
pub mod orchestrator;
pub mod record;
pub mod scorer;
pub mod similarity;
pub mod unionfind;

pub use error::LinkageError;
pub use orchestrator::{
    estimate, generate_pairs, link_records, link_records_with_details, score_pairs,
    validate_options, LinkageOptions,
};
pub use record::{BlockingRule, CandidatePair, IdfMap, Record, ScoredPair, SimilarityFunction};
pub use unionfind::DisjointSetForest;
