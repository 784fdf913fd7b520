//! `LinkOptions` schema: the serializable configuration accepted by the CLI
//! and translated into `linkage_core::LinkageOptions`.

use serde::{Deserialize, Serialize};

/// The full configuration for a linkage run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkOptions {
    /// Schema version.
    pub version: String,

    /// Unique identifier for this run.
    pub recipe_id: String,

    /// Field names; each becomes a blocking rule whose key is the literal
    /// field value (empty string if absent).
    pub blocking_fields: Vec<String>,

    /// Ordered list of similarity functions; length defines `n`.
    pub similarity_functions: Vec<SimilarityFunctionSpec>,

    /// Length-`n` initial/current match probabilities.
    pub m_probs: Vec<f64>,

    /// Length-`n` initial/current non-match probabilities.
    pub u_probs: Vec<f64>,

    /// Positive integer; blocking batch size.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Pairs with score strictly greater than this are merged.
    pub match_threshold: f64,

    #[serde(default = "default_em_max_iter")]
    pub em_max_iter: usize,

    #[serde(default = "default_em_tolerance")]
    pub em_tolerance: f64,

    /// Length-`n` per-field EM weights. Defaults to all-ones if omitted.
    #[serde(default)]
    pub field_weights: Option<Vec<f64>>,

    /// Corpus used to build a shared IDF map via `IdfMap::from_corpus`.
    /// An empty/absent corpus falls back to the default weight of `1.0`
    /// for every token (`IdfMap::empty`).
    #[serde(default)]
    pub idf_corpus: Option<Vec<String>>,
}

fn default_batch_size() -> usize {
    1000
}

fn default_em_max_iter() -> usize {
    20
}

fn default_em_tolerance() -> f64 {
    1e-4
}

/// A single similarity function entry: which field, which kernel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityFunctionSpec {
    pub field: String,
    pub kernel: SimilarityKernel,
}

/// The three similarity kernels the core provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityKernel {
    TokenEdit,
    TokenJaro,
    TfidfCosine,
}
