//! Orchestrator: sequences load -> block -> score -> (EM) -> threshold ->
//! cluster.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::blocking::generate_candidate_pairs;
use crate::em::{estimate_parameters, EmOptions, EmResult};
use crate::error::LinkageError;
use crate::record::{BlockingRule, CandidatePair, Record, ScoredPair, SimilarityFunction};
use crate::scorer::{score_candidate_pairs, DegeneracyCounter};
use crate::unionfind::DisjointSetForest;

/// The orchestrator's single input. Constructed directly by library callers,
/// or derived by `linkage-recipe` from a serializable `LinkOptions`.
pub struct LinkageOptions {
    pub blocking_rules: Vec<BlockingRule>,
    pub similarity_functions: Vec<SimilarityFunction>,
    pub m_probs: Vec<f64>,
    pub u_probs: Vec<f64>,
    pub batch_size: usize,
    /// Pairs with score strictly greater than this are merged. Any finite
    /// real is accepted — LLRs are not bounded to `[0, 1]` so the validator
    /// must not require that range.
    pub match_threshold: f64,
    pub em_max_iter: usize,
    pub em_tolerance: f64,
    pub field_weights: Vec<f64>,
}

impl LinkageOptions {
    pub fn em_options(&self) -> EmOptions {
        EmOptions {
            max_iter: self.em_max_iter,
            tolerance: self.em_tolerance,
            field_weights: self.field_weights.clone(),
        }
    }
}

/// Validate options, failing fast on the first violated invariant
/// (ConfigurationInvalid is raised once, at entry).
pub fn validate_options(options: &LinkageOptions) -> Result<(), LinkageError> {
    if options.similarity_functions.is_empty() {
        return Err(LinkageError::ConfigurationInvalid {
            reason: "similarity_functions must not be empty".to_string(),
        });
    }
    let n = options.similarity_functions.len();
    if options.m_probs.len() != n || options.u_probs.len() != n {
        return Err(LinkageError::ConfigurationInvalid {
            reason: format!(
                "m_probs/u_probs must have length {n} (one per similarity function)"
            ),
        });
    }
    if options.batch_size == 0 {
        return Err(LinkageError::ConfigurationInvalid {
            reason: "batch_size must be positive".to_string(),
        });
    }
    if !options.match_threshold.is_finite() {
        return Err(LinkageError::ConfigurationInvalid {
            reason: "match_threshold must be a finite real number".to_string(),
        });
    }
    Ok(())
}

/// Blocking only: generate the candidate pair stream.
pub fn generate_pairs(
    records: &[Arc<Record>],
    options: &LinkageOptions,
) -> Result<Vec<CandidatePair>, LinkageError> {
    validate_options(options)?;
    let pairs = generate_candidate_pairs(records, &options.blocking_rules, options.batch_size);
    info!(pair_count = pairs.len(), "generated candidate pairs");
    Ok(pairs)
}

/// Blocking + scoring.
pub fn score_pairs(
    records: &[Arc<Record>],
    options: &LinkageOptions,
) -> Result<Vec<ScoredPair>, LinkageError> {
    let pairs = generate_pairs(records, options)?;
    let counter = DegeneracyCounter::default();
    let scored = score_candidate_pairs(
        &pairs,
        &options.similarity_functions,
        &options.m_probs,
        &options.u_probs,
        &counter,
    );
    if counter.count() > 0 {
        warn!(
            skipped_terms = counter.count(),
            "skipped degenerate LLR terms this run"
        );
    }
    Ok(scored)
}

/// Scoring + EM: recompute m/u from the current blocking output.
pub fn estimate(
    records: &[Arc<Record>],
    options: &LinkageOptions,
) -> Result<EmResult, LinkageError> {
    let pairs = generate_pairs(records, options)?;
    let result = estimate_parameters(&pairs, &options.similarity_functions, &options.em_options());
    info!(
        iterations = result.iterations_run,
        converged = result.converged,
        "EM estimation finished"
    );
    Ok(result)
}

/// Full pipeline: load -> block -> score -> EM -> rescore -> threshold ->
/// cluster. Returns root id -> member ids.
pub fn link_records(
    records: &[Arc<Record>],
    options: &LinkageOptions,
) -> Result<HashMap<String, Vec<String>>, LinkageError> {
    validate_options(options)?;

    let pairs = generate_candidate_pairs(records, &options.blocking_rules, options.batch_size);
    info!(pair_count = pairs.len(), "generated candidate pairs");

    let counter = DegeneracyCounter::default();
    let mut scored = score_candidate_pairs(
        &pairs,
        &options.similarity_functions,
        &options.m_probs,
        &options.u_probs,
        &counter,
    );

    if options.em_max_iter > 0 {
        let em_result = estimate_parameters(&pairs, &options.similarity_functions, &options.em_options());
        info!(
            iterations = em_result.iterations_run,
            converged = em_result.converged,
            "EM estimation finished"
        );
        scored = score_candidate_pairs(
            &pairs,
            &options.similarity_functions,
            &em_result.m,
            &em_result.u,
            &counter,
        );
    }

    if counter.count() > 0 {
        warn!(skipped_terms = counter.count(), "skipped degenerate LLR terms");
    }

    let mut forest = DisjointSetForest::new();
    let mut merges = 0usize;
    for pair in &scored {
        if pair.score > options.match_threshold {
            forest.merge(&pair.a.id, &pair.b.id);
            merges += 1;
        }
    }
    info!(merges, threshold = options.match_threshold, "merged matched pairs");

    Ok(forest.snapshot())
}

/// Convenience view: cluster snapshot resolved back to full `Record`s.
pub fn link_records_with_details(
    records: &[Arc<Record>],
    options: &LinkageOptions,
) -> Result<Vec<Vec<Arc<Record>>>, LinkageError> {
    let clusters = link_records(records, options)?;
    let by_id: HashMap<&str, Arc<Record>> =
        records.iter().map(|r| (r.id.as_str(), Arc::clone(r))).collect();

    Ok(clusters
        .values()
        .map(|ids| {
            ids.iter()
                .filter_map(|id| by_id.get(id.as_str()).cloned())
                .collect()
        })
        .collect())
}
