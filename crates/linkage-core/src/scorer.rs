//! Fellegi-Sunter log-likelihood-ratio scorer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use crate::record::{CandidatePair, Record, ScoredPair, SimilarityFunction};

/// Counts skipped LLR terms across a scoring run (numerical degeneracy,
/// degeneracy). Surfaced via `tracing::warn!` once per batch rather than
/// per term, to avoid log flooding.
#[derive(Debug, Default)]
pub struct DegeneracyCounter(AtomicU64);

impl DegeneracyCounter {
    pub fn count(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

/// Score every similarity function against a pair and combine into an LLR.
/// A term whose numerator or denominator is non-positive is skipped
/// (never `log(0)`/`log(inf)`); `counter` tracks how many were skipped.
pub fn score_pair(
    pair: &CandidatePair,
    functions: &[SimilarityFunction],
    m: &[f64],
    u: &[f64],
    counter: &DegeneracyCounter,
) -> f64 {
    let mut llr = 0.0;
    for (i, f) in functions.iter().enumerate() {
        let s = f.compute(&pair.a, &pair.b);
        let numerator = m[i] * s + (1.0 - m[i]) * (1.0 - s);
        let denominator = u[i] * s + (1.0 - u[i]) * (1.0 - s);
        if numerator <= 0.0 || denominator <= 0.0 {
            counter.bump();
            continue;
        }
        llr += (numerator / denominator).ln();
    }
    llr
}

/// Score every candidate pair in parallel. Per-worker partials are
/// combined at the join; output ordering is unspecified.
pub fn score_candidate_pairs(
    pairs: &[CandidatePair],
    functions: &[SimilarityFunction],
    m: &[f64],
    u: &[f64],
    counter: &DegeneracyCounter,
) -> Vec<ScoredPair> {
    let worker_count = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(pairs.len().max(1));

    if worker_count <= 1 {
        return pairs
            .iter()
            .map(|p| to_scored(p, functions, m, u, counter))
            .collect();
    }

    thread::scope(|scope| {
        let chunk_size = pairs.len().div_ceil(worker_count);
        let handles: Vec<_> = pairs
            .chunks(chunk_size.max(1))
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|p| to_scored(p, functions, m, u, counter))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
    })
}

fn to_scored(
    pair: &CandidatePair,
    functions: &[SimilarityFunction],
    m: &[f64],
    u: &[f64],
    counter: &DegeneracyCounter,
) -> ScoredPair {
    ScoredPair {
        a: Arc::clone(&pair.a),
        b: Arc::clone(&pair.b),
        score: score_pair(pair, functions, m, u, counter),
    }
}

/// Build a `Record -> Record -> similarity` function for a named field
/// using the token edit-distance kernel; convenience used when deriving
/// default similarity functions from a plain field-name list.
pub fn field_edit_similarity(field_name: impl Into<String>, idf: crate::record::IdfMap) -> SimilarityFunction {
    let field = field_name.into();
    let name = field.clone();
    SimilarityFunction::new(name, move |a: &Record, b: &Record| {
        crate::similarity::token_edit_similarity(a.field(&field), b.field(&field), &idf)
    })
}

/// Same as [`field_edit_similarity`] but backed by the token Jaro kernel.
pub fn field_jaro_similarity(field_name: impl Into<String>, idf: crate::record::IdfMap) -> SimilarityFunction {
    let field = field_name.into();
    let name = field.clone();
    SimilarityFunction::new(name, move |a: &Record, b: &Record| {
        crate::similarity::token_jaro_similarity(a.field(&field), b.field(&field), &idf)
    })
}

/// Same as [`field_edit_similarity`] but backed by the TF-IDF cosine kernel.
pub fn field_cosine_similarity(field_name: impl Into<String>, idf: crate::record::IdfMap) -> SimilarityFunction {
    let field = field_name.into();
    let name = field.clone();
    SimilarityFunction::new(name, move |a: &Record, b: &Record| {
        crate::similarity::tfidf_cosine_similarity(a.field(&field), b.field(&field), &idf)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{IdfMap, Record};
    use std::collections::HashMap;

    fn record(id: &str, name: &str) -> Arc<Record> {
        let mut fields = HashMap::new();
        fields.insert("name".to_string(), name.to_string());
        Arc::new(Record::new(id, fields))
    }

    #[test]
    fn llr_sign_scenario() {
        let a = record("1", "Alice Smith");
        let b = record("2", "Alice Smith");
        let pair = CandidatePair::new(a, b);
        let functions = vec![field_edit_similarity("name", IdfMap::empty())];
        let counter = DegeneracyCounter::default();

        let llr_match = score_pair(&pair, &functions, &[0.9], &[0.1], &counter);
        assert!((llr_match - (0.9_f64 / 0.1).ln()).abs() < 1e-9);
        assert!(llr_match > 0.0);
    }

    #[test]
    fn llr_negative_for_disagreement() {
        let a = record("1", "Alice");
        let b = record("2", "Zzz Yyy Www");
        let pair = CandidatePair::new(a, b);
        let functions = vec![field_edit_similarity("name", IdfMap::empty())];
        let counter = DegeneracyCounter::default();

        let llr = score_pair(&pair, &functions, &[0.9], &[0.1], &counter);
        assert!(llr < 0.0);
    }

    #[test]
    fn rescoring_is_bit_identical() {
        let a = record("1", "Alice Smith");
        let b = record("2", "Alice Smyth");
        let pair = CandidatePair::new(a, b);
        let functions = vec![field_edit_similarity("name", IdfMap::empty())];
        let counter = DegeneracyCounter::default();

        let first = score_pair(&pair, &functions, &[0.9], &[0.1], &counter);
        let second = score_pair(&pair, &functions, &[0.9], &[0.1], &counter);
        assert_eq!(first, second);
    }

    #[test]
    fn degenerate_term_is_skipped_not_propagated_as_nan() {
        // m=1, s=0 makes numerator exactly 0 -> must be skipped, not logged as -inf.
        let a = record("1", "Alice");
        let b = record("2", "Zzzzz");
        let pair = CandidatePair::new(a, b);
        let functions = vec![field_edit_similarity("name", IdfMap::empty())];
        let counter = DegeneracyCounter::default();

        let llr = score_pair(&pair, &functions, &[1.0], &[0.1], &counter);
        assert!(llr.is_finite());
    }
}
