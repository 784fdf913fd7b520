//! Expectation-Maximization estimator for per-field m/u probabilities.

use std::thread;

use crate::record::{CandidatePair, SimilarityFunction};

const EPSILON: f64 = 1e-10;

/// EM run configuration.
#[derive(Debug, Clone)]
pub struct EmOptions {
    pub max_iter: usize,
    pub tolerance: f64,
    /// Per-field multiplier applied to the accumulated numerators. Defaults
    /// to `1.0` for every field.
    pub field_weights: Vec<f64>,
}

impl EmOptions {
    pub fn new(n_fields: usize) -> Self {
        Self {
            max_iter: 20,
            tolerance: 1e-4,
            field_weights: vec![1.0; n_fields],
        }
    }
}

/// Result of an EM run.
#[derive(Debug, Clone)]
pub struct EmResult {
    pub m: Vec<f64>,
    pub u: Vec<f64>,
    pub iterations_run: usize,
    pub converged: bool,
}

/// Run EM to convergence or `options.max_iter`, whichever comes first.
/// `max_iter = 0` returns the initial `m`, `u` unchanged.
pub fn estimate_parameters(
    pairs: &[CandidatePair],
    functions: &[SimilarityFunction],
    options: &EmOptions,
) -> EmResult {
    let n = functions.len();
    let mut m = vec![0.9; n];
    let mut u = vec![0.1; n];

    if options.max_iter == 0 {
        return EmResult {
            m,
            u,
            iterations_run: 0,
            converged: false,
        };
    }

    // Similarities are stateless per pair; compute once, reuse every
    // iteration (recomputing would be wasted work since functions are pure).
    let similarities: Vec<Vec<f64>> = compute_all_similarities(pairs, functions);

    let mut converged = false;
    let mut iterations_run = 0;

    for _ in 0..options.max_iter {
        iterations_run += 1;
        let (m_num, u_num, m_den, u_den) = accumulate(&similarities, &m, &u, &options.field_weights);

        let mut m_next = vec![0.0; n];
        let mut u_next = vec![0.0; n];
        for i in 0..n {
            m_next[i] = m_num[i] / (m_den + EPSILON);
            u_next[i] = u_num[i] / (u_den + EPSILON);
        }

        let all_within_tolerance = (0..n).all(|i| {
            (m_next[i] - m[i]).abs() <= options.tolerance && (u_next[i] - u[i]).abs() <= options.tolerance
        });

        m = m_next;
        u = u_next;

        if all_within_tolerance {
            converged = true;
            break;
        }
    }

    EmResult {
        m,
        u,
        iterations_run,
        converged,
    }
}

fn compute_all_similarities(
    pairs: &[CandidatePair],
    functions: &[SimilarityFunction],
) -> Vec<Vec<f64>> {
    let worker_count = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(pairs.len().max(1));

    let compute_chunk = |chunk: &[CandidatePair]| -> Vec<Vec<f64>> {
        chunk
            .iter()
            .map(|p| functions.iter().map(|f| f.compute(&p.a, &p.b)).collect())
            .collect()
    };

    if worker_count <= 1 {
        return compute_chunk(pairs);
    }

    thread::scope(|scope| {
        let chunk_size = pairs.len().div_ceil(worker_count);
        let handles: Vec<_> = pairs
            .chunks(chunk_size.max(1))
            .map(|chunk| scope.spawn(move || compute_chunk(chunk)))
            .collect();
        handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
    })
}

/// Accumulate (m_num, u_num, m_den, u_den) across all pairs, combining
/// per-worker partials at the end — per-field numerators plus two scalar
/// denominators shared across fields.
fn accumulate(
    similarities: &[Vec<f64>],
    m: &[f64],
    u: &[f64],
    field_weights: &[f64],
) -> (Vec<f64>, Vec<f64>, f64, f64) {
    let n = m.len();
    let worker_count = thread::available_parallelism()
        .map(|c| c.get())
        .unwrap_or(1)
        .min(similarities.len().max(1));

    let partial = |chunk: &[Vec<f64>]| -> (Vec<f64>, Vec<f64>, f64, f64) {
        let mut m_num = vec![0.0; n];
        let mut u_num = vec![0.0; n];
        let mut m_den = 0.0;
        let mut u_den = 0.0;

        for s in chunk {
            let p_match: f64 = (0..n).map(|i| m[i] * s[i] + (1.0 - m[i]) * (1.0 - s[i])).product();
            let p_unmatch: f64 = (0..n).map(|i| u[i] * s[i] + (1.0 - u[i]) * (1.0 - s[i])).product();
            let denom = p_match + p_unmatch;
            let w = if denom > 0.0 { p_match / denom } else { 0.5 };

            for i in 0..n {
                m_num[i] += w * s[i] * field_weights[i];
                u_num[i] += (1.0 - w) * s[i] * field_weights[i];
            }
            m_den += w;
            u_den += 1.0 - w;
        }

        (m_num, u_num, m_den, u_den)
    };

    if worker_count <= 1 {
        return partial(similarities);
    }

    thread::scope(|scope| {
        let chunk_size = similarities.len().div_ceil(worker_count);
        let handles: Vec<_> = similarities
            .chunks(chunk_size.max(1))
            .map(|chunk| scope.spawn(move || partial(chunk)))
            .collect();

        let mut m_num = vec![0.0; n];
        let mut u_num = vec![0.0; n];
        let mut m_den = 0.0;
        let mut u_den = 0.0;
        for h in handles {
            let (pm_num, pu_num, pm_den, pu_den) = h.join().unwrap();
            for i in 0..n {
                m_num[i] += pm_num[i];
                u_num[i] += pu_num[i];
            }
            m_den += pm_den;
            u_den += pu_den;
        }
        (m_num, u_num, m_den, u_den)
    })
}
