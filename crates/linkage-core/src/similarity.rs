//! Weighted string similarity kernels.
//!
//! All three kernels share the tokenization contract in [`crate::record::tokenize`]:
//! lowercase, split on single space, non-empty substrings are tokens. An IDF
//! lookup miss returns `1.0` for the edit-distance and Jaro kernels; the
//! cosine kernel treats a miss as `0.0` by design.

use crate::record::{tokenize, IdfMap};

/// Token-weighted edit distance similarity.
pub fn token_edit_similarity(a: &str, b: &str, idf: &IdfMap) -> f64 {
    let a_tokens = tokenize(a);
    let b_tokens = tokenize(b);

    match (a_tokens.is_empty(), b_tokens.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        (false, false) => {}
    }

    let m = a_tokens.len();
    let n = b_tokens.len();
    let a_w: Vec<f64> = a_tokens.iter().map(|t| idf.lookup(t)).collect();
    let b_w: Vec<f64> = b_tokens.iter().map(|t| idf.lookup(t)).collect();

    let mut dp = vec![vec![0.0f64; n + 1]; m + 1];
    for i in 1..=m {
        dp[i][0] = dp[i - 1][0] + a_w[i - 1];
    }
    for j in 1..=n {
        dp[0][j] = dp[0][j - 1] + b_w[j - 1];
    }
    for i in 1..=m {
        for j in 1..=n {
            let sub_cost = if a_tokens[i - 1] == b_tokens[j - 1] {
                0.0
            } else {
                a_w[i - 1].max(b_w[j - 1])
            };
            dp[i][j] = (dp[i - 1][j] + a_w[i - 1])
                .min(dp[i][j - 1] + b_w[j - 1])
                .min(dp[i - 1][j - 1] + sub_cost);
        }
    }

    let denom: f64 = a_w.iter().sum::<f64>() + b_w.iter().sum::<f64>();
    if denom == 0.0 {
        return 1.0;
    }
    1.0 - dp[m][n] / denom
}

/// Token-weighted Jaro similarity.
pub fn token_jaro_similarity(a: &str, b: &str, idf: &IdfMap) -> f64 {
    let a_tokens = tokenize(a);
    let b_tokens = tokenize(b);

    match (a_tokens.is_empty(), b_tokens.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        (false, false) => {}
    }

    let len1 = a_tokens.len();
    let len2 = b_tokens.len();
    let window = (len1.max(len2) / 2).saturating_sub(1);

    let mut a_matched = vec![false; len1];
    let mut b_matched = vec![false; len2];
    let mut matched_weight = 0.0f64;

    for i in 0..len1 {
        let lo = i.saturating_sub(window);
        let hi = (i + window + 1).min(len2);
        for j in lo..hi {
            if !b_matched[j] && a_tokens[i] == b_tokens[j] {
                a_matched[i] = true;
                b_matched[j] = true;
                matched_weight += idf.lookup(&a_tokens[i]);
                break;
            }
        }
    }

    if matched_weight == 0.0 {
        return 0.0;
    }

    // Transposition count: walk matched tokens on both sides in order.
    // The walker halts once it reaches len2, so unmatched tail tokens on
    // the left never get compared.
    let mut transpositions = 0.0f64;
    let mut k = 0usize;
    for i in 0..len1 {
        if !a_matched[i] {
            continue;
        }
        while k < len2 && !b_matched[k] {
            k += 1;
        }
        if k >= len2 {
            break;
        }
        if a_tokens[i] != b_tokens[k] {
            transpositions += idf.lookup(&a_tokens[i]);
        }
        k += 1;
    }

    let total_a: f64 = a_tokens.iter().map(|t| idf.lookup(t)).sum();
    let total_b: f64 = b_tokens.iter().map(|t| idf.lookup(t)).sum();

    ((matched_weight / total_a)
        + (matched_weight / total_b)
        + ((matched_weight - transpositions / 2.0) / matched_weight))
        / 3.0
}

/// TF-IDF cosine similarity. A missing IDF entry contributes `0.0` here,
/// unlike the other two kernels.
pub fn tfidf_cosine_similarity(a: &str, b: &str, idf: &IdfMap) -> f64 {
    let a_tokens = tokenize(a);
    let b_tokens = tokenize(b);

    if a_tokens == b_tokens {
        // Same token sequence: maximally similar regardless of IDF weights,
        // including the degenerate case where every weight is zero and the
        // cosine formula alone would be an undefined 0/0.
        return 1.0;
    }

    let a_vec = tf_idf_vector(&a_tokens, idf);
    let b_vec = tf_idf_vector(&b_tokens, idf);

    let mut dot = 0.0f64;
    for (token, a_weight) in &a_vec {
        if let Some(b_weight) = b_vec.get(token) {
            dot += a_weight * b_weight;
        }
    }

    let norm_a = a_vec.values().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b_vec.values().map(|v| v * v).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn tf_idf_vector(tokens: &[String], idf: &IdfMap) -> std::collections::HashMap<String, f64> {
    let mut counts: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    for t in tokens {
        *counts.entry(t.clone()).or_insert(0) += 1;
    }
    let total = tokens.len() as f64;
    counts
        .into_iter()
        .map(|(token, count)| {
            let tf = count as f64 / total;
            let weight = tf * idf.lookup_or_zero(&token);
            (token, weight)
        })
        .collect()
}
