//! The core data model: records, blocking rules, similarity functions, and
//! scored pairs.

use std::collections::HashMap;
use std::sync::Arc;

/// A single input record. Immutable once constructed; shared freely across
/// blocking and scoring threads via `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub fields: HashMap<String, String>,
}

impl Record {
    pub fn new(id: impl Into<String>, fields: HashMap<String, String>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// A missing field is the empty string, never null.
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }
}

/// A pure `Record -> String` blocking key extractor plus a descriptive name.
///
/// `key_fn` is boxed rather than generic because the orchestrator holds a
/// heterogeneous `Vec<BlockingRule>` built at runtime from a field-name list.
pub struct BlockingRule {
    pub name: String,
    key_fn: Box<dyn Fn(&Record) -> String + Send + Sync>,
}

impl BlockingRule {
    pub fn new(name: impl Into<String>, key_fn: impl Fn(&Record) -> String + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            key_fn: Box::new(key_fn),
        }
    }

    /// Build one rule per field name: the key is the literal field value
    /// (empty string if absent). The one-line adapter for a plain
    /// "blocking_fields" config key.
    pub fn from_field_name(field_name: impl Into<String>) -> Self {
        let field_name = field_name.into();
        let captured = field_name.clone();
        Self::new(field_name, move |record| record.field(&captured).to_string())
    }

    pub fn key(&self, record: &Record) -> String {
        (self.key_fn)(record)
    }
}

type ComputeFn = Box<dyn Fn(&Record, &Record) -> f64 + Send + Sync>;

/// A pure `(Record, Record) -> [0, 1]` similarity function bound to a field
/// name, stateless aside from a captured IDF map.
pub struct SimilarityFunction {
    pub field_name: String,
    compute_fn: ComputeFn,
}

impl SimilarityFunction {
    pub fn new(
        field_name: impl Into<String>,
        compute_fn: impl Fn(&Record, &Record) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            compute_fn: Box::new(compute_fn),
        }
    }

    pub fn compute(&self, a: &Record, b: &Record) -> f64 {
        (self.compute_fn)(a, b)
    }
}

/// An unordered candidate pair with `a.id < b.id`, carrying a score once
/// scored.
#[derive(Debug, Clone)]
pub struct ScoredPair {
    pub a: Arc<Record>,
    pub b: Arc<Record>,
    pub score: f64,
}

/// A candidate pair prior to scoring.
#[derive(Debug, Clone)]
pub struct CandidatePair {
    pub a: Arc<Record>,
    pub b: Arc<Record>,
}

impl CandidatePair {
    /// Build a pair, asserting the canonical `a.id < b.id` orientation.
    pub fn new(a: Arc<Record>, b: Arc<Record>) -> Self {
        debug_assert!(a.id < b.id, "candidate pairs must be canonically ordered");
        Self { a, b }
    }
}

/// Token -> IDF weight. A missing token carries the default weight `1.0`.
#[derive(Debug, Clone, Default)]
pub struct IdfMap {
    weights: HashMap<String, f64>,
}

impl IdfMap {
    pub fn new(weights: HashMap<String, f64>) -> Self {
        Self { weights }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn lookup(&self, token: &str) -> f64 {
        self.weights.get(token).copied().unwrap_or(1.0)
    }

    /// Like `lookup`, but a missing token contributes `0.0`. Used only by
    /// the TF-IDF cosine kernel, which treats an absent token as
    /// contributing nothing to the dot product.
    pub fn lookup_or_zero(&self, token: &str) -> f64 {
        self.weights.get(token).copied().unwrap_or(0.0)
    }

    /// Compute `log(N / df(token))` for every token observed across
    /// `corpus`, where `df(token)` is the number of documents containing
    /// the token at least once and `N` is the document count.
    pub fn from_corpus<'a>(corpus: impl IntoIterator<Item = &'a str>) -> Self {
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut n = 0usize;
        for doc in corpus {
            n += 1;
            let mut seen = std::collections::HashSet::new();
            for token in tokenize(doc) {
                if seen.insert(token.to_string()) {
                    *doc_freq.entry(token.to_string()).or_insert(0) += 1;
                }
            }
        }
        let weights = doc_freq
            .into_iter()
            .map(|(token, df)| {
                let idf = if df == 0 {
                    0.0
                } else {
                    ((n as f64) / (df as f64)).ln().max(0.0)
                };
                (token, idf)
            })
            .collect();
        Self { weights }
    }
}

/// Lowercase and split on single space; tokens are the non-empty resulting
/// substrings.
pub fn tokenize(s: &str) -> Vec<String> {
    s.to_lowercase()
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
