//! Cross-module integration tests exercising the full link_records pipeline
//! through its public API, the way a library caller would rather than
//! reaching into module internals.

use std::collections::HashMap;
use std::sync::Arc;

use linkage_core::{
    link_records, BlockingRule, DisjointSetForest, IdfMap, LinkageOptions, Record,
};

fn record(id: &str, fields: &[(&str, &str)]) -> Arc<Record> {
    let fields = fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    Arc::new(Record::new(id, fields))
}

/// Scenario 3: blocking disjunction. A(city=NY, zip=10001), B(city=NY,
/// zip=99999), C(city=LA, zip=10001): pairs emitted are (A,B) via city and
/// (A,C) via zip; (B,C) never emitted since neither rule agrees.
#[test]
fn blocking_disjunction_end_to_end() {
    let a = record("A", &[("city", "NY"), ("zip", "10001")]);
    let b = record("B", &[("city", "NY"), ("zip", "99999")]);
    let c = record("C", &[("city", "LA"), ("zip", "10001")]);

    let rules = vec![BlockingRule::from_field_name("city"), BlockingRule::from_field_name("zip")];
    let pairs = linkage_core::blocking::generate_candidate_pairs(&[a, b, c], &rules, 10);

    assert_eq!(pairs.len(), 2);
    let ids: Vec<(String, String)> = pairs.iter().map(|p| (p.a.id.clone(), p.b.id.clone())).collect();
    assert!(ids.contains(&("A".to_string(), "B".to_string())));
    assert!(ids.contains(&("A".to_string(), "C".to_string())));
}

/// Scenario 5: EM recovers separation, driven through `link_records` rather
/// than calling `estimate_parameters` directly, confirming the orchestrator
/// wires EM output into scoring correctly.
#[test]
fn em_separates_true_matches_from_noise_via_full_pipeline() {
    let mut records = Vec::new();
    for i in 0..10 {
        records.push(record(&format!("a{i}"), &[("name", "Alice Smith"), ("block", "1")]));
        records.push(record(&format!("b{i}"), &[("name", "Alice Smith"), ("block", "1")]));
    }
    for i in 0..10 {
        records.push(record(&format!("c{i}"), &[("name", "Alice"), ("block", "1")]));
        records.push(record(&format!("d{i}"), &[("name", "Zzz Yyy Www"), ("block", "1")]));
    }

    let options = LinkageOptions {
        blocking_rules: vec![BlockingRule::from_field_name("block")],
        similarity_functions: vec![linkage_core::scorer::field_edit_similarity(
            "name",
            IdfMap::empty(),
        )],
        m_probs: vec![0.9],
        u_probs: vec![0.1],
        batch_size: 1000,
        match_threshold: 0.0,
        em_max_iter: 20,
        em_tolerance: 1e-4,
        field_weights: vec![1.0],
    };

    let clusters = link_records(&records, &options).unwrap();
    // Every "Alice Smith"/"Alice Smith" pair should merge; the noisy pairs
    // should not, since their names are never remotely similar.
    for i in 0..10 {
        let a_id = format!("a{i}");
        let b_id = format!("b{i}");
        let merged = clusters.values().any(|members| {
            members.contains(&a_id) && members.contains(&b_id)
        });
        assert!(merged, "expected a{i}/b{i} to merge");
    }
}

/// Scenario 6: transitive closure. merges (1,2), (2,3), (4,5):
/// find(1)=find(3) != find(5); snapshot has two clusters of sizes 3 and 2.
#[test]
fn transitive_closure_snapshot_shape() {
    let mut forest = DisjointSetForest::new();
    forest.merge("1", "2");
    forest.merge("2", "3");
    forest.merge("4", "5");

    assert_eq!(forest.find("1"), forest.find("3"));
    assert_ne!(forest.find("1"), forest.find("5"));

    let snapshot = forest.snapshot();
    let mut sizes: Vec<usize> = snapshot.values().map(Vec::len).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![2, 3]);
}

#[test]
fn missing_field_defaults_to_empty_string_across_the_pipeline() {
    let a = record("1", &[("block", "x")]);
    let fields: HashMap<String, String> = HashMap::new();
    let b = Arc::new(Record::new("2", fields));

    let options = LinkageOptions {
        blocking_rules: vec![BlockingRule::from_field_name("block")],
        similarity_functions: vec![linkage_core::scorer::field_edit_similarity(
            "name",
            IdfMap::empty(),
        )],
        m_probs: vec![0.9],
        u_probs: vec![0.1],
        batch_size: 10,
        match_threshold: -10.0,
        em_max_iter: 0,
        em_tolerance: 1e-4,
        field_weights: vec![1.0],
    };

    // b never carries "block", so it never pairs with a under this rule;
    // the call must not error (missing fields degrade to empty string, not
    // a panic or a FieldAccessMissing error).
    let clusters = link_records(&[a, b], &options).unwrap();
    assert!(clusters.is_empty());
}
