//! Disjoint-set forest for transitive-closure clustering.

use std::collections::HashMap;

/// Mapping element id -> parent id. A missing id is its own root once
/// inserted by the first `find`/`merge` that touches it.
#[derive(Debug, Clone, Default)]
pub struct DisjointSetForest {
    parent: HashMap<String, String>,
}

impl DisjointSetForest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `x` to its root, path-compressing every node visited along
    /// the way. Inserts `x` as its own root if absent.
    pub fn find(&mut self, x: &str) -> String {
        if !self.parent.contains_key(x) {
            self.parent.insert(x.to_string(), x.to_string());
            return x.to_string();
        }

        // Walk to the root.
        let mut root = x.to_string();
        while self.parent[&root] != root {
            root = self.parent[&root].clone();
        }

        // Compress every node on the path to point directly at the root.
        let mut cur = x.to_string();
        while cur != root {
            let next = self.parent.insert(cur.clone(), root.clone()).unwrap();
            cur = next;
        }

        root
    }

    /// Merge the sets containing `x` and `y`. No union-by-rank: the
    /// dataset sizes this engine targets don't need it.
    pub fn merge(&mut self, x: &str, y: &str) {
        let rx = self.find(x);
        let ry = self.find(y);
        if rx != ry {
            self.parent.insert(rx, ry);
        }
    }

    /// Root -> member ids, computed by calling `find` on every known key.
    pub fn snapshot(&mut self) -> HashMap<String, Vec<String>> {
        let keys: Vec<String> = self.parent.keys().cloned().collect();
        let mut clusters: HashMap<String, Vec<String>> = HashMap::new();
        for key in keys {
            let root = self.find(&key);
            clusters.entry(root).or_default().push(key);
        }
        clusters
    }
}
