use std::collections::HashMap;

use log::debug;

use crate::engine::Record;
use crate::predicate::Predicate;

/// Session-lifetime memoization of select results, keyed by table name
/// plus the canonical predicate form. It has no dependency tracking, so
/// callers must clear the whole cache after any successful mutation.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<String, Vec<Record>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Composite cache key. `BTreeMap` iteration makes the predicate
    /// part deterministic; `*` stands for the match-all query.
    pub fn key(table: &str, predicate: Option<&Predicate>) -> String {
        match predicate {
            None => format!("{table}:*"),
            Some(p) => {
                let clause: Vec<String> =
                    p.iter().map(|(col, val)| format!("{col}={val:?}")).collect();
                format!("{table}:{}", clause.join(","))
            }
        }
    }

    pub fn get_or_compute(
        &mut self,
        key: &str,
        compute: impl FnOnce() -> Vec<Record>,
    ) -> Vec<Record> {
        if let Some(hit) = self.entries.get(key) {
            debug!("cache hit for {key}");
            return hit.clone();
        }
        debug!("cache miss for {key}");
        let result = compute();
        self.entries.insert(key.to_string(), result.clone());
        result
    }

    pub fn invalidate_all(&mut self) {
        if !self.entries.is_empty() {
            debug!("cache cleared ({} entries)", self.entries.len());
        }
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    fn row(id: i64) -> Record {
        let mut r = Record::new();
        r.insert("ID".to_string(), Value::Int(id));
        r
    }

    #[test]
    fn second_lookup_skips_the_compute_fn() {
        let mut cache = QueryCache::new();
        let mut calls = 0;
        let first = cache.get_or_compute("users:*", || {
            calls += 1;
            vec![row(1)]
        });
        let second = cache.get_or_compute("users:*", || {
            calls += 1;
            vec![row(2)]
        });
        assert_eq!(calls, 1);
        assert_eq!(first, second);
    }

    #[test]
    fn invalidate_all_forces_recomputation() {
        let mut cache = QueryCache::new();
        cache.get_or_compute("users:*", || vec![row(1)]);
        cache.invalidate_all();
        assert!(cache.is_empty());
        let fresh = cache.get_or_compute("users:*", || vec![row(1), row(2)]);
        assert_eq!(fresh.len(), 2);
    }

    #[test]
    fn keys_distinguish_tables_and_predicates() {
        let mut age = Predicate::new();
        age.insert("age".to_string(), Value::Int(28));
        let mut name = Predicate::new();
        name.insert("name".to_string(), Value::Str("Ann".to_string()));

        let keys = [
            QueryCache::key("users", None),
            QueryCache::key("pets", None),
            QueryCache::key("users", Some(&age)),
            QueryCache::key("users", Some(&name)),
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in keys.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn equal_predicates_share_a_key() {
        let mut a = Predicate::new();
        a.insert("age".to_string(), Value::Int(28));
        let mut b = Predicate::new();
        b.insert("age".to_string(), Value::Int(28));
        assert_eq!(
            QueryCache::key("users", Some(&a)),
            QueryCache::key("users", Some(&b))
        );
    }
}
