// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::hash::Hash;

/// Last fetched result of a query, per set of request parameters.
///
/// Keys are compared structurally, so any two requests with equal fields share an entry.
/// Entries never expire; they are only replaced by a newer result for the same key.
#[derive(Debug, Clone)]
pub struct QueryCache<K, V> {
    entries: HashMap<K, V>,
}

impl<K, V> Default for QueryCache<K, V> {
    fn default() -> Self {
        QueryCache {
            entries: HashMap::new(),
        }
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash,
{
    pub fn query(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Returns the cached value or the empty (default) one if nothing was stored yet.
    pub fn query_or_default(&self, key: &K) -> V
    where
        V: Clone + Default,
    {
        self.query(key).cloned().unwrap_or_default()
    }

    /// Stores the value, returning the one it replaced.
    pub fn store(&mut self, key: K, value: V) -> Option<V> {
        self.entries.insert(key, value)
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
    use verimcosmos_types::{
        Nym, PageRequest, QueryAllNymRequest, QueryGetNymRequest, QueryGetNymResponse,
    };

    #[test]
    fn structurally_equal_keys_hit_the_same_entry() {
        let mut cache = QueryCache::default();
        let value = QueryGetNymResponse {
            nym: Some(Nym {
                id: 1,
                ..Default::default()
            }),
        };
        cache.store(QueryGetNymRequest { id: 1 }, value.clone());

        let fresh_key = QueryGetNymRequest::new(1);
        assert_eq!(cache.query(&fresh_key), Some(&value));
        assert_eq!(cache.query(&QueryGetNymRequest::new(2)), None);
    }

    #[test]
    fn later_store_replaces_earlier_value() {
        let mut cache = QueryCache::default();
        let key = QueryAllNymRequest::new(Some(PageRequest::with_limit(5)));

        assert!(cache.store(key.clone(), 1).is_none());
        assert_eq!(cache.store(key.clone(), 2), Some(1));
        assert_eq!(cache.query_or_default(&key), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn missing_entries_default_to_empty() {
        let cache: QueryCache<QueryGetNymRequest, QueryGetNymResponse> = QueryCache::default();
        assert!(cache.is_empty());
        assert_eq!(
            cache.query_or_default(&QueryGetNymRequest::new(3)),
            QueryGetNymResponse::default()
        );
    }
}
