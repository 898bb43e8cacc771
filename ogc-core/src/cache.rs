use std::collections::{btree_map, BTreeMap};

use crate::entities::{CacheKey, GeocodeResult};

/// In-memory store of all resolved lookups.
///
/// Lookups without a query are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeocodeCache {
    entries: BTreeMap<CacheKey, GeocodeResult>,
}

impl GeocodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<&GeocodeResult> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Stores a result and returns the previous one.
    pub fn put(&mut self, key: CacheKey, result: GeocodeResult) -> Option<GeocodeResult> {
        if key.query.is_empty() {
            log::debug!("Ignore cache entry without query");
            return None;
        }
        self.entries.insert(key, result)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, CacheKey, GeocodeResult> {
        self.entries.iter()
    }
}

impl FromIterator<(CacheKey, GeocodeResult)> for GeocodeCache {
    fn from_iter<I: IntoIterator<Item = (CacheKey, GeocodeResult)>>(iter: I) -> Self {
        let mut cache = Self::default();
        for (key, result) in iter {
            cache.put(key, result);
        }
        cache
    }
}

impl<'a> IntoIterator for &'a GeocodeCache {
    type Item = (&'a CacheKey, &'a GeocodeResult);
    type IntoIter = btree_map::Iter<'a, CacheKey, GeocodeResult>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
