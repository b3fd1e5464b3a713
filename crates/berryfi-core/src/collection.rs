//! # Named Collection
//!
//! An ordered, key-unique map. Iteration follows insertion order; a key that
//! is set again keeps its original position.

use std::collections::BTreeMap;

/// Ordered map with `filter`, `find` and `map` views.
///
/// Callbacks receive `(value, key, collection)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<K, V> {
    entries: Vec<(K, V)>,
    index: BTreeMap<K, usize>,
}

impl<K, V> Default for Collection<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Clone, V> Collection<K, V> {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Get a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.index.get(key) {
            Some(&i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    /// Insert or replace the value under `key`. Returns the collection for chaining.
    pub fn set(&mut self, key: K, value: V) -> &mut Self {
        self.upsert(key, value);
        self
    }

    /// Insert or replace the value under `key` and return a reference to it.
    pub fn upsert(&mut self, key: K, value: V) -> &mut V {
        let slot = match self.index.get(&key) {
            Some(&i) => {
                self.entries[i].1 = value;
                i
            }
            None => {
                let i = self.entries.len();
                self.index.insert(key.clone(), i);
                self.entries.push((key, value));
                i
            }
        };
        &mut self.entries[slot].1
    }

    /// Check whether `key` is present.
    pub fn has(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Iterate keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Iterate values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Iterate values mutably in insertion order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.entries.iter_mut().map(|(_, v)| v)
    }

    /// Collect the entries for which `predicate` holds into a new collection.
    ///
    /// The source collection is left untouched.
    pub fn filter<F>(&self, mut predicate: F) -> Collection<K, V>
    where
        V: Clone,
        F: FnMut(&V, &K, &Self) -> bool,
    {
        self.entries
            .iter()
            .filter(|(k, v)| predicate(v, k, self))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// The first value for which `predicate` holds.
    pub fn find<F>(&self, mut predicate: F) -> Option<&V>
    where
        F: FnMut(&V, &K, &Self) -> bool,
    {
        self.entries
            .iter()
            .find(|(k, v)| predicate(v, k, self))
            .map(|(_, v)| v)
    }

    /// A new collection with the same keys and mapped values.
    pub fn map<U, F>(&self, mut f: F) -> Collection<K, U>
    where
        F: FnMut(&V, &K, &Self) -> U,
    {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), f(v, k, self)))
            .collect()
    }
}

impl<K: Ord + Clone, V> FromIterator<(K, V)> for Collection<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut collection = Collection::new();
        for (k, v) in iter {
            collection.upsert(k, v);
        }
        collection
    }
}

impl<'a, K, V> IntoIterator for &'a Collection<K, V> {
    type Item = &'a (K, V);
    type IntoIter = std::slice::Iter<'a, (K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// =============================================================================
// TESTS
// =============================================================================
