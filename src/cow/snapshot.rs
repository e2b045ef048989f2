//! `Snapshot` - an immutable, shareable view of a [`CowMap`](super::CowMap).

use core::borrow::Borrow;
use core::fmt;
use core::hash::Hash;
use serde::{Serialize, Serializer};
use std::collections::hash_map::{self, HashMap};
use std::sync::Arc;

/// A published, read-only mapping.
///
/// Once a snapshot has been handed out its contents never change; later writes
/// to the owning map publish a new snapshot instead. Cloning is a reference
/// count bump.
pub struct Snapshot<K, V> {
    entries: Arc<HashMap<K, V>>,
}

impl<K, V> Snapshot<K, V> {
    #[inline]
    pub(crate) fn from_map(entries: HashMap<K, V>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the snapshot has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in arbitrary order.
    #[inline]
    pub fn iter(&self) -> hash_map::Iter<'_, K, V> {
        self.entries.iter()
    }

    /// Iterates over the keys in arbitrary order.
    #[inline]
    pub fn keys(&self) -> hash_map::Keys<'_, K, V> {
        self.entries.keys()
    }

    /// Iterates over the values in arbitrary order.
    #[inline]
    pub fn values(&self) -> hash_map::Values<'_, K, V> {
        self.entries.values()
    }

    /// Returns `true` if both snapshots are the same publication.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    /// Copies the entries into a private, mutable map.
    pub fn to_hash_map(&self) -> HashMap<K, V>
    where
        K: Clone,
        V: Clone,
    {
        HashMap::clone(&self.entries)
    }
}

impl<K, V> Snapshot<K, V>
where
    K: Eq + Hash,
{
    /// Looks up `key`.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    /// Returns `true` if `key` is present.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }
}

impl<K, V> Clone for Snapshot<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<K, V> Default for Snapshot<K, V> {
    fn default() -> Self {
        Self::from_map(HashMap::new())
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Snapshot<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<'a, K, V> IntoIterator for &'a Snapshot<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = hash_map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> Serialize for Snapshot<K, V>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter())
    }
}
