//! `CowMap` - a copy-on-write map with snapshot reads.
//!
//! Readers take the shared lock only long enough to look up a key or clone the
//! current [`Snapshot`] handle. Writers take the exclusive lock, build a complete
//! replacement map privately and publish it as the last step, so a reader sees
//! either the old snapshot or the new one and never a mix of both.
//!
//! Every write copies the whole map: reads stay cheap, writes cost O(len).
//! Use [`CowMap::set_many`] to pay that copy once for several entries.

use super::Snapshot;
use crate::config::CacheConfig;
use crate::macros::debug_event;
use core::borrow::Borrow;
use core::fmt;
use core::hash::Hash;
use parking_lot::RwLock;
use std::collections::HashMap;

/// A concurrent map whose writes publish a fresh immutable snapshot.
pub struct CowMap<K, V> {
    current: RwLock<Snapshot<K, V>>,
}

impl<K, V> CowMap<K, V> {
    /// Creates an empty map.
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty map whose first snapshot reserves `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            current: RwLock::new(Snapshot::from_map(HashMap::with_capacity(capacity))),
        }
    }

    /// Creates an empty map sized by `config`.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::with_capacity(config.initial_capacity)
    }

    /// Returns the current snapshot.
    ///
    /// The snapshot stays valid and unchanged regardless of later writes.
    #[inline]
    pub fn snapshot(&self) -> Snapshot<K, V> {
        self.current.read().clone()
    }

    /// Number of entries in the current snapshot.
    #[inline]
    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    /// Returns `true` if the current snapshot is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }

    fn publish(current: &mut Snapshot<K, V>, next: HashMap<K, V>) {
        debug_event!(entries = next.len(), "publishing snapshot");
        *current = Snapshot::from_map(next);
    }
}

impl<K, V> CowMap<K, V>
where
    K: Eq + Hash,
{
    /// Looks up `key` in the current snapshot.
    ///
    /// A missing key is a normal outcome and yields `None`.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.current.read().get(key).cloned()
    }

    /// Returns `true` if `key` is present in the current snapshot.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.current.read().contains_key(key)
    }
}

impl<K, V> CowMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Inserts or overwrites `key`, publishing a new snapshot.
    pub fn set(&self, key: K, value: V) {
        let mut current = self.current.write();
        let mut next = HashMap::with_capacity(current.len() + 1);
        next.extend(current.iter().map(|(k, v)| (k.clone(), v.clone())));
        next.insert(key, value);
        Self::publish(&mut current, next);
    }

    /// Inserts or overwrites every entry, publishing a single new snapshot.
    ///
    /// Later entries win over earlier ones with the same key.
    pub fn set_many<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        // Materialize before locking so a lazy iterator cannot stall writers.
        let entries: Vec<(K, V)> = entries.into_iter().collect();
        if entries.is_empty() {
            return;
        }

        let mut current = self.current.write();
        let mut next = HashMap::with_capacity(current.len() + entries.len());
        next.extend(current.iter().map(|(k, v)| (k.clone(), v.clone())));
        next.extend(entries);
        Self::publish(&mut current, next);
    }

    /// Removes `key`, returning its value.
    ///
    /// Nothing is published when the key is absent.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut current = self.current.write();
        let removed = current.get(key).cloned()?;

        let mut next = HashMap::with_capacity(current.len() - 1);
        next.extend(
            current
                .iter()
                .filter(|&(k, _)| <K as Borrow<Q>>::borrow(k) != key)
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        Self::publish(&mut current, next);
        Some(removed)
    }
}

impl<K, V> Default for CowMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> From<HashMap<K, V>> for CowMap<K, V> {
    fn from(entries: HashMap<K, V>) -> Self {
        Self {
            current: RwLock::new(Snapshot::from_map(entries)),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for CowMap<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<HashMap<K, V>>())
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for CowMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CowMap")
            .field("current", &*self.current.read())
            .finish()
    }
}
