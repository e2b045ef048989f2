//! `KeyedLazyCache` - per-key memoization with double-checked locking.
//!
//! # Protocol
//!
//! 1. Take the shared lock; if the key is present, clone the value and return.
//! 2. Otherwise drop the shared lock and take the exclusive lock.
//! 3. Re-check: another thread may have loaded the key between 1 and 2.
//! 4. Still absent: run the loader, insert the result, release, return it.
//!
//! The loader therefore runs at most once per key for successful loads. A failed
//! load inserts nothing, so the next lookup of that key retries.
//!
//! # Contention
//!
//! There is a single lock for all keys. While the loader runs for one key, the
//! exclusive lock is held and lookups of every other key wait, including warm
//! ones. Keep loaders short, or shard several caches by key if that matters.

use crate::config::CacheConfig;
use crate::macros::{debug_event, trace_event};
use crate::stats::{CacheCounters, CacheStats};
use core::borrow::Borrow;
use core::convert::Infallible;
use core::fmt;
use core::hash::Hash;
use parking_lot::RwLock;
use std::collections::HashMap;

/// A concurrent cache that loads each missing key on demand.
///
/// Built with [`new`](Self::new) for an infallible loader read through
/// [`get`](Self::get), or with [`fallible`](Self::fallible) for a loader
/// returning `Result<V, E>` read through [`try_get`](Self::try_get).
pub struct KeyedLazyCache<K, V, F> {
    entries: RwLock<HashMap<K, V>>,
    loader: F,
    counters: CacheCounters,
}

impl<K, V, F> KeyedLazyCache<K, V, F> {
    fn empty(loader: F, config: &CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::with_capacity(config.initial_capacity)),
            loader,
            counters: CacheCounters::default(),
        }
    }

    /// Number of cached entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is cached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drops every cached entry. Subsequent lookups reload.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Returns the hit/miss counters.
    #[inline]
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot()
    }
}

impl<K, V, F> KeyedLazyCache<K, V, F>
where
    K: Eq + Hash,
{
    /// Returns the cached value for `key` without loading it.
    #[inline]
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.entries.read().get(key).cloned()
    }

    /// Returns `true` if `key` is cached.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.read().contains_key(key)
    }

    /// Evicts `key`, returning the cached value. The next lookup reloads it.
    pub fn invalidate<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.write().remove(key)
    }

    fn load_with<Q, E>(&self, key: &Q, load: impl FnOnce(&K) -> Result<V, E>) -> Result<V, E>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
        V: Clone,
    {
        {
            let entries = self.entries.read();
            if let Some(value) = entries.get(key) {
                self.counters.on_hit();
                return Ok(value.clone());
            }
        }
        self.counters.on_miss();

        let mut entries = self.entries.write();
        // Another caller may have loaded the key while we waited.
        if let Some(value) = entries.get(key) {
            self.counters.on_hit();
            return Ok(value.clone());
        }

        let key = key.to_owned();
        trace_event!("loading cache entry");
        match load(&key) {
            Ok(value) => {
                entries.insert(key, value.clone());
                self.counters.on_load();
                Ok(value)
            }
            Err(err) => {
                self.counters.on_load_failure();
                debug_event!("cache loader failed; entry left vacant");
                Err(err)
            }
        }
    }
}

impl<K, V, F> KeyedLazyCache<K, V, F>
where
    K: Eq + Hash,
    V: Clone,
    F: Fn(&K) -> V,
{
    /// Creates an empty cache with the given loader.
    pub fn new(loader: F) -> Self {
        Self::empty(loader, &CacheConfig::default())
    }

    /// Creates an empty cache sized by `config`.
    pub fn with_config(loader: F, config: &CacheConfig) -> Self {
        Self::empty(loader, config)
    }

    /// Returns the value for `key`, loading it on a miss.
    pub fn get<Q>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        match self.load_with(key, |k| Ok::<V, Infallible>((self.loader)(k))) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Loads every key that is not already cached.
    pub fn preload<I>(&self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: Clone,
    {
        for key in keys {
            self.get(&key);
        }
    }

    /// Loads every key that is not already cached, using the rayon pool.
    ///
    /// Loads still serialize on the cache's exclusive lock; the gain comes from
    /// overlapping the fast-path lookups of keys that are already warm.
    #[cfg(feature = "parallel")]
    pub fn par_preload<I>(&self, keys: I)
    where
        I: rayon::iter::IntoParallelIterator<Item = K>,
        K: Clone + Send + Sync,
        V: Send + Sync,
        F: Sync,
    {
        use rayon::iter::ParallelIterator;

        keys.into_par_iter().for_each(|key| {
            self.get(&key);
        });
    }
}

impl<K, V, E, F> KeyedLazyCache<K, V, F>
where
    K: Eq + Hash,
    V: Clone,
    F: Fn(&K) -> Result<V, E>,
{
    /// Creates an empty cache whose loader may fail.
    pub fn fallible(loader: F) -> Self {
        Self::empty(loader, &CacheConfig::default())
    }

    /// Creates an empty cache, sized by `config`, whose loader may fail.
    pub fn fallible_with_config(loader: F, config: &CacheConfig) -> Self {
        Self::empty(loader, config)
    }

    /// Returns the value for `key`, loading it on a miss.
    ///
    /// # Errors
    /// Returns the loader's error. No entry is inserted on failure, so the next
    /// lookup of `key` runs the loader again.
    pub fn try_get<Q>(&self, key: &Q) -> Result<V, E>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        self.load_with(key, &self.loader)
    }
}

impl<K, V, F> fmt::Debug for KeyedLazyCache<K, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedLazyCache")
            .field("len", &self.len())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
