//! Hit/miss and reuse counters.
//!
//! Counters are updated with relaxed atomics on every operation and read back as
//! plain snapshots. The two counters bumped on the warm read path sit on their
//! own cache lines.

use core::sync::atomic::{AtomicU64, Ordering};
use crossbeam_utils::CachePadded;
use serde::Serialize;

/// A point-in-time view of a [`KeyedLazyCache`](crate::lazy::KeyedLazyCache)'s counters.
///
/// Every `get` that returns is counted exactly once as a hit, a load or a load
/// failure. A loader that panics leaves only its miss recorded.
/// `misses` counts lookups that fell through the shared-lock fast path; some of
/// those are then served by the re-check and also count as hits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache without running the loader.
    pub hits: u64,
    /// Lookups that missed under the shared lock.
    pub misses: u64,
    /// Successful loader invocations.
    pub loads: u64,
    /// Loader invocations that returned an error.
    pub load_failures: u64,
}

impl CacheStats {
    /// Fraction of lookups served without running the loader.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.loads + self.load_failures;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }
}

#[derive(Default)]
pub(crate) struct CacheCounters {
    hits: CachePadded<AtomicU64>,
    misses: CachePadded<AtomicU64>,
    loads: AtomicU64,
    load_failures: AtomicU64,
}

impl CacheCounters {
    #[inline(always)]
    pub(crate) fn on_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn on_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn on_load(&self) {
        self.loads.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn on_load_failure(&self) {
        self.load_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            load_failures: self.load_failures.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time view of an [`ObjectPool`](crate::pool::ObjectPool)'s counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Objects built by the factory, including prefilled ones.
    pub created: u64,
    /// Checkouts served from the idle list.
    pub reused: u64,
    /// Objects reset and returned to the idle list.
    pub recycled: u64,
    /// Objects dropped on return because the idle list was full.
    pub discarded: u64,
}

#[derive(Default)]
pub(crate) struct PoolCounters {
    created: AtomicU64,
    reused: AtomicU64,
    recycled: AtomicU64,
    discarded: AtomicU64,
}

impl PoolCounters {
    #[inline]
    pub(crate) fn on_create(&self, count: u64) {
        self.created.fetch_add(count, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn on_reuse(&self) {
        self.reused.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn on_recycle(&self) {
        self.recycled.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn on_discard(&self) {
        self.discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> PoolStats {
        PoolStats {
            created: self.created.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
            recycled: self.recycled.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}
