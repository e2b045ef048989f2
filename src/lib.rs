//! # `memokit` - Snapshots, Lazy Caches and Reuse
//!
//! Small concurrency building blocks for read-heavy shared state and expensive
//! one-time work:
//!
//! - **Copy-on-write containers** ([`CowMap`], [`CowVec`]): readers grab an
//!   immutable snapshot; writers copy, modify and publish a replacement.
//! - **Lazy caches** ([`LazyValue`], [`KeyedLazyCache`]): expensive values are
//!   produced on first use, exactly once per successful load, using
//!   double-checked locking.
//! - **Object pools** ([`ObjectPool`]): warm objects are recycled instead of
//!   reallocated.
//! - **Batching** ([`Batcher`]): items are grouped so a sink pays its per-call
//!   cost once per batch.
//!
//! ## Guarantees
//!
//! ### Publication
//! - A [`Snapshot`] never changes after it is handed out. Writers build the
//!   replacement privately and swap it in under the exclusive lock as the last
//!   step, so readers observe the old map or the new one, never a mix.
//! - Cached values are inserted whole under the exclusive lock.
//!
//! ### At-most-once loading
//! - [`LazyValue`] runs its producer once for the lifetime of the value.
//! - [`KeyedLazyCache`] runs its loader once per key, no matter how many
//!   threads ask for the key concurrently.
//!
//! ### Failure
//! - A producer or loader error is returned to the caller that triggered the
//!   load and is not cached; the next access retries.
//! - A panic unwinds through the caller and leaves the cache unloaded. Locks do
//!   not poison.
//!
//! ## Trade-offs
//!
//! - Copy-on-write writes cost O(len); batch them with [`CowMap::set_many`].
//! - [`KeyedLazyCache`] has a single lock. A slow loader for one key blocks
//!   lookups of every other key while it runs.
//!
//! ## Features
//!
//! - `tracing`: emit `tracing` events for loads, publications, pool misses and
//!   flushes.
//! - `parallel`: [`KeyedLazyCache::par_preload`] on the rayon pool.
//!
//! ## Example
//!
//! ```rust
//! use memokit::{CowMap, KeyedLazyCache, LazyValue};
//!
//! let config = LazyValue::new(|| "postgres://localhost:5432/db".to_string());
//! assert!(!config.is_loaded());
//! assert_eq!(config.get(), "postgres://localhost:5432/db");
//! assert!(config.is_loaded());
//!
//! let users = KeyedLazyCache::new(|id: &u64| format!("user-{id}"));
//! assert_eq!(users.get(&7), "user-7");
//!
//! let flags = CowMap::new();
//! flags.set("dark_mode", true);
//! let before = flags.snapshot();
//! flags.set("dark_mode", false);
//! assert_eq!(before.get("dark_mode"), Some(&true));
//! assert_eq!(flags.get("dark_mode"), Some(false));
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

mod macros;

pub mod batch;
pub mod config;
pub mod cow;
pub mod error;
pub mod lazy;
pub mod pool;
pub mod stats;

pub use batch::{BatchSink, Batcher};
pub use config::{BatchConfig, CacheConfig, PoolConfig};
pub use cow::{CowMap, CowVec, Snapshot};
pub use error::{ConfigError, FlushError};
pub use lazy::{KeyedLazyCache, LazyValue};
pub use pool::{Buffer, ObjectPool, Pooled, Recycle};
pub use stats::{CacheStats, PoolStats};

// Compile-time layout checks.
const _: () = {
    use core::mem;

    // A snapshot handle is a single `Arc` pointer.
    assert!(mem::size_of::<Snapshot<u64, u64>>() == mem::size_of::<usize>());
    assert!(mem::size_of::<Option<Snapshot<u64, u64>>>() == mem::size_of::<usize>());

    // Boxed slice (pointer + length) plus the fill level, no padding.
    assert!(mem::size_of::<Buffer>() == mem::size_of::<usize>() * 3);

    // The lazy cell adds at most a lock byte and the producer pointer (plus
    // padding) on top of the `OnceLock` slot.
    assert!(
        mem::size_of::<LazyValue<u64, fn() -> u64>>()
            <= mem::size_of::<std::sync::OnceLock<u64>>() + mem::size_of::<usize>() * 2
    );
};
