//! `ObjectPool` - a factory-backed pool of reusable objects.
//!
//! Checkouts pop from an idle list and fall back to the factory when it is
//! empty. The [`Pooled`] guard resets its object and pushes it back on drop,
//! unless the idle list is already at `max_idle`, in which case the object is
//! dropped.
//!
//! Each pool is an ordinary value: construct one per use site and share it by
//! reference or `Arc`.

use super::Recycle;
use crate::config::PoolConfig;
use crate::error::ConfigError;
use crate::macros::trace_event;
use crate::stats::{PoolCounters, PoolStats};
use core::fmt;
use core::mem::ManuallyDrop;
use core::ops::{Deref, DerefMut};
use parking_lot::Mutex;

/// A pool of reusable `T`s built by `F`.
pub struct ObjectPool<T, F = fn() -> T> {
    idle: Mutex<Vec<T>>,
    factory: F,
    max_idle: usize,
    counters: PoolCounters,
}

impl<T, F> ObjectPool<T, F>
where
    T: Recycle,
    F: Fn() -> T,
{
    /// Creates an empty pool with the default limits.
    pub fn new(factory: F) -> Self {
        let config = PoolConfig::default();
        Self {
            idle: Mutex::new(Vec::new()),
            factory,
            max_idle: config.max_idle,
            counters: PoolCounters::default(),
        }
    }

    /// Creates a pool with the given limits, building `config.prefill` objects
    /// up front.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if `config` is invalid.
    pub fn with_config(factory: F, config: PoolConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut idle = Vec::with_capacity(config.max_idle);
        idle.extend((0..config.prefill).map(|_| factory()));

        let counters = PoolCounters::default();
        counters.on_create(config.prefill as u64);

        Ok(Self {
            idle: Mutex::new(idle),
            factory,
            max_idle: config.max_idle,
            counters,
        })
    }

    /// Checks out an object, reusing an idle one when available.
    pub fn get(&self) -> Pooled<'_, T, F> {
        let reused = self.idle.lock().pop();
        let object = match reused {
            Some(object) => {
                self.counters.on_reuse();
                object
            }
            None => {
                trace_event!("pool empty; creating object");
                self.counters.on_create(1);
                (self.factory)()
            }
        };

        Pooled {
            pool: self,
            object: ManuallyDrop::new(object),
        }
    }
}

impl<T: Recycle, F> ObjectPool<T, F> {
    fn put(&self, mut object: T) {
        object.recycle();

        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(object);
            drop(idle);
            self.counters.on_recycle();
        } else {
            drop(idle);
            trace_event!(max_idle = self.max_idle, "pool full; discarding object");
            self.counters.on_discard();
        }
    }

    /// Number of objects waiting to be reused.
    #[inline]
    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    /// Maximum number of idle objects retained.
    #[inline]
    pub fn max_idle(&self) -> usize {
        self.max_idle
    }

    /// Returns the reuse counters.
    #[inline]
    pub fn stats(&self) -> PoolStats {
        self.counters.snapshot()
    }
}

impl<T: Recycle + Default> Default for ObjectPool<T> {
    fn default() -> Self {
        Self::new(T::default)
    }
}

impl<T, F> fmt::Debug for ObjectPool<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("idle", &self.idle.lock().len())
            .field("max_idle", &self.max_idle)
            .field("stats", &self.counters.snapshot())
            .finish_non_exhaustive()
    }
}

/// An object checked out of an [`ObjectPool`].
///
/// Dereferences to the object. On drop the object is recycled into the pool.
pub struct Pooled<'a, T: Recycle, F = fn() -> T> {
    pool: &'a ObjectPool<T, F>,
    object: ManuallyDrop<T>,
}

impl<'a, T: Recycle, F> Pooled<'a, T, F> {
    /// Takes the object out of the pool for good.
    pub fn detach(self) -> T {
        let mut this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped, so `object` is taken exactly once.
        unsafe { ManuallyDrop::take(&mut this.object) }
    }
}

impl<'a, T: Recycle, F> Deref for Pooled<'a, T, F> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.object
    }
}

impl<'a, T: Recycle, F> DerefMut for Pooled<'a, T, F> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.object
    }
}

impl<'a, T: Recycle, F> Drop for Pooled<'a, T, F> {
    fn drop(&mut self) {
        // SAFETY: `object` is initialized until here and not touched afterwards.
        let object = unsafe { ManuallyDrop::take(&mut self.object) };
        self.pool.put(object);
    }
}

impl<'a, T: Recycle + fmt::Debug, F> fmt::Debug for Pooled<'a, T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.object, f)
    }
}
