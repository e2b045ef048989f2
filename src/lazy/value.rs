//! `LazyValue` - a thread-safe value computed on first access.
//!
//! The value lives in a [`OnceLock`], which gives lock-free reads once it is
//! published. Loading is serialized by a separate mutex with a re-check after
//! acquisition, so the producer runs at most once per successful load even when
//! many threads race on the first access.
//!
//! A producer that fails (returns `Err` or panics) publishes nothing: the error
//! reaches the caller that triggered the load and the next access tries again.

use crate::macros::{debug_event, trace_event};
use core::convert::Infallible;
use core::fmt;
use parking_lot::Mutex;
use std::sync::OnceLock;

/// A lazily computed, memoized value.
///
/// Built with [`new`](Self::new) for an infallible producer read through
/// [`get`](Self::get), or with [`fallible`](Self::fallible) for a producer
/// returning `Result<T, E>` read through [`try_get`](Self::try_get).
pub struct LazyValue<T, F = fn() -> T> {
    value: OnceLock<T>,
    init: Mutex<()>,
    producer: F,
}

impl<T, F> LazyValue<T, F> {
    fn unloaded(producer: F) -> Self {
        Self {
            value: OnceLock::new(),
            init: Mutex::new(()),
            producer,
        }
    }

    /// Returns `true` once the value has been produced. Never triggers loading.
    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.value.get().is_some()
    }

    /// Returns the value if it has already been produced.
    #[inline]
    pub fn get_if_loaded(&self) -> Option<&T> {
        self.value.get()
    }

    /// Consumes the cell, returning the value if it was produced.
    #[inline]
    pub fn into_inner(self) -> Option<T> {
        self.value.into_inner()
    }

    fn load_with<E>(&self, produce: impl FnOnce() -> Result<T, E>) -> Result<&T, E> {
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        let _guard = self.init.lock();
        // Another caller may have finished loading while we waited.
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        trace_event!("producing lazy value");
        match produce() {
            Ok(value) => Ok(self.value.get_or_init(|| value)),
            Err(err) => {
                debug_event!("lazy value producer failed; will retry on next access");
                Err(err)
            }
        }
    }
}

impl<T, F> LazyValue<T, F>
where
    F: Fn() -> T,
{
    /// Creates an unloaded value with the given producer.
    pub fn new(producer: F) -> Self {
        Self::unloaded(producer)
    }

    /// Returns the value, producing it on first access.
    pub fn get(&self) -> &T {
        match self.load_with(|| Ok::<T, Infallible>((self.producer)())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}

impl<T, E, F> LazyValue<T, F>
where
    F: Fn() -> Result<T, E>,
{
    /// Creates an unloaded value whose producer may fail.
    pub fn fallible(producer: F) -> Self {
        Self::unloaded(producer)
    }

    /// Returns the value, producing it on first access.
    ///
    /// # Errors
    /// Returns the producer's error. Nothing is cached on failure; the next call
    /// runs the producer again.
    pub fn try_get(&self) -> Result<&T, E> {
        self.load_with(&self.producer)
    }
}

impl<T: Default> Default for LazyValue<T> {
    fn default() -> Self {
        Self::new(T::default)
    }
}

impl<T: fmt::Debug, F> fmt::Debug for LazyValue<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("LazyValue");
        match self.value.get() {
            Some(value) => d.field("value", value),
            None => d.field("value", &format_args!("<unloaded>")),
        };
        d.finish()
    }
}
