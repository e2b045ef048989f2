//! Object pooling.
//!
//! Reusing a few warm objects instead of allocating a fresh one per operation
//! keeps allocation off the hot path. Objects are reset through [`Recycle`]
//! before they go back to the pool.

pub mod buffer;
pub mod object_pool;

pub use buffer::{Buffer, DEFAULT_BUFFER_CAPACITY};
pub use object_pool::{ObjectPool, Pooled};

/// Resets an object to a reusable state before it returns to a pool.
///
/// Implementations should keep allocated capacity so reuse stays cheap.
pub trait Recycle {
    /// Clears the object's contents.
    fn recycle(&mut self);
}

impl<T> Recycle for Vec<T> {
    #[inline]
    fn recycle(&mut self) {
        self.clear();
    }
}

impl Recycle for String {
    #[inline]
    fn recycle(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests;
