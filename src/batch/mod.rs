//! Batching of writes.

pub mod batcher;

pub use batcher::{Batcher, FlushResult};

use core::convert::Infallible;

/// A destination that accepts items in groups.
pub trait BatchSink<T> {
    /// Error returned when a batch cannot be written.
    type Error;

    /// Writes a whole batch.
    ///
    /// # Errors
    /// Implementation-defined. On error the batcher returns the batch to the
    /// caller inside a [`FlushError`](crate::error::FlushError).
    fn write_batch(&mut self, batch: &[T]) -> Result<(), Self::Error>;
}

/// Collects every written item in order.
impl<T: Clone> BatchSink<T> for Vec<T> {
    type Error = Infallible;

    fn write_batch(&mut self, batch: &[T]) -> Result<(), Self::Error> {
        self.extend_from_slice(batch);
        Ok(())
    }
}

impl<T, S> BatchSink<T> for &mut S
where
    S: BatchSink<T> + ?Sized,
{
    type Error = S::Error;

    fn write_batch(&mut self, batch: &[T]) -> Result<(), Self::Error> {
        (**self).write_batch(batch)
    }
}
