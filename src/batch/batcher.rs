//! `Batcher` - accumulate items and write them to a sink in groups.
//!
//! Writing one item at a time pays the sink's fixed per-call cost for every
//! item. A batcher collects items until `batch_size` are pending and then hands
//! all of them to the sink in one call.
//!
//! # Locking
//!
//! Two locks: `sink` and `pending`. They are only ever nested in that order.
//! A push that fills the batch releases `pending`, takes `sink`, then re-checks
//! `pending` before draining it; a concurrent push may already have flushed.
//! Because draining happens while `sink` is held, batches reach the sink in the
//! order their items were pushed.
//!
//! Dropping a batcher flushes whatever is still pending.

use super::BatchSink;
use crate::config::BatchConfig;
use crate::error::{ConfigError, FlushError};
use crate::macros::debug_event;
use core::fmt;
use core::mem::{self, ManuallyDrop};
use core::ptr;
use parking_lot::Mutex;

/// Result of an operation that may have written a batch.
pub type FlushResult<T, S> = Result<usize, FlushError<T, <S as BatchSink<T>>::Error>>;

/// Groups items into batches for a [`BatchSink`].
///
/// Items still pending when the batcher is dropped are written to the sink. A
/// sink error at that point has no caller to return to; use [`flush`] or
/// [`into_sink`] first when the error matters.
///
/// [`flush`]: Batcher::flush
/// [`into_sink`]: Batcher::into_sink
pub struct Batcher<T, S>
where
    S: BatchSink<T>,
{
    sink: Mutex<S>,
    pending: Mutex<Vec<T>>,
    batch_size: usize,
}

impl<T, S> Batcher<T, S>
where
    S: BatchSink<T>,
{
    /// Creates a batcher writing to `sink`.
    ///
    /// # Errors
    /// Returns [`ConfigError::ZeroBatchSize`] if `config.batch_size` is zero.
    pub fn new(sink: S, config: BatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            sink: Mutex::new(sink),
            pending: Mutex::new(Vec::with_capacity(config.batch_size)),
            batch_size: config.batch_size,
        })
    }

    /// Queues `item`, writing a batch if `batch_size` items are now pending.
    ///
    /// Returns the number of items written, `0` if nothing was flushed.
    ///
    /// # Errors
    /// Returns the sink's error together with the unwritten batch.
    pub fn push(&self, item: T) -> FlushResult<T, S> {
        {
            let mut pending = self.pending.lock();
            pending.push(item);
            if pending.len() < self.batch_size {
                return Ok(0);
            }
        }

        let mut sink = self.sink.lock();
        let batch = {
            let mut pending = self.pending.lock();
            // A concurrent push may have flushed while we waited for the sink.
            if pending.len() < self.batch_size {
                return Ok(0);
            }
            mem::replace(&mut *pending, Vec::with_capacity(self.batch_size))
        };
        Self::write(&mut sink, batch)
    }

    /// Writes every pending item, regardless of how many there are.
    ///
    /// Returns the number of items written.
    ///
    /// # Errors
    /// Returns the sink's error together with the unwritten batch.
    pub fn flush(&self) -> FlushResult<T, S> {
        let mut sink = self.sink.lock();
        let batch = mem::take(&mut *self.pending.lock());
        if batch.is_empty() {
            return Ok(0);
        }
        Self::write(&mut sink, batch)
    }

    /// Flushes and returns the sink.
    ///
    /// # Errors
    /// Returns the sink's error together with the unwritten batch; the sink is
    /// dropped in that case.
    pub fn into_sink(self) -> Result<S, FlushError<T, S::Error>> {
        self.flush()?;
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped, so each field is moved out exactly
        // once. `batch_size` is `Copy` and needs no cleanup.
        let (sink, pending) = unsafe { (ptr::read(&this.sink), ptr::read(&this.pending)) };
        drop(pending);
        Ok(sink.into_inner())
    }

    fn write(sink: &mut S, batch: Vec<T>) -> FlushResult<T, S> {
        let count = batch.len();
        match sink.write_batch(&batch) {
            Ok(()) => {
                debug_event!(count, "flushed batch");
                Ok(count)
            }
            Err(error) => {
                debug_event!(count, "sink rejected batch");
                Err(FlushError::new(error, batch))
            }
        }
    }
}

impl<T, S> Batcher<T, S>
where
    S: BatchSink<T>,
{
    /// Number of items waiting for the next flush.
    #[inline]
    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Configured batch size.
    #[inline]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Runs `f` with exclusive access to the sink.
    ///
    /// The sink lock is held while `f` runs. Calling [`push`](Batcher::push)
    /// or [`flush`](Batcher::flush) on the same batcher from inside `f`
    /// deadlocks.
    pub fn with_sink<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.sink.lock())
    }
}

impl<T, S> Drop for Batcher<T, S>
where
    S: BatchSink<T>,
{
    fn drop(&mut self) {
        let batch = mem::take(self.pending.get_mut());
        if batch.is_empty() {
            return;
        }
        if let Err(rejected) = Self::write(self.sink.get_mut(), batch) {
            debug_event!(
                count = rejected.batch().len(),
                "batcher dropped; rejected batch discarded"
            );
            drop(rejected);
        }
    }
}

impl<T, S> fmt::Debug for Batcher<T, S>
where
    S: BatchSink<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Batcher")
            .field("batch_size", &self.batch_size)
            .field("pending", &self.pending_len())
            .finish_non_exhaustive()
    }
}
