//! `CowVec` - an append-only copy-on-write sequence.

use crate::macros::trace_event;
use core::fmt;
use parking_lot::RwLock;
use std::sync::Arc;

/// A concurrent sequence whose appends publish a fresh immutable slice.
///
/// Readers receive an `Arc<[T]>` that never changes underneath them.
pub struct CowVec<T> {
    current: RwLock<Arc<[T]>>,
}

impl<T> CowVec<T> {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Vec::new().into()),
        }
    }

    /// Returns the current contents.
    #[inline]
    pub fn snapshot(&self) -> Arc<[T]> {
        Arc::clone(&self.current.read())
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    /// Returns `true` if the sequence is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }
}

impl<T: Clone> CowVec<T> {
    /// Appends `value`, publishing a new slice.
    pub fn push(&self, value: T) {
        let mut current = self.current.write();
        let mut next = Vec::with_capacity(current.len() + 1);
        next.extend_from_slice(&current);
        next.push(value);
        trace_event!(len = next.len(), "publishing slice");
        *current = next.into();
    }

    /// Appends every value with a single copy.
    pub fn extend<I: IntoIterator<Item = T>>(&self, values: I) {
        let values: Vec<T> = values.into_iter().collect();
        if values.is_empty() {
            return;
        }
        let mut current = self.current.write();
        let mut next = Vec::with_capacity(current.len() + values.len());
        next.extend_from_slice(&current);
        next.extend(values);
        trace_event!(len = next.len(), "publishing slice");
        *current = next.into();
    }

    /// Returns the element at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<T> {
        self.current.read().get(index).cloned()
    }

    /// Returns a private copy of the contents.
    pub fn to_vec(&self) -> Vec<T> {
        self.current.read().to_vec()
    }
}

impl<T> Default for CowVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for CowVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            current: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for CowVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.current.read().iter()).finish()
    }
}
