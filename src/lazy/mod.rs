//! Lazy initialization primitives.
//!
//! Both caches follow the same double-checked protocol: a cheap check on the
//! fast path, then an exclusive lock and a second check before doing the
//! expensive work, then publication as the final step.

pub mod keyed;
pub mod value;

pub use keyed::KeyedLazyCache;
pub use value::LazyValue;

#[cfg(test)]
mod tests;
