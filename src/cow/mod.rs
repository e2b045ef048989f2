//! Copy-on-write containers.
//!
//! Writers never mutate a published value in place: they copy, modify the copy
//! and swap it in under an exclusive lock. Readers that already hold a snapshot
//! keep seeing exactly what they were given.

pub mod map;
pub mod snapshot;
pub mod vec;

pub use map::CowMap;
pub use snapshot::Snapshot;
pub use vec::CowVec;
