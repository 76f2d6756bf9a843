//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A cached value together with the instant it was written.
///
/// Entries are never mutated in place; refreshing a key stores a new entry
/// with a fresh `stored_at`.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored payload, opaque to the cache
    pub value: V,
    /// The instant the entry was written
    pub stored_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current instant.
    pub fn new(value: V) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
        }
    }

    // == Is Valid ==
    /// Checks whether the entry is still fresh for the given TTL.
    ///
    /// Boundary condition: an entry is valid while its age is strictly less
    /// than the TTL. Once the full TTL has elapsed the entry is stale and a
    /// read must go back to the source.
    pub fn is_valid(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }

    // == Age ==
    /// Elapsed time since the entry was written.
    pub fn age(&self) -> Duration {
        self.stored_at.elapsed()
    }

    /// Remaining lifetime under the given TTL, zero once expired.
    pub fn ttl_remaining(&self, ttl: Duration) -> Duration {
        ttl.saturating_sub(self.age())
    }
}
