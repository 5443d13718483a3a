//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with their expiration policy.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::cache::ExpirationPolicy;

/// Type-erased payload shared between the store and snapshots.
pub type CacheValue = Arc<dyn Any + Send + Sync>;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: CacheValue,
    /// Expiration policy, refreshed on reads when sliding
    pub policy: ExpirationPolicy,
    /// When the entry was stored
    pub created_at: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    pub fn new(value: CacheValue, policy: ExpirationPolicy, now: DateTime<Utc>) -> Self {
        Self {
            value,
            policy,
            created_at: now,
        }
    }

    // == Is Expired ==
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.policy.is_expired(now)
    }

    // == Read ==
    /// Returns the value if still live, pushing a sliding window forward.
    ///
    /// Returns None when the entry has expired; the caller is expected to purge it.
    pub fn read(&mut self, now: DateTime<Utc>) -> Option<CacheValue> {
        if self.is_expired(now) {
            return None;
        }
        self.policy.touch(now);
        Some(Arc::clone(&self.value))
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("policy", &self.policy)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}
