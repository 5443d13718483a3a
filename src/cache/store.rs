//! Entry Store Module
//!
//! HashMap storage guarded by a single mutex, with lazy expiration on lookup.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::trace;

use crate::cache::entry::CacheValue;
use crate::cache::{CacheEntry, CacheObject, CacheStats, Clock, ExpirationPolicy, SystemClock};
use crate::error::{CacheError, Result};

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
}

impl Inner {
    fn sync_total(&mut self) {
        let len = self.entries.len();
        self.stats.set_total_entries(len);
    }
}

// == Entry Store ==
/// The single authority over stored entries.
///
/// Every operation takes the store lock for a short, bounded critical section.
/// Keys are used verbatim; normalization is the engine's job.
#[derive(Debug)]
pub struct EntryStore {
    inner: Mutex<Inner>,
    clock: Arc<dyn Clock>,
}

impl EntryStore {
    // == Constructor ==
    /// Creates an empty store reading the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store reading the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            clock,
        }
    }

    /// Current time according to the store's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // == Get ==
    /// Retrieves a live value by key.
    ///
    /// Expired entries are removed as a side effect and reported as `Expired`.
    /// A successful read of a sliding entry resets its window.
    pub fn get(&self, key: &str) -> Result<CacheValue> {
        let now = self.now();
        let mut inner = self.inner.lock();

        let Some(entry) = inner.entries.get_mut(key) else {
            inner.stats.record_miss();
            return Err(CacheError::NotFound(key.to_string()));
        };

        match entry.read(now) {
            Some(value) => {
                inner.stats.record_hit();
                Ok(value)
            }
            None => {
                inner.entries.remove(key);
                inner.stats.record_miss();
                inner.stats.record_expirations(1);
                inner.sync_total();
                trace!(key, "purged expired entry on lookup");
                Err(CacheError::Expired(key.to_string()))
            }
        }
    }

    // == Contains ==
    /// Returns true if a live entry exists. Does not purge or refresh.
    pub fn contains(&self, key: &str) -> bool {
        let now = self.now();
        self.inner
            .lock()
            .entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    // == Set ==
    /// Stores a value under `key`, replacing any previous entry and its policy.
    pub fn set(&self, key: String, value: CacheValue, policy: ExpirationPolicy) {
        let entry = CacheEntry::new(value, policy, self.now());
        let mut inner = self.inner.lock();
        let replaced = inner.entries.insert(key, entry).is_some();
        inner.sync_total();
        trace!(replaced, "stored entry");
    }

    // == Remove ==
    /// Deletes an entry. Returns whether anything was removed; absent keys are not an error.
    pub fn remove(&self, key: &str) -> bool {
        let mut inner = self.inner.lock();
        let removed = inner.entries.remove(key).is_some();
        inner.sync_total();
        removed
    }

    // == Remove All ==
    /// Deletes every listed key, skipping absent ones. Returns how many were removed.
    pub fn remove_all<I, S>(&self, keys: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut inner = self.inner.lock();
        let mut removed = 0;
        for key in keys {
            if inner.entries.remove(key.as_ref()).is_some() {
                removed += 1;
            }
        }
        inner.sync_total();
        removed
    }

    // == Clear ==
    /// Empties the store. The store itself stays usable.
    pub fn clear(&self) -> usize {
        let mut inner = self.inner.lock();
        let count = inner.entries.len();
        inner.entries.clear();
        inner.sync_total();
        count
    }

    // == Snapshot ==
    /// Point-in-time copy of every stored entry, expired-but-unread ones included.
    pub fn snapshot(&self) -> Vec<CacheObject> {
        let inner = self.inner.lock();
        inner
            .entries
            .iter()
            .map(|(key, entry)| {
                CacheObject::new(key.clone(), Arc::clone(&entry.value), entry.policy.expires_at())
            })
            .collect()
    }

    // == Keys Matching ==
    /// Returns every stored key for which `predicate` holds.
    pub fn keys_matching<P>(&self, predicate: P) -> Vec<String>
    where
        P: Fn(&str) -> bool,
    {
        let inner = self.inner.lock();
        inner
            .entries
            .keys()
            .filter(|key| predicate(key))
            .cloned()
            .collect()
    }

    // == Purge Expired ==
    /// Removes all expired entries. Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.now();
        let mut inner = self.inner.lock();
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| !entry.is_expired(now));
        let count = before - inner.entries.len();
        inner.stats.record_expirations(count);
        inner.sync_total();
        count
    }

    // == Population Accounting ==
    pub(crate) fn record_population(&self, stored: bool) {
        let mut inner = self.inner.lock();
        if stored {
            inner.stats.record_population();
        } else {
            inner.stats.record_failed_population();
        }
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats.clone()
    }

    // == Length ==
    /// Returns the number of stored entries, expired-but-unpurged included.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }
}

impl Default for EntryStore {
    fn default() -> Self {
        Self::new()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{Expiration, ManualClock};

    fn store() -> (EntryStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        (EntryStore::with_clock(clock.clone()), clock)
    }

    fn policy(store: &EntryStore, mode: Expiration, ttl_minutes: i64) -> ExpirationPolicy {
        ExpirationPolicy::new(mode, ttl_minutes, store.now())
    }

    fn text(value: &CacheValue) -> &str {
        value.downcast_ref::<String>().unwrap()
    }

    #[test]
    fn test_store_new() {
        let store = EntryStore::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let (store, _) = store();

        let p = policy(&store, Expiration::Absolute, 5);
        store.set("key1".to_string(), Arc::new("value1".to_string()), p);
        let value = store.get("key1").unwrap();

        assert_eq!(text(&value), "value1");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let (store, _) = store();

        let result = store.get("nonexistent");
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_store_overwrite_replaces_policy() {
        let (store, clock) = store();

        let p = policy(&store, Expiration::Absolute, 1);
        store.set("key1".to_string(), Arc::new("value1".to_string()), p);
        let p = policy(&store, Expiration::Absolute, 10);
        store.set("key1".to_string(), Arc::new("value2".to_string()), p);

        clock.advance_minutes(5);
        let value = store.get("key1").unwrap();
        assert_eq!(text(&value), "value2");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_lazy_expiration() {
        let (store, clock) = store();

        let p = policy(&store, Expiration::Absolute, 1);
        store.set("key1".to_string(), Arc::new("value1".to_string()), p);
        clock.advance_minutes(2);

        // Still present until something looks it up
        assert_eq!(store.len(), 1);
        assert_eq!(store.snapshot().len(), 1);

        assert!(matches!(store.get("key1"), Err(CacheError::Expired(_))));
        assert!(store.is_empty());
        assert!(matches!(store.get("key1"), Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_store_sliding_refresh() {
        let (store, clock) = store();

        let p = policy(&store, Expiration::Sliding, 5);
        store.set("key1".to_string(), Arc::new("value1".to_string()), p);

        clock.advance_minutes(4);
        assert!(store.get("key1").is_ok());
        clock.advance_minutes(4);
        assert!(store.get("key1").is_ok());
        clock.advance_minutes(5);
        assert!(matches!(store.get("key1"), Err(CacheError::Expired(_))));
    }

    #[test]
    fn test_store_contains_does_not_refresh() {
        let (store, clock) = store();

        let p = policy(&store, Expiration::Sliding, 5);
        store.set("key1".to_string(), Arc::new(1u8), p);

        clock.advance_minutes(4);
        assert!(store.contains("key1"));
        clock.advance_minutes(1);
        assert!(!store.contains("key1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_remove() {
        let (store, _) = store();

        let p = policy(&store, Expiration::Absolute, 5);
        store.set("key1".to_string(), Arc::new(1u8), p);

        assert!(store.remove("key1"));
        assert!(!store.remove("key1"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_remove_all_skips_absent() {
        let (store, _) = store();

        for key in ["a", "b", "c"] {
            let p = policy(&store, Expiration::Absolute, 5);
            store.set(key.to_string(), Arc::new(1u8), p);
        }

        assert_eq!(store.remove_all(["a", "c", "missing"]), 2);
        assert_eq!(store.keys_matching(|_| true), vec!["b".to_string()]);
    }

    #[test]
    fn test_store_clear_keeps_store_usable() {
        let (store, _) = store();

        let p = policy(&store, Expiration::Absolute, 5);
        store.set("key1".to_string(), Arc::new(1u8), p);

        assert_eq!(store.clear(), 1);
        assert_eq!(store.clear(), 0);
        assert!(store.is_empty());

        store.set("key2".to_string(), Arc::new(2u8), p);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_snapshot_projects_grouping() {
        let (store, _) = store();

        let p = policy(&store, Expiration::Absolute, 5);
        store.set("area|owner".to_string(), Arc::new(1u8), p);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].key(), "area|owner");
        assert_eq!(snapshot[0].area(), Some("area"));
        assert_eq!(snapshot[0].owner(), Some("owner"));
        assert_eq!(snapshot[0].expires_at(), p.expires_at());
    }

    #[test]
    fn test_store_purge_expired() {
        let (store, clock) = store();

        let short = policy(&store, Expiration::Absolute, 1);
        let long = policy(&store, Expiration::Absolute, 10);
        store.set("key1".to_string(), Arc::new(1u8), short);
        store.set("key2".to_string(), Arc::new(2u8), long);

        clock.advance_minutes(2);

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("key2").is_ok());
    }

    #[test]
    fn test_store_stats() {
        let (store, clock) = store();

        let p = policy(&store, Expiration::Absolute, 1);
        store.set("key1".to_string(), Arc::new(1u8), p);
        store.get("key1").unwrap(); // hit
        let _ = store.get("nonexistent"); // miss
        clock.advance_minutes(1);
        let _ = store.get("key1"); // miss, expired

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.total_entries, 0);
    }
}
