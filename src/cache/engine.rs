//! Cache Engine Module
//!
//! The public operation surface: get-or-populate, overwrite, refresh, and
//! single, batch, grouped and substring removal over a shared [`EntryStore`].

use std::any::{type_name, Any};
use std::borrow::Cow;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::cache::{
    CacheObject, CacheStats, Clock, EntryStore, Expiration, ExpirationPolicy, SystemClock,
};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Producer Output ==
/// Conversion from whatever a producer returns into "a value, or nothing".
///
/// `None` and `Err(_)` both mean no value: nothing is stored and the error is dropped.
pub trait IntoProduced<T> {
    fn into_produced(self) -> Option<T>;
}

impl<T> IntoProduced<T> for Option<T> {
    fn into_produced(self) -> Option<T> {
        self
    }
}

impl<T, E> IntoProduced<T> for std::result::Result<T, E> {
    fn into_produced(self) -> Option<T> {
        self.ok()
    }
}

// == Group Selector ==
/// Which half of a structured key a grouped removal matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    /// Everything before the last separator
    Area,
    /// Everything after the last separator
    Owner,
}

impl GroupBy {
    fn of(self, object: &CacheObject) -> Option<&str> {
        match self {
            GroupBy::Area => object.area(),
            GroupBy::Owner => object.owner(),
        }
    }
}

// == Cache Engine ==
/// Handle to one cache instance.
///
/// Cloning is cheap and every clone shares the same store, so construct one
/// engine at startup and hand clones to whatever needs caching.
#[derive(Debug, Clone)]
pub struct CacheEngine {
    store: Arc<EntryStore>,
    case_insensitive: bool,
}

impl CacheEngine {
    // == Constructors ==
    /// Creates an engine with the default configuration and the system clock.
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    /// Creates an engine from configuration, reading the system clock.
    pub fn from_config(config: &Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates an engine from configuration, reading the given clock.
    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Arc::new(EntryStore::with_clock(clock)),
            case_insensitive: config.case_insensitive_keys,
        }
    }

    fn normalize<'a>(&self, key: &'a str) -> Cow<'a, str> {
        if self.case_insensitive {
            Cow::Owned(key.to_lowercase())
        } else {
            Cow::Borrowed(key)
        }
    }

    fn policy(&self, expiration: Expiration, ttl_minutes: i64) -> ExpirationPolicy {
        ExpirationPolicy::new(expiration, ttl_minutes, self.store.now())
    }

    // == Get ==
    /// Looks up a live value of type `T` without populating.
    ///
    /// Sliding entries have their window reset by a successful read.
    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let key = self.normalize(key);
        let value = self.store.get(&key)?;
        downcast(&key, &*value)
    }

    /// Returns true if a live entry exists for `key`. Does not refresh sliding windows.
    pub fn contains(&self, key: &str) -> bool {
        self.store.contains(&self.normalize(key))
    }

    // == Get Or Populate ==
    /// Returns the cached value for `key`, producing and storing it on a miss.
    ///
    /// On a miss (absent, expired, or holding another type) `producer` runs
    /// outside the store lock. If it yields a value, that value is stored under
    /// a fresh policy and returned; if it yields `None` or `Err`, nothing is
    /// stored and None is returned. Concurrent misses on one key may each run
    /// their producer; the last write wins.
    pub fn get_or_populate<T, R, F>(
        &self,
        key: &str,
        ttl_minutes: i64,
        expiration: Expiration,
        producer: F,
    ) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> R,
        R: IntoProduced<T>,
    {
        let key = self.normalize(key);
        match self
            .store
            .get(&key)
            .and_then(|value| downcast::<T>(&key, &*value))
        {
            Ok(value) => return Some(value),
            Err(reason) => trace!(%reason, "cache miss, running producer"),
        }

        let produced = producer().into_produced();
        self.store.record_population(produced.is_some());
        let value = produced?;

        let policy = self.policy(expiration, ttl_minutes);
        self.store
            .set(key.into_owned(), Arc::new(value.clone()), policy);
        Some(value)
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any existing entry and its policy.
    pub fn set<T>(&self, key: &str, ttl_minutes: i64, expiration: Expiration, value: T)
    where
        T: Send + Sync + 'static,
    {
        let policy = self.policy(expiration, ttl_minutes);
        self.store
            .set(self.normalize(key).into_owned(), Arc::new(value), policy);
    }

    // == Refresh ==
    /// Drops any cached value for `key` and repopulates it from `producer`.
    pub fn refresh<T, R, F>(
        &self,
        key: &str,
        ttl_minutes: i64,
        expiration: Expiration,
        producer: F,
    ) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> R,
        R: IntoProduced<T>,
    {
        self.remove(key);
        self.get_or_populate(key, ttl_minutes, expiration, producer)
    }

    // == Remove ==
    /// Removes one entry. Absent keys are a no-op.
    pub fn remove(&self, key: &str) -> bool {
        self.store.remove(&self.normalize(key))
    }

    /// Removes every listed key, skipping absent ones.
    pub fn remove_many<I, S>(&self, keys: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: Vec<String> = keys
            .into_iter()
            .map(|key| self.normalize(key.as_ref()).into_owned())
            .collect();
        self.store.remove_all(&keys)
    }

    // == Clear All ==
    /// Empties the cache. The engine and every clone of it stay usable.
    pub fn clear_all(&self) -> usize {
        let count = self.store.clear();
        debug!(count, "cleared cache");
        count
    }

    // == Get All ==
    /// Snapshot of every stored entry with its derived area and owner.
    ///
    /// Entries that expired but were never looked up again still appear.
    pub fn get_all(&self) -> Vec<CacheObject> {
        self.store.snapshot()
    }

    // == Remove By Group ==
    /// Removes every entry whose area (or owner) equals `filter`, ignoring case.
    ///
    /// Always returns true, whether or not anything matched.
    pub fn remove_by_group(&self, filter: &str, group: GroupBy) -> bool {
        let filter = filter.to_lowercase();
        let keys: Vec<String> = self
            .store
            .snapshot()
            .into_iter()
            .filter(|object| group.of(object).is_some_and(|name| name.to_lowercase() == filter))
            .map(CacheObject::into_key)
            .collect();

        for key in &keys {
            self.store.remove(key);
        }
        debug!(?group, %filter, removed = keys.len(), "removed cache group");
        true
    }

    // == Remove By Substring ==
    /// Removes every entry whose key contains `pattern`, ignoring case.
    ///
    /// An empty pattern matches, and therefore removes, every key.
    pub fn remove_by_substring(&self, pattern: &str) -> usize {
        let pattern = pattern.to_lowercase();
        let keys = self
            .store
            .keys_matching(|key| key.to_lowercase().contains(&pattern));

        let removed = keys.iter().filter(|key| self.store.remove(key)).count();
        debug!(%pattern, removed, "removed cache keys by substring");
        removed
    }

    // == Maintenance ==
    /// Eagerly removes every expired entry. Returns the number removed.
    pub fn purge_expired(&self) -> usize {
        self.store.purge_expired()
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    /// Number of stored entries, expired-but-unpurged included.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl Default for CacheEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn downcast<T>(key: &str, value: &(dyn Any + Send + Sync)) -> Result<T>
where
    T: Clone + 'static,
{
    value
        .downcast_ref::<T>()
        .cloned()
        .ok_or_else(|| CacheError::TypeMismatch {
            key: key.to_string(),
            expected: type_name::<T>(),
        })
}
