//! Cache Object Module
//!
//! Read-only projection of a stored entry, used by enumeration and filtered removal.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::cache::entry::CacheValue;
use crate::cache::key;

// == Cache Object ==
/// A point-in-time view of one entry: its key, value and derived grouping.
#[derive(Clone)]
pub struct CacheObject {
    key: String,
    value: CacheValue,
    expires_at: DateTime<Utc>,
    area: Option<String>,
    owner: Option<String>,
}

impl CacheObject {
    /// Projects an entry, deriving area and owner from the key.
    pub fn new(key: impl Into<String>, value: CacheValue, expires_at: DateTime<Utc>) -> Self {
        let key = key.into();
        let (area, owner) = match key::split(&key) {
            Some((area, owner)) => (Some(area.to_string()), Some(owner.to_string())),
            None => (None, None),
        };
        Self {
            key,
            value,
            expires_at,
            area,
            owner,
        }
    }

    /// Replaces the derived grouping with explicit values.
    pub fn with_grouping(mut self, area: Option<String>, owner: Option<String>) -> Self {
        self.area = area;
        self.owner = owner;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The untyped payload.
    pub fn value(&self) -> &CacheValue {
        &self.value
    }

    /// The payload as `T`, or None if it holds another type.
    pub fn value_as<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Everything before the last separator, None if the key has no separator.
    pub fn area(&self) -> Option<&str> {
        self.area.as_deref()
    }

    /// Everything after the last separator, None if the key has no separator.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Deadline of the entry's policy when the snapshot was taken.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub(crate) fn into_key(self) -> String {
        self.key
    }
}

impl fmt::Debug for CacheObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheObject")
            .field("key", &self.key)
            .field("area", &self.area)
            .field("owner", &self.owner)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

impl PartialEq for CacheObject {
    /// Two projections are equal when they describe the same stored value.
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && Arc::ptr_eq(&self.value, &other.value)
            && self.expires_at == other.expires_at
            && self.area == other.area
            && self.owner == other.owner
    }
}
