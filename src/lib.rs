//! Area Cache - An in-process key/value cache
//!
//! Provides get-or-populate caching with absolute and sliding expiration,
//! plus bulk eviction by the area or owner encoded in structured keys.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{
    CacheEngine, CacheObject, CacheStats, Clock, EntryStore, Expiration, ExpirationPolicy,
    GroupBy, IntoProduced, ManualClock, SystemClock, KEY_SEPARATOR,
};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::{spawn_configured_sweeper, spawn_sweeper_task};
