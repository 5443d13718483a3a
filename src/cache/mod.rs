//! Cache Module
//!
//! Provides in-memory caching with absolute and sliding expiration and
//! grouped eviction by the area or owner encoded in keys.

mod clock;
mod engine;
mod entry;
pub mod key;
mod object;
mod policy;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{CacheEngine, GroupBy, IntoProduced};
pub use entry::{CacheEntry, CacheValue};
pub use object::CacheObject;
pub use policy::{Expiration, ExpirationPolicy};
pub use stats::CacheStats;
pub use store::EntryStore;

// == Public Constants ==
/// Separates the area from the owner in a structured key, e.g. `"reports|alice"`.
pub const KEY_SEPARATOR: char = '|';
