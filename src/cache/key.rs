//! Key Parser Module
//!
//! Derives the area and owner grouping from a structured cache key.
//! Keys are split on the last occurrence of [`KEY_SEPARATOR`], so an area
//! may itself contain the separator while an owner never does.

use crate::cache::KEY_SEPARATOR;

/// Splits a key into `(area, owner)` on its last separator.
///
/// Returns None for empty keys and keys without a separator.
pub fn split(key: &str) -> Option<(&str, &str)> {
    key.rsplit_once(KEY_SEPARATOR)
}

/// Returns everything before the last separator.
pub fn area(key: &str) -> Option<&str> {
    split(key).map(|(area, _)| area)
}

/// Returns everything after the last separator.
pub fn owner(key: &str) -> Option<&str> {
    split(key).map(|(_, owner)| owner)
}
