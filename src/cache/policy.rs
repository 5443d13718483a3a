//! Expiration Policy Module
//!
//! Absolute and sliding expiration, evaluated lazily against a clock reading.

use chrono::{DateTime, TimeDelta, Utc};

// == Expiration Mode ==
/// Which kind of policy a freshly stored entry receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expiration {
    /// Expire at `now + ttl`, regardless of reads
    #[default]
    Absolute,
    /// Expire `ttl` after the last successful read
    Sliding,
}

// == Expiration Policy ==
/// The policy attached to one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpirationPolicy {
    /// Expires at a fixed instant.
    Absolute { expires_at: DateTime<Utc> },
    /// Expires `window` after `last_access`; reads push `last_access` forward.
    Sliding {
        window: TimeDelta,
        last_access: DateTime<Utc>,
    },
}

impl ExpirationPolicy {
    /// Builds a policy of the given mode starting at `now`.
    pub fn new(mode: Expiration, ttl_minutes: i64, now: DateTime<Utc>) -> Self {
        let ttl = minutes(ttl_minutes);
        match mode {
            Expiration::Absolute => Self::absolute(now, ttl),
            Expiration::Sliding => Self::sliding(now, ttl),
        }
    }

    pub fn absolute(now: DateTime<Utc>, ttl: TimeDelta) -> Self {
        Self::Absolute {
            expires_at: offset(now, ttl),
        }
    }

    pub fn sliding(now: DateTime<Utc>, window: TimeDelta) -> Self {
        Self::Sliding {
            window,
            last_access: now,
        }
    }

    // == Deadline ==
    /// Instant at which the entry expires unless touched first.
    pub fn expires_at(&self) -> DateTime<Utc> {
        match *self {
            Self::Absolute { expires_at } => expires_at,
            Self::Sliding {
                window,
                last_access,
            } => offset(last_access, window),
        }
    }

    // == Is Expired ==
    /// Checks the policy against `now`.
    ///
    /// Boundary condition: an entry is expired once `now` reaches the deadline,
    /// so a zero or negative TTL produces an entry that is already expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }

    // == Touch ==
    /// Records a successful read. Only sliding policies change.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if let Self::Sliding { last_access, .. } = self {
            *last_access = now;
        }
    }

    pub fn is_sliding(&self) -> bool {
        matches!(self, Self::Sliding { .. })
    }
}

// == Utility Functions ==
/// Whole minutes as a TimeDelta, saturating at the representable range.
fn minutes(ttl_minutes: i64) -> TimeDelta {
    TimeDelta::try_minutes(ttl_minutes).unwrap_or(if ttl_minutes < 0 {
        TimeDelta::MIN
    } else {
        TimeDelta::MAX
    })
}

/// `at + delta`, saturating at the representable instants.
fn offset(at: DateTime<Utc>, delta: TimeDelta) -> DateTime<Utc> {
    at.checked_add_signed(delta).unwrap_or(if delta < TimeDelta::zero() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}
