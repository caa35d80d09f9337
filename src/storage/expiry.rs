//! Expiry Module
//!
//! Caller-facing expiration policy, resolved to an absolute timestamp when
//! an object is stored.

use chrono::{DateTime, Utc};

use crate::storage::entry::current_timestamp_ms;

// == Expiry ==
/// When a stored object becomes eligible for removal.
///
/// Relative policies are resolved against the wall clock at store time;
/// the backend records only the resulting absolute timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expiry {
    /// The object never expires
    #[default]
    Never,
    /// The object expires the given number of seconds after it is stored
    Seconds(u64),
    /// The object expires at the given wall-clock instant
    Date(DateTime<Utc>),
}

impl Expiry {
    // == Resolve ==
    /// Resolves the policy to an absolute expiration timestamp in Unix
    /// milliseconds, or None for [`Expiry::Never`].
    pub fn expires_at_ms(&self) -> Option<u64> {
        match self {
            Expiry::Never => None,
            Expiry::Seconds(ttl) => Some(current_timestamp_ms() + ttl * 1000),
            // Dates before the epoch clamp to 0 and are immediately expired
            Expiry::Date(date) => Some(date.timestamp_millis().max(0) as u64),
        }
    }
}
