//! Wire timestamps and latency measurement
//!
//! The Bitstamp API expects request timestamps as milliseconds since the
//! Unix epoch in UTC, rendered as a plain base-10 integer. [`timestamp`]
//! produces exactly that string.

use chrono::Utc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Current time in milliseconds since the Unix epoch (UTC)
#[inline]
pub fn timestamp_ms() -> u64 {
    // Clamp pre-epoch clocks to zero; the API never accepts negative values.
    Utc::now().timestamp_millis().max(0) as u64
}

/// Current time as the wire timestamp string: ASCII digits only, no separators
pub fn timestamp() -> String {
    timestamp_ms().to_string()
}

/// Nanoseconds since the Unix epoch
#[inline]
pub fn nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

/// Start point for latency measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    /// Nanoseconds since Unix epoch
    pub nanos: u64,
}

impl Timestamp {
    pub fn now() -> Self {
        Self { nanos: nanos() }
    }

    pub fn elapsed_nanos(&self) -> u64 {
        nanos().saturating_sub(self.nanos)
    }

    pub fn elapsed_micros(&self) -> u64 {
        self.elapsed_nanos() / 1_000
    }
}
