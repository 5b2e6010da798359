//! Nonce generation
//!
//! Bitstamp rejects a request whose nonce it has already seen for the same
//! API key. The default strategy is a random UUID v4; [`sequential_nonce`]
//! is available for callers that prefer increasing values.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use crate::timing::timestamp_ms;

/// Process-wide counter for [`sequential_nonce`]
static NONCE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a random nonce: a hyphenated UUID v4, 36 characters
pub fn generate_nonce() -> String {
    Uuid::new_v4().to_string()
}

/// Generate a numeric nonce that is unique within the process.
///
/// Millisecond timestamp followed by a zero-padded six digit counter. The
/// counter wraps at one million and the wall clock can step backwards, so
/// values are not guaranteed to increase.
pub fn sequential_nonce() -> String {
    let counter = NONCE_COUNTER.fetch_add(1, Ordering::SeqCst) % 1_000_000;
    format!("{}{counter:06}", timestamp_ms())
}
