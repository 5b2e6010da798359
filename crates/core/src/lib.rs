//! # Bitstamp Core
//!
//! Shared building blocks for the Bitstamp HTTP client.
//!
//! ## Contents
//!
//! 1. **Unified logging** - tracing subscriber with `RUST_LOG` filtering
//! 2. **Wire timestamps** - milliseconds since the Unix epoch, UTC, as the API expects
//! 3. **Nonce generation** - random UUIDs per request, or a sequential strategy
//! 4. **Timing** - nanosecond timestamps for request latency logging

pub mod logging;
pub mod nonce;
pub mod timing;

// Re-export commonly used items
pub use logging::init_logging;
pub use nonce::{generate_nonce, sequential_nonce};
pub use timing::{nanos, timestamp, timestamp_ms, Timestamp};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::logging::init_logging;
    pub use crate::nonce::{generate_nonce, sequential_nonce};
    pub use crate::timing::{nanos, timestamp, timestamp_ms, Timestamp};
}
