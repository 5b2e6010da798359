//! Auto-rounding of prices and amounts
//!
//! Bitstamp rejects values with more decimal places than a pair allows. With
//! auto-rounding enabled the client truncates such values instead of letting
//! the request fail.

use crate::config::HttpClientConfig;
use rust_decimal::{Decimal, RoundingStrategy};

/// Truncate `value` towards zero to `decimals` places.
///
/// Truncation never rounds an amount up past what the account holds.
pub fn truncate(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp_with_strategy(decimals, RoundingStrategy::ToZero)
}

impl HttpClientConfig {
    /// Apply auto-rounding to `value` if enabled, otherwise return it as is
    pub fn round_amount(&self, value: Decimal, decimals: u32) -> Decimal {
        if self.auto_rounding() {
            truncate(value, decimals)
        } else {
            value
        }
    }
}
