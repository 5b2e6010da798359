//! Nonce, timestamp and option-ordering properties
//!
//! Property-based tests with proptest plus a few sampled checks.

use bitstamp_core::{generate_nonce, sequential_nonce, timestamp_ms};
use bitstamp_http::prelude::*;
use proptest::prelude::*;
use std::collections::HashSet;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

fn wall_clock_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}

// ============================================================================
// NONCES
// ============================================================================

#[test]
fn test_default_nonce_unique_over_samples() {
    let config = HttpClientConfig::default();
    let mut seen = HashSet::with_capacity(10_000);

    for _ in 0..10_000 {
        assert!(seen.insert(config.nonce()), "nonce collision");
    }
}

#[test]
fn test_consecutive_default_nonces_differ() {
    let config = HttpClientConfig::default();
    for _ in 0..1_000 {
        assert_ne!(config.nonce(), config.nonce());
    }
}

#[test]
fn test_default_nonce_is_uuid_shaped() {
    let nonce = HttpClientConfig::default().nonce();

    assert_eq!(nonce.len(), 36);
    assert_eq!(nonce.matches('-').count(), 4);
    assert!(nonce.chars().all(|c| c.is_ascii_hexdigit() || c == '-'));
    assert_ne!(nonce, generate_nonce());
}

#[test]
fn test_sequential_nonce_strategy() {
    let config = HttpClientConfig::build([nonce_generator(sequential_nonce)]);

    let nonces: Vec<String> = (0..100).map(|_| config.nonce()).collect();
    let unique: HashSet<_> = nonces.iter().collect();
    assert_eq!(unique.len(), nonces.len());
    assert!(nonces.iter().all(|n| n.chars().all(|c| c.is_ascii_digit())));
}

// ============================================================================
// TIMESTAMPS
// ============================================================================

#[test]
fn test_timestamp_digits_only_and_near_wall_clock() {
    let config = HttpClientConfig::default();

    for _ in 0..100 {
        let before = wall_clock_ms();
        let ts = config.timestamp();
        let after = wall_clock_ms();

        assert!(ts.chars().all(|c| c.is_ascii_digit()), "timestamp {ts} not digits only");
        let value: i64 = ts.parse().unwrap();
        assert!(
            value >= before - 2000 && value <= after + 2000,
            "timestamp {value} outside [{before}, {after}] ± 2s"
        );
    }
}

#[test]
fn test_timestamp_not_affected_by_options() {
    let config = HttpClientConfig::build([
        nonce_generator(|| "0".to_string()),
        request_timeout(Duration::ZERO),
        auto_rounding_enabled(),
    ]);
    let value: u64 = config.timestamp().parse().unwrap();

    assert!(value.abs_diff(timestamp_ms()) <= 2000);
}

// ============================================================================
// PROPERTIES
// ============================================================================

fn host_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z][a-z0-9]{0,10}", 1..4).prop_map(|labels| labels.join("."))
}

fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-zA-Z0-9_-]{1,8}", 0..4).prop_map(|segments| {
        if segments.is_empty() {
            String::new()
        } else {
            format!("/{}", segments.join("/"))
        }
    })
}

proptest! {
    #[test]
    fn prop_url_domain_round_trips(host in host_strategy(), path in path_strategy(), port in prop::option::of(1024u16..65535)) {
        let raw = match port {
            Some(port) => format!("https://{host}:{port}{path}"),
            None => format!("https://{host}{path}"),
        };
        let config = HttpClientConfig::build([url_domain(&raw)]);
        let expected = url::Url::parse(&raw).unwrap();

        prop_assert_eq!(config.domain(), &expected);
        prop_assert_eq!(config.domain().host_str(), Some(host.as_str()));
    }

    #[test]
    fn prop_credentials_last_write_wins(pairs in prop::collection::vec(("[a-zA-Z0-9]{0,16}", "[a-zA-Z0-9]{0,16}"), 1..8)) {
        let options: Vec<HttpOption> = pairs
            .iter()
            .map(|(key, secret)| credentials(key.clone(), secret.clone()))
            .collect();
        let config = HttpClientConfig::build(options);
        let (last_key, last_secret) = pairs.last().unwrap();

        prop_assert_eq!(config.api_key(), last_key.as_str());
        prop_assert_eq!(config.api_secret(), last_secret.as_str());
    }

    #[test]
    fn prop_timeout_last_write_wins(millis in prop::collection::vec(0u64..120_000, 1..8)) {
        let config = HttpClientConfig::build(
            millis.iter().map(|ms| request_timeout(Duration::from_millis(*ms))),
        );

        prop_assert_eq!(config.request_timeout(), Duration::from_millis(*millis.last().unwrap()));
    }

    #[test]
    fn prop_auto_rounding_is_sticky(count in 1usize..5) {
        let config = HttpClientConfig::build((0..count).map(|_| auto_rounding_enabled()));
        prop_assert!(config.auto_rounding());
    }
}
