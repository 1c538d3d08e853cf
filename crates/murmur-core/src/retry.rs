//! Retry configuration and backoff calculation for the upload step.
//!
//! The pipeline ships with retries disabled — a failed upload fails the
//! job, matching the service-call semantics the rest of the design assumes
//! — but the policy is explicit and configurable rather than an implicit
//! absence. Only retryable API errors (rate limit, server, network) are
//! ever retried; the async sleep loop lives in `murmur-client`, while this
//! module contains the portable, sync-only building blocks.

use serde::{Deserialize, Serialize};

/// Default maximum retries (retries disabled).
pub const DEFAULT_MAX_RETRIES: u32 = 0;
/// Default base delay in milliseconds.
pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;
/// Default maximum delay in milliseconds.
pub const DEFAULT_MAX_DELAY_MS: u64 = 60_000;
/// Default jitter factor (0.0–1.0).
pub const DEFAULT_JITTER_FACTOR: f64 = 0.2;

/// Configuration for upload retry logic.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (default: 0 — disabled).
    pub max_retries: u32,
    /// Base delay for exponential backoff in ms (default: 1000).
    pub base_delay_ms: u64,
    /// Maximum delay between retries in ms (default: 60000).
    pub max_delay_ms: u64,
    /// Jitter factor 0.0–1.0 (default: 0.2).
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            jitter_factor: DEFAULT_JITTER_FACTOR,
        }
    }
}

impl RetryConfig {
    /// Whether any retries are configured.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.max_retries > 0
    }
}

/// Calculate exponential backoff delay with explicit randomness.
///
/// Formula: `min(max_delay, base_delay * 2^attempt) * (1 + (random*2-1) * jitter)`
///
/// `random` should be a value in `[0.0, 1.0)` from a PRNG; 0.5 yields the
/// unjittered delay.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn backoff_delay_ms(
    attempt: u32,
    base_delay_ms: u64,
    max_delay_ms: u64,
    jitter_factor: f64,
    random: f64,
) -> u64 {
    let exponential = base_delay_ms.saturating_mul(1u64 << attempt.min(31));
    let capped = exponential.min(max_delay_ms);

    // Maps random [0,1) to [-jitter, +jitter]
    let jitter = 1.0 + (random * 2.0 - 1.0) * jitter_factor;
    let with_jitter = (capped as f64) * jitter;

    with_jitter.round().max(0.0) as u64
}

/// Parse a `Retry-After` HTTP header value.
///
/// The value can be either a number of seconds (e.g. `"120"`) or an
/// HTTP-date. Returns the delay in milliseconds, or `None` if parsing
/// fails.
#[must_use]
pub fn parse_retry_after_header(value: &str) -> Option<u64> {
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(seconds * 1000);
    }

    if let Ok(date) = chrono::DateTime::parse_from_rfc2822(value) {
        let now = chrono::Utc::now();
        let delay_ms = date.signed_duration_since(now).num_milliseconds();
        return Some(if delay_ms > 0 {
            #[allow(clippy::cast_sign_loss)]
            let ms = delay_ms as u64;
            ms
        } else {
            0
        });
    }

    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
