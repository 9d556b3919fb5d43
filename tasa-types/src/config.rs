//! Configuration types shared across the orchestrator, middleware and connectors.

use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Exponential backoff used by HTTP adapters when retrying transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Minimum backoff delay in milliseconds.
    pub min_backoff_ms: u64,
    /// Maximum backoff delay in milliseconds.
    pub max_backoff_ms: u64,
    /// Exponential factor applied after each failure (>= 1).
    pub factor: u32,
    /// Random jitter percentage [0, 100] added to each delay.
    pub jitter_percent: u8,
    /// Retries after the first attempt. Zero disables retrying.
    pub max_retries: u32,
}

impl BackoffConfig {
    /// No retries at all.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            min_backoff_ms: 0,
            max_backoff_ms: 0,
            factor: 1,
            jitter_percent: 0,
            max_retries: 0,
        }
    }

    /// Delay before retry number `attempt` (0-based), without jitter.
    #[must_use]
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let factor = u64::from(self.factor.max(1));
        let mut ms = self.min_backoff_ms;
        for _ in 0..attempt {
            ms = ms.saturating_mul(factor);
            if ms >= self.max_backoff_ms {
                break;
            }
        }
        Duration::from_millis(ms.min(self.max_backoff_ms))
    }
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            min_backoff_ms: 250,
            max_backoff_ms: 4_000,
            factor: 2,
            jitter_percent: 20,
            max_retries: 2,
        }
    }
}

/// Read-through cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Time-to-live for each entry. `Duration::ZERO` disables caching.
    pub ttl: Duration,
    /// Maximum number of cached series.
    pub max_entries: u64,
}

impl CacheConfig {
    /// True when entries are never stored.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.ttl.is_zero() || self.max_entries == 0
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_entries: 1_024,
        }
    }
}

/// Global configuration for the `Tasa` orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasaConfig {
    /// Default history start for fetches.
    pub start_date: NaiveDate,
    /// Timeout for each individual connector call.
    pub provider_timeout: Duration,
    /// Optional deadline for a whole fetch fan-out.
    pub request_timeout: Option<Duration>,
    /// Forward-fill merged columns by default.
    pub forward_fill: bool,
    /// Earliest date shown in release tables.
    pub release_since: NaiveDate,
    /// Retry policy handed to HTTP adapters.
    pub backoff: BackoffConfig,
}

impl Default for TasaConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(1920, 1, 1).unwrap_or(NaiveDate::MIN),
            provider_timeout: Duration::from_secs(10),
            request_timeout: None,
            forward_fill: false,
            release_since: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or(NaiveDate::MIN),
            backoff: BackoffConfig::default(),
        }
    }
}
