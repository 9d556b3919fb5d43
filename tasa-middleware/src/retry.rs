use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tasa_types::{BackoffConfig, TasaError};

/// Outcome of one failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// Worth retrying: transport errors, HTTP 429, HTTP 5xx.
    Transient(TasaError),
    /// Retrying will not help: auth, not found, malformed payloads.
    Permanent(TasaError),
}

impl Failure {
    /// The underlying error.
    #[must_use]
    pub fn into_inner(self) -> TasaError {
        match self {
            Self::Transient(e) | Self::Permanent(e) => e,
        }
    }
}

/// HTTP statuses that warrant a retry.
#[must_use]
pub const fn is_transient_status(status: u16) -> bool {
    status == 429 || status >= 500
}

/// Base delay plus up to `jitter_percent` percent of random extra wait.
#[must_use]
pub fn jitter_wait(base_ms: u64, jitter_percent: u8) -> u64 {
    let jitter_range = if jitter_percent == 0 {
        1
    } else {
        std::cmp::max(1, base_ms.saturating_mul(u64::from(jitter_percent.min(100))) / 100)
    };
    let mut rng = rand::rng();
    base_ms + rng.random_range(0..jitter_range)
}

/// Run `op` until it succeeds, fails permanently, or `cfg.max_retries`
/// retries are spent. The last error is returned.
///
/// # Errors
/// Returns the error of the final failed attempt.
pub async fn with_backoff<T, F, Fut>(cfg: &BackoffConfig, what: &str, mut op: F) -> Result<T, TasaError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Failure>>,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(Failure::Permanent(e)) => return Err(e),
            Err(Failure::Transient(e)) => {
                if attempt >= cfg.max_retries {
                    return Err(e);
                }
                let base = u64::try_from(cfg.base_delay(attempt).as_millis()).unwrap_or(u64::MAX);
                let wait = jitter_wait(base, cfg.jitter_percent);
                tracing::warn!(what, attempt = attempt + 1, wait_ms = wait, error = %e, "transient failure; retrying");
                tokio::time::sleep(Duration::from_millis(wait)).await;
                attempt += 1;
            }
        }
    }
}
