#[cfg(feature = "test-adapters")]
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use url::Url;

use tasa_core::{Observation, TasaError, UnitTransform};
use tasa_middleware::retry::{Failure, is_transient_status, with_backoff};
use tasa_types::BackoffConfig;

const CONNECTOR: &str = "tasa-fred";
const DEFAULT_BASE_URL: &str = "https://api.stlouisfed.org/";
const OBSERVATIONS_PATH: &str = "fred/series/observations";
const API_KEY_VAR: &str = "FRED_API_KEY";

/// Observations abstraction (so we can inject mocks in tests).
#[async_trait]
pub trait FredObservations: Send + Sync {
    /// Fetch observations for `series_id` from `start`, with `units`
    /// computed server-side.
    async fn observations(
        &self,
        series_id: &str,
        start: NaiveDate,
        units: UnitTransform,
    ) -> Result<Vec<Observation>, TasaError>;
}

/// Production adapter speaking the FRED REST API over `reqwest`.
///
/// `reqwest::Client` is `Clone + Send + Sync`, so no external locking is needed.
#[derive(Clone)]
pub struct RealAdapter {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    backoff: BackoffConfig,
}

impl std::fmt::Debug for RealAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealAdapter")
            .field("base_url", &self.base_url.as_str())
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}

impl RealAdapter {
    /// Adapter for the public FRED endpoint.
    ///
    /// # Errors
    /// Returns a connector error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, TasaError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("tasa-fred/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TasaError::connector(CONNECTOR, format!("http client: {e}")))?;
        let base_url = Url::parse(DEFAULT_BASE_URL)
            .map_err(|e| TasaError::InvalidArg(format!("base url: {e}")))?;
        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
            backoff: BackoffConfig::default(),
        })
    }

    /// Adapter keyed from the `FRED_API_KEY` environment variable.
    ///
    /// # Errors
    /// Returns `Auth` when the variable is unset or blank.
    pub fn from_env() -> Result<Self, TasaError> {
        match std::env::var(API_KEY_VAR) {
            Ok(key) if !key.trim().is_empty() => Self::new(key.trim()),
            _ => Err(TasaError::auth(CONNECTOR, format!("{API_KEY_VAR} is not set"))),
        }
    }

    /// Point the adapter at another host (proxies, test servers).
    ///
    /// # Errors
    /// Returns `InvalidArg` if `base_url` does not parse.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, TasaError> {
        let mut url =
            Url::parse(base_url).map_err(|e| TasaError::InvalidArg(format!("base url: {e}")))?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        self.base_url = url;
        Ok(self)
    }

    /// Replace the retry policy.
    #[must_use]
    pub const fn with_backoff(mut self, backoff: BackoffConfig) -> Self {
        self.backoff = backoff;
        self
    }

    /// Replace the HTTP client.
    #[must_use]
    pub fn with_http(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    async fn get_once(
        &self,
        url: &Url,
        series_id: &str,
        start: NaiveDate,
        units: UnitTransform,
    ) -> Result<Vec<Observation>, Failure> {
        let start = start.format("%Y-%m-%d").to_string();
        let resp = self
            .http
            .get(url.clone())
            .query(&[
                ("series_id", series_id),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("observation_start", start.as_str()),
                ("units", units.fred_code()),
            ])
            .send()
            .await
            .map_err(|e| Failure::Transient(TasaError::connector(CONNECTOR, e.to_string())))?;

        let status = resp.status().as_u16();
        if resp.status().is_success() {
            let body: ObservationsBody = resp.json().await.map_err(|e| {
                Failure::Permanent(TasaError::Data(format!("{series_id}: malformed body: {e}")))
            })?;
            return parse_observations(series_id, body.observations).map_err(Failure::Permanent);
        }
        let text = resp.text().await.unwrap_or_default();
        Err(map_status(status, &text, series_id))
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsBody {
    #[serde(default)]
    observations: Vec<RawObservation>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    date: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error_message: String,
}

fn parse_observations(series_id: &str, raw: Vec<RawObservation>) -> Result<Vec<Observation>, TasaError> {
    raw.into_iter()
        .map(|o| {
            let date = NaiveDate::parse_from_str(&o.date, "%Y-%m-%d")
                .map_err(|e| TasaError::Data(format!("{series_id}: bad date '{}': {e}", o.date)))?;
            // FRED marks missing observations with ".".
            let value = match o.value.trim() {
                "." | "" => None,
                v => v.parse::<f64>().ok(),
            };
            Ok(Observation { date, value })
        })
        .collect()
}

fn map_status(status: u16, body: &str, series_id: &str) -> Failure {
    let msg = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error_message)
        .unwrap_or_else(|_| body.trim().to_string());
    if is_transient_status(status) {
        return Failure::Transient(TasaError::connector(
            CONNECTOR,
            format!("status {status}: {msg}"),
        ));
    }
    let lower = msg.to_ascii_lowercase();
    if status == 401 || status == 403 || lower.contains("api_key") {
        Failure::Permanent(TasaError::auth(CONNECTOR, msg))
    } else if status == 404 || lower.contains("does not exist") {
        Failure::Permanent(TasaError::not_found(format!("series {series_id}")))
    } else {
        Failure::Permanent(TasaError::connector(
            CONNECTOR,
            format!("status {status}: {msg}"),
        ))
    }
}

#[async_trait]
impl FredObservations for RealAdapter {
    async fn observations(
        &self,
        series_id: &str,
        start: NaiveDate,
        units: UnitTransform,
    ) -> Result<Vec<Observation>, TasaError> {
        let url = self
            .base_url
            .join(OBSERVATIONS_PATH)
            .map_err(|e| TasaError::InvalidArg(format!("observations url: {e}")))?;
        with_backoff(&self.backoff, series_id, || {
            self.get_once(&url, series_id, start, units)
        })
        .await
    }
}

/* -------- Test-only lightweight adapter constructors ------- */

#[cfg(feature = "test-adapters")]
impl dyn FredObservations {
    /// Build a `FredObservations` from a closure (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn FredObservations>
    where
        F: Send
            + Sync
            + 'static
            + Fn(String, NaiveDate, UnitTransform) -> Result<Vec<Observation>, TasaError>,
    {
        struct FnObs<F>(F);
        #[async_trait]
        impl<F> FredObservations for FnObs<F>
        where
            F: Send
                + Sync
                + 'static
                + Fn(String, NaiveDate, UnitTransform) -> Result<Vec<Observation>, TasaError>,
        {
            async fn observations(
                &self,
                series_id: &str,
                start: NaiveDate,
                units: UnitTransform,
            ) -> Result<Vec<Observation>, TasaError> {
                (self.0)(series_id.to_string(), start, units)
            }
        }
        Arc::new(FnObs(f))
    }
}
