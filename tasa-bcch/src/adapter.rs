#[cfg(feature = "test-adapters")]
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use url::Url;

use tasa_core::{Observation, TasaError, parse_decimal};
use tasa_middleware::retry::{Failure, is_transient_status, with_backoff};
use tasa_types::BackoffConfig;

const CONNECTOR: &str = "tasa-bcch";
const DEFAULT_ENDPOINT: &str = "https://si3.bcentral.cl/SieteRestWS/SieteRestWS.ashx";
const USER_VAR: &str = "BCCH_USER";
const PASS_VAR: &str = "BCCH_PASS";

/// Series abstraction (so we can inject mocks in tests).
#[async_trait]
pub trait SieteSeries: Send + Sync {
    /// Fetch level observations for `series_id` from `start` onwards.
    async fn get_series(&self, series_id: &str, start: NaiveDate)
    -> Result<Vec<Observation>, TasaError>;
}

/// Production adapter for the SIETE `GetSeries` web service.
#[derive(Clone)]
pub struct RealAdapter {
    http: reqwest::Client,
    endpoint: Url,
    user: String,
    pass: String,
    backoff: BackoffConfig,
}

impl std::fmt::Debug for RealAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealAdapter")
            .field("endpoint", &self.endpoint.as_str())
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl RealAdapter {
    /// Adapter for the public SIETE endpoint.
    ///
    /// # Errors
    /// Returns a connector error if the HTTP client cannot be built.
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Result<Self, TasaError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("tasa-bcch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TasaError::connector(CONNECTOR, format!("http client: {e}")))?;
        let endpoint = Url::parse(DEFAULT_ENDPOINT)
            .map_err(|e| TasaError::InvalidArg(format!("endpoint: {e}")))?;
        Ok(Self {
            http,
            endpoint,
            user: user.into(),
            pass: pass.into(),
            backoff: BackoffConfig::default(),
        })
    }

    /// Adapter with credentials from `BCCH_USER` and `BCCH_PASS`.
    ///
    /// # Errors
    /// Returns `Auth` when either variable is unset or blank.
    pub fn from_env() -> Result<Self, TasaError> {
        let var = |k: &str| std::env::var(k).ok().filter(|v| !v.trim().is_empty());
        match (var(USER_VAR), var(PASS_VAR)) {
            (Some(user), Some(pass)) => Self::new(user, pass),
            _ => Err(TasaError::auth(
                CONNECTOR,
                format!("{USER_VAR} and {PASS_VAR} must be set"),
            )),
        }
    }

    /// Use another endpoint URL (proxies, test servers).
    ///
    /// # Errors
    /// Returns `InvalidArg` if `endpoint` does not parse.
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, TasaError> {
        self.endpoint =
            Url::parse(endpoint).map_err(|e| TasaError::InvalidArg(format!("endpoint: {e}")))?;
        Ok(self)
    }

    /// Replace the retry policy.
    #[must_use]
    pub const fn with_backoff(mut self, backoff: BackoffConfig) -> Self {
        self.backoff = backoff;
        self
    }

    async fn get_once(&self, series_id: &str, start: NaiveDate) -> Result<Vec<Observation>, Failure> {
        let first = start.format("%Y-%m-%d").to_string();
        let last = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
        let resp = self
            .http
            .get(self.endpoint.clone())
            .query(&[
                ("user", self.user.as_str()),
                ("pass", self.pass.as_str()),
                ("firstdate", first.as_str()),
                ("lastdate", last.as_str()),
                ("timeseries", series_id),
                ("function", "GetSeries"),
            ])
            .send()
            .await
            .map_err(|e| Failure::Transient(TasaError::connector(CONNECTOR, e.to_string())))?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let e = TasaError::connector(CONNECTOR, format!("status {status}"));
            return Err(if is_transient_status(status) {
                Failure::Transient(e)
            } else {
                Failure::Permanent(e)
            });
        }
        let body: GetSeriesBody = resp.json().await.map_err(|e| {
            Failure::Permanent(TasaError::Data(format!("{series_id}: malformed body: {e}")))
        })?;
        parse_body(series_id, body).map_err(Failure::Permanent)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetSeriesBody {
    codigo: i64,
    #[serde(default)]
    descripcion: String,
    #[serde(default)]
    series: Option<SeriesBody>,
}

#[derive(Debug, Deserialize)]
struct SeriesBody {
    #[serde(rename = "Obs", default)]
    obs: Option<Vec<RawObs>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawObs {
    index_date_string: String,
    value: String,
    #[serde(default)]
    status_code: Option<String>,
}

fn map_codigo(codigo: i64, descripcion: &str, series_id: &str) -> TasaError {
    let d = descripcion.to_ascii_lowercase();
    if d.contains("password") || d.contains("user") || d.contains("usuario") || d.contains("clave") {
        TasaError::auth(CONNECTOR, descripcion)
    } else if d.contains("not found")
        || d.contains("no existe")
        || d.contains("invalid series")
        || d.contains("does not exist")
    {
        TasaError::not_found(format!("series {series_id}"))
    } else {
        TasaError::connector(CONNECTOR, format!("code {codigo}: {descripcion}"))
    }
}

fn parse_body(series_id: &str, body: GetSeriesBody) -> Result<Vec<Observation>, TasaError> {
    if body.codigo != 0 {
        return Err(map_codigo(body.codigo, &body.descripcion, series_id));
    }
    let raw = body.series.and_then(|s| s.obs).unwrap_or_default();
    raw.into_iter()
        .map(|o| {
            let date = NaiveDate::parse_from_str(o.index_date_string.trim(), "%d-%m-%Y").map_err(|e| {
                TasaError::Data(format!("{series_id}: bad date '{}': {e}", o.index_date_string))
            })?;
            let ok = o
                .status_code
                .as_deref()
                .is_none_or(|s| s.eq_ignore_ascii_case("OK"));
            let value = if ok { parse_decimal(&o.value) } else { None };
            Ok(Observation { date, value })
        })
        .collect()
}

#[async_trait]
impl SieteSeries for RealAdapter {
    async fn get_series(
        &self,
        series_id: &str,
        start: NaiveDate,
    ) -> Result<Vec<Observation>, TasaError> {
        with_backoff(&self.backoff, series_id, || self.get_once(series_id, start)).await
    }
}

/* -------- Test-only lightweight adapter constructors ------- */

#[cfg(feature = "test-adapters")]
impl dyn SieteSeries {
    /// Build a `SieteSeries` from a closure (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn SieteSeries>
    where
        F: Send + Sync + 'static + Fn(String, NaiveDate) -> Result<Vec<Observation>, TasaError>,
    {
        struct FnSeries<F>(F);
        #[async_trait]
        impl<F> SieteSeries for FnSeries<F>
        where
            F: Send + Sync + 'static + Fn(String, NaiveDate) -> Result<Vec<Observation>, TasaError>,
        {
            async fn get_series(
                &self,
                series_id: &str,
                start: NaiveDate,
            ) -> Result<Vec<Observation>, TasaError> {
                (self.0)(series_id.to_string(), start)
            }
        }
        Arc::new(FnSeries(f))
    }
}
