use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use moka::future::Cache;
use tasa_core::connector::{FetchRequest, SeriesProvider, TasaConnector};
use tasa_core::{Series, SourceKind, TasaError, UnitTransform};
use tasa_types::CacheConfig;

/// Cache identity: the ordered code set plus the request parameters.
///
/// `fallback` separates `fetch_any` results from plain `fetch` results, which
/// may legitimately be empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SeriesKey {
    codes: Vec<String>,
    start: NaiveDate,
    unit: UnitTransform,
    fallback: bool,
}

impl SeriesKey {
    fn new(codes: &[String], req: &FetchRequest, fallback: bool) -> Self {
        Self {
            codes: codes.to_vec(),
            start: req.start,
            unit: req.unit,
            fallback,
        }
    }
}

/// Middleware descriptor that installs a [`CachingConnector`].
pub struct CacheMiddleware {
    cfg: CacheConfig,
}

impl CacheMiddleware {
    /// Create a cache layer with `cfg`.
    #[must_use]
    pub const fn new(cfg: CacheConfig) -> Self {
        Self { cfg }
    }
}

impl tasa_core::Middleware for CacheMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn TasaConnector>) -> Arc<dyn TasaConnector> {
        Arc::new(CachingConnector::new(inner, &self.cfg))
    }

    fn name(&self) -> &'static str {
        "CachingMiddleware"
    }

    fn config_json(&self) -> serde_json::Value {
        serde_json::json!({
            "ttl_ms": u64::try_from(self.cfg.ttl.as_millis()).unwrap_or(u64::MAX),
            "max_entries": self.cfg.max_entries,
        })
    }
}

/// Read-through TTL cache around a connector's series capability.
///
/// Only successful fetches are stored; failures always reach the inner
/// connector again on the next call. Concurrent misses on the same key are
/// coalesced into one upstream call.
pub struct CachingConnector {
    inner: Arc<dyn TasaConnector>,
    store: Option<Cache<SeriesKey, Arc<Series>>>,
}

impl CachingConnector {
    /// Wrap `inner`. A zero TTL or zero capacity disables storage.
    #[must_use]
    pub fn new(inner: Arc<dyn TasaConnector>, cfg: &CacheConfig) -> Self {
        let store = (!cfg.is_disabled()).then(|| {
            Cache::builder()
                .max_capacity(cfg.max_entries)
                .time_to_live(cfg.ttl)
                .build()
        });
        Self { inner, store }
    }

    fn provider(&self) -> Result<&dyn SeriesProvider, TasaError> {
        self.inner
            .as_series_provider()
            .ok_or_else(|| TasaError::unsupported("series"))
    }

    async fn read_through<F>(&self, key: SeriesKey, load: F) -> Result<Series, TasaError>
    where
        F: std::future::Future<Output = Result<Series, TasaError>> + Send,
    {
        let Some(store) = &self.store else {
            return load.await;
        };
        store
            .try_get_with(key, async move { load.await.map(Arc::new) })
            .await
            .map(|s| (*s).clone())
            .map_err(|e| (*e).clone())
    }
}

impl TasaConnector for CachingConnector {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn vendor(&self) -> &'static str {
        self.inner.vendor()
    }

    fn source_kind(&self) -> SourceKind {
        self.inner.source_kind()
    }

    fn supports_server_transform(&self, unit: UnitTransform) -> bool {
        self.inner.supports_server_transform(unit)
    }

    fn as_series_provider(&self) -> Option<&dyn SeriesProvider> {
        if self.inner.as_series_provider().is_some() {
            Some(self as &dyn SeriesProvider)
        } else {
            None
        }
    }
}

#[async_trait]
impl SeriesProvider for CachingConnector {
    async fn fetch(&self, code: &str, req: &FetchRequest) -> Result<Series, TasaError> {
        let inner = self.provider()?;
        let key = SeriesKey::new(&[code.to_string()], req, false);
        self.read_through(key, inner.fetch(code, req)).await
    }

    async fn fetch_any(&self, codes: &[String], req: &FetchRequest) -> Result<Series, TasaError> {
        let inner = self.provider()?;
        let key = SeriesKey::new(codes, req, true);
        self.read_through(key, inner.fetch_any(codes, req)).await
    }
}
