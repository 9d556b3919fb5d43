use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tasa_core::{Catalog, SourceKind, TasaConfig, TasaConnector, TasaError};
use tasa_types::BackoffConfig;

/// Orchestrator that routes catalog series to connectors by source kind and
/// runs the transform-and-merge pipeline.
pub struct Tasa {
    pub(crate) connectors: Vec<Arc<dyn TasaConnector>>,
    pub(crate) catalog: Catalog,
    pub(crate) cfg: TasaConfig,
}

/// Builder for constructing a `Tasa` orchestrator with custom configuration.
pub struct TasaBuilder {
    connectors: Vec<Arc<dyn TasaConnector>>,
    catalog: Catalog,
    cfg: TasaConfig,
}

impl Default for TasaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TasaBuilder {
    /// Create a new builder with the default US macro catalog and default
    /// configuration.
    ///
    /// Starts with no connectors; register at least one via
    /// [`TasaBuilder::with_connector`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            connectors: vec![],
            catalog: Catalog::us_macro(),
            cfg: TasaConfig::default(),
        }
    }

    /// Register a connector.
    ///
    /// Catalog entries are routed to the first registered connector whose
    /// source kind matches theirs.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn TasaConnector>) -> Self {
        self.connectors.push(c);
        self
    }

    /// Replace the series catalog.
    #[must_use]
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: TasaConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Default history start for fetches.
    #[must_use]
    pub const fn start_date(mut self, start: NaiveDate) -> Self {
        self.cfg.start_date = start;
        self
    }

    /// Bound each connector call. Exceeding it yields `ProviderTimeout` for
    /// that series only.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Bound a whole fetch fan-out. Series still pending at the deadline are
    /// reported with `RequestTimeout`.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Forward-fill merged columns unless a request says otherwise.
    #[must_use]
    pub const fn forward_fill(mut self, yes: bool) -> Self {
        self.cfg.forward_fill = yes;
        self
    }

    /// Default earliest date for release tables.
    #[must_use]
    pub const fn release_since(mut self, since: NaiveDate) -> Self {
        self.cfg.release_since = since;
        self
    }

    /// Retry policy recorded for HTTP adapters built from this configuration.
    #[must_use]
    pub const fn backoff(mut self, cfg: BackoffConfig) -> Self {
        self.cfg.backoff = cfg;
        self
    }

    /// Build the `Tasa` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no connectors are registered, if two share a
    /// name, or if a connector claims the user-upload source kind.
    pub fn build(self) -> Result<Tasa, TasaError> {
        if self.connectors.is_empty() {
            return Err(TasaError::InvalidArg(
                "no connectors registered; add at least one via with_connector(...)".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for c in &self.connectors {
            if !seen.insert(c.name()) {
                return Err(TasaError::InvalidArg(format!(
                    "connector '{}' registered twice",
                    c.name()
                )));
            }
            if c.source_kind() == SourceKind::UserUpload {
                return Err(TasaError::InvalidArg(format!(
                    "connector '{}' cannot serve user uploads",
                    c.name()
                )));
            }
        }
        let served: HashSet<SourceKind> = self.connectors.iter().map(|c| c.source_kind()).collect();
        for meta in self.catalog.iter() {
            if !served.contains(&meta.source_kind) {
                tracing::warn!(
                    series = %meta.display_name,
                    source = meta.source_kind.label(),
                    "no connector registered for catalog entry; it will always be absent"
                );
            }
        }
        Ok(Tasa {
            connectors: self.connectors,
            catalog: self.catalog,
            cfg: self.cfg,
        })
    }
}

impl Tasa {
    /// Start building a new `Tasa` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use tasa_fred::FredConnector;
    ///
    /// let fred = FredConnector::from_env()?.build()?;
    /// let tasa = tasa::Tasa::builder()
    ///     .with_connector(fred)
    ///     .forward_fill(true)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> TasaBuilder {
        TasaBuilder::new()
    }

    /// The series catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &TasaConfig {
        &self.cfg
    }

    /// First registered connector serving `kind`.
    pub(crate) fn connector_for(&self, kind: SourceKind) -> Option<Arc<dyn TasaConnector>> {
        self.connectors
            .iter()
            .find(|c| c.source_kind() == kind && c.as_series_provider().is_some())
            .cloned()
    }

    /// Wrap a provider future with a timeout and standardized timeout error mapping.
    #[tracing::instrument(
        name = "tasa::core::provider_call_with_timeout",
        skip(fut),
        fields(timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)),
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        connector_name: &'static str,
        code: &str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, TasaError>
    where
        Fut: core::future::Future<Output = Result<T, TasaError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(TasaError::provider_timeout(connector_name, code)))
    }
}
