//! tasa-bcch
//!
//! Connector for the Banco Central de Chile SIETE web service. Serves level
//! series only; unit transforms are computed client-side by the caller.
//! Values arrive with locale-formatted decimals and are normalized here.
#![warn(missing_docs)]

/// Adapter definitions and the production adapter backed by `reqwest`.
pub mod adapter;
mod builder;

use std::sync::Arc;

pub use builder::BcchConnectorBuilder;

use adapter::{RealAdapter, SieteSeries};
use async_trait::async_trait;
use tasa_core::{
    FetchRequest, Series, SourceKind, TasaError, UnitTransform,
    connector::{ConnectorKey, SeriesProvider, TasaConnector},
};

#[cfg(feature = "test-adapters")]
type SeriesAdapter = Arc<dyn SieteSeries>;
#[cfg(not(feature = "test-adapters"))]
type SeriesAdapter = Arc<RealAdapter>;

/// Public connector type.
pub struct BcchConnector {
    series: SeriesAdapter,
}

impl BcchConnector {
    /// Static connector key for routing configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new("tasa-bcch");

    fn normalize_error(e: TasaError) -> TasaError {
        match e {
            TasaError::Connector { connector: _, msg } => {
                TasaError::connector(Self::KEY.as_str(), msg)
            }
            other => other,
        }
    }

    /// Unwrapped connector with explicit credentials.
    ///
    /// # Errors
    /// Returns a connector error if the HTTP client cannot be built.
    pub fn new_raw(user: impl Into<String>, pass: impl Into<String>) -> Result<Self, TasaError> {
        Ok(Self::from_real(RealAdapter::new(user, pass)?))
    }

    /// Unwrapped connector with credentials from `BCCH_USER`/`BCCH_PASS`.
    ///
    /// # Errors
    /// Returns `Auth` when the variables are unset.
    pub fn new_raw_from_env() -> Result<Self, TasaError> {
        Ok(Self::from_real(RealAdapter::from_env()?))
    }

    /// Wrap a configured production adapter.
    #[must_use]
    pub fn from_real(adapter: RealAdapter) -> Self {
        Self {
            series: Arc::new(adapter),
        }
    }

    /// Build from an injected adapter (tests only).
    #[cfg(feature = "test-adapters")]
    #[must_use]
    pub fn from_adapter(series: Arc<dyn SieteSeries>) -> Self {
        Self { series }
    }
}

impl TasaConnector for BcchConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "Banco Central de Chile"
    }

    fn source_kind(&self) -> SourceKind {
        SourceKind::CentralBankApi
    }

    fn as_series_provider(&self) -> Option<&dyn SeriesProvider> {
        Some(self as &dyn SeriesProvider)
    }
}

#[async_trait]
impl SeriesProvider for BcchConnector {
    #[tracing::instrument(name = "tasa_bcch::fetch", skip(self, req), fields(start = %req.start))]
    async fn fetch(&self, code: &str, req: &FetchRequest) -> Result<Series, TasaError> {
        if req.unit != UnitTransform::Level {
            return Err(TasaError::unsupported(format!("server units {}", req.unit)));
        }
        let obs = self
            .series
            .get_series(code, req.start)
            .await
            .map_err(Self::normalize_error)?;
        Ok(Series::new(code, obs))
    }
}
