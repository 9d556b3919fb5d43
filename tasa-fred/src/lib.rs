//! tasa-fred
//!
//! Connector for the FRED statistics API. Serves date-indexed series by
//! series id and computes every unit transform server-side through the
//! `units` query parameter.
#![warn(missing_docs)]

/// Adapter definitions and the production adapter backed by `reqwest`.
pub mod adapter;
mod builder;

use std::sync::Arc;

pub use builder::FredConnectorBuilder;

use adapter::{FredObservations, RealAdapter};
use async_trait::async_trait;
use tasa_core::{
    FetchRequest, Series, SourceKind, TasaError, UnitTransform,
    connector::{ConnectorKey, SeriesProvider, TasaConnector},
};

#[cfg(feature = "test-adapters")]
type ObservationsAdapter = Arc<dyn FredObservations>;
#[cfg(not(feature = "test-adapters"))]
type ObservationsAdapter = Arc<RealAdapter>;

/// Public connector type.
pub struct FredConnector {
    observations: ObservationsAdapter,
}

impl FredConnector {
    /// Static connector key for routing configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new("tasa-fred");

    fn normalize_error(e: TasaError, code: &str) -> TasaError {
        match e {
            TasaError::Connector { connector: _, msg } => {
                let m = msg.to_ascii_lowercase();
                if m.contains("does not exist") || m.contains("not found") {
                    TasaError::not_found(format!("series {code}"))
                } else {
                    TasaError::connector(Self::KEY.as_str(), msg)
                }
            }
            other => other,
        }
    }

    /// Unwrapped connector with an explicit API key.
    ///
    /// # Errors
    /// Returns a connector error if the HTTP client cannot be built.
    pub fn new_raw(api_key: impl Into<String>) -> Result<Self, TasaError> {
        Ok(Self::from_real(RealAdapter::new(api_key)?))
    }

    /// Unwrapped connector keyed from `FRED_API_KEY`.
    ///
    /// # Errors
    /// Returns `Auth` when the variable is unset.
    pub fn new_raw_from_env() -> Result<Self, TasaError> {
        Ok(Self::from_real(RealAdapter::from_env()?))
    }

    /// Wrap a configured production adapter.
    #[must_use]
    pub fn from_real(adapter: RealAdapter) -> Self {
        Self {
            observations: Arc::new(adapter),
        }
    }

    /// Build from an injected adapter (tests only).
    #[cfg(feature = "test-adapters")]
    #[must_use]
    pub fn from_adapter(observations: Arc<dyn FredObservations>) -> Self {
        Self { observations }
    }
}

impl TasaConnector for FredConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "Federal Reserve Bank of St. Louis"
    }

    fn source_kind(&self) -> SourceKind {
        SourceKind::StatisticsApi
    }

    fn supports_server_transform(&self, _unit: UnitTransform) -> bool {
        true
    }

    fn as_series_provider(&self) -> Option<&dyn SeriesProvider> {
        Some(self as &dyn SeriesProvider)
    }
}

#[async_trait]
impl SeriesProvider for FredConnector {
    #[tracing::instrument(
        name = "tasa_fred::fetch",
        skip(self, req),
        fields(start = %req.start, unit = %req.unit),
    )]
    async fn fetch(&self, code: &str, req: &FetchRequest) -> Result<Series, TasaError> {
        let obs = self
            .observations
            .observations(code, req.start, req.unit)
            .await
            .map_err(|e| Self::normalize_error(e, code))?;
        Ok(Series::new(code, obs))
    }
}
