use std::sync::Arc;

use tasa_core::TasaError;
use tasa_core::connector::TasaConnector;
use tasa_middleware::ConnectorBuilder as GenericConnectorBuilder;
use tasa_types::CacheConfig;

use crate::FredConnector;
use crate::adapter::RealAdapter;

/// Builder type alias specialized for FRED connectors.
pub type FredConnectorBuilder = GenericConnectorBuilder;

impl FredConnector {
    /// Returns a builder around a connector keyed with `api_key`, wrapped in
    /// the default read-through cache.
    ///
    /// Customize with the builder methods before calling `.build()`.
    ///
    /// # Errors
    /// Returns a connector error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<FredConnectorBuilder, TasaError> {
        Ok(Self::cached(RealAdapter::new(api_key)?))
    }

    /// Same as [`FredConnector::new`], keyed from `FRED_API_KEY`.
    ///
    /// # Errors
    /// Returns `Auth` when the variable is unset.
    pub fn from_env() -> Result<FredConnectorBuilder, TasaError> {
        Ok(Self::cached(RealAdapter::from_env()?))
    }

    /// Builder around a pre-configured adapter with the default cache.
    #[must_use]
    pub fn cached(adapter: RealAdapter) -> FredConnectorBuilder {
        let raw: Arc<dyn TasaConnector> = Arc::new(Self::from_real(adapter));
        GenericConnectorBuilder::new(raw).with_cache(&CacheConfig::default())
    }
}
