use std::sync::Arc;

use tasa_core::TasaError;
use tasa_core::connector::TasaConnector;
use tasa_middleware::ConnectorBuilder as GenericConnectorBuilder;
use tasa_types::CacheConfig;

use crate::BcchConnector;
use crate::adapter::RealAdapter;

/// Builder type alias specialized for BCCh connectors.
pub type BcchConnectorBuilder = GenericConnectorBuilder;

impl BcchConnector {
    /// Returns a builder around a connector with explicit credentials,
    /// wrapped in the default read-through cache.
    ///
    /// # Errors
    /// Returns a connector error if the HTTP client cannot be built.
    pub fn new(
        user: impl Into<String>,
        pass: impl Into<String>,
    ) -> Result<BcchConnectorBuilder, TasaError> {
        Ok(Self::cached(RealAdapter::new(user, pass)?))
    }

    /// Same as [`BcchConnector::new`], with credentials from the environment.
    ///
    /// # Errors
    /// Returns `Auth` when `BCCH_USER` or `BCCH_PASS` is unset.
    pub fn from_env() -> Result<BcchConnectorBuilder, TasaError> {
        Ok(Self::cached(RealAdapter::from_env()?))
    }

    /// Builder around a pre-configured adapter with the default cache.
    #[must_use]
    pub fn cached(adapter: RealAdapter) -> BcchConnectorBuilder {
        let raw: Arc<dyn TasaConnector> = Arc::new(Self::from_real(adapter));
        GenericConnectorBuilder::new(raw).with_cache(&CacheConfig::default())
    }
}
