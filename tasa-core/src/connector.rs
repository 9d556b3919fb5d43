use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Series, SourceKind, TasaError, UnitTransform};
pub use tasa_types::ConnectorKey;

/// Parameters of a single-series fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Earliest observation date requested.
    pub start: NaiveDate,
    /// Unit representation to compute server-side.
    ///
    /// Connectors only receive values for which
    /// [`TasaConnector::supports_server_transform`] returned `true`.
    pub unit: UnitTransform,
}

impl FetchRequest {
    /// Level-units request starting at `start`.
    #[must_use]
    pub const fn new(start: NaiveDate) -> Self {
        Self {
            start,
            unit: UnitTransform::Level,
        }
    }

    /// Same request with another server-side unit.
    #[must_use]
    pub const fn with_unit(mut self, unit: UnitTransform) -> Self {
        self.unit = unit;
        self
    }
}

/// Focused role trait for connectors that serve date-indexed series.
#[async_trait]
pub trait SeriesProvider: Send + Sync {
    /// Fetch one series by source code.
    ///
    /// An empty result is not an error at this level; callers decide how to
    /// treat it (see [`SeriesProvider::fetch_any`]).
    async fn fetch(&self, code: &str, req: &FetchRequest) -> Result<Series, TasaError>;

    /// Try `codes` in order and return the first result with at least one
    /// present value.
    ///
    /// # Errors
    /// - `InvalidArg` when `codes` is empty.
    /// - The single underlying error when only one code was given.
    /// - `AllCodesFailed` with one entry per code otherwise; empty results
    ///   are recorded as `NotFound`.
    async fn fetch_any(&self, codes: &[String], req: &FetchRequest) -> Result<Series, TasaError> {
        if codes.is_empty() {
            return Err(TasaError::InvalidArg("no source codes given".into()));
        }
        let mut errors = Vec::with_capacity(codes.len());
        for code in codes {
            match self.fetch(code, req).await {
                Ok(series) if series.has_values() => return Ok(series),
                Ok(_) => errors.push(TasaError::not_found(format!("series {code}"))),
                Err(e) => {
                    tracing::debug!(code = %code, error = %e, "fallback code failed");
                    errors.push(e);
                }
            }
        }
        if errors.len() == 1 {
            return Err(errors.remove(0));
        }
        Err(TasaError::AllCodesFailed(errors))
    }
}

/// Primary connector interface.
///
/// Capabilities are advertised through `as_*_provider` accessors so wrappers
/// such as caches can forward or intercept them.
pub trait TasaConnector: Send + Sync {
    /// Stable identifier, e.g. `"tasa-fred"`.
    fn name(&self) -> &'static str;

    /// Canonical connector key constructed from the static name.
    fn key(&self) -> ConnectorKey {
        ConnectorKey::new(self.name())
    }

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Upstream family this connector serves catalog entries for.
    fn source_kind(&self) -> SourceKind;

    /// Whether the upstream can compute `unit` itself.
    ///
    /// Default: only level series.
    fn supports_server_transform(&self, unit: UnitTransform) -> bool {
        unit == UnitTransform::Level
    }

    /// Advertise series capability.
    fn as_series_provider(&self) -> Option<&dyn SeriesProvider> {
        None
    }
}
