use std::time::Duration;

use async_trait::async_trait;
use tasa_core::connector::{FetchRequest, SeriesProvider, TasaConnector};
use tasa_core::{Series, SourceKind, TasaError, UnitTransform};

mod fixtures;

pub use fixtures::codes as fixture_codes;

/// Mock connector for CI-safe demos and tests. Serves deterministic
/// synthetic series for the default catalog codes.
///
/// A few codes trigger canned behaviors:
/// - `FAIL`: connector error.
/// - `AUTH`: credential rejection.
/// - `TIMEOUT`: sleeps for two seconds, then reports not found.
/// - `EMPTY`: succeeds with no observations.
pub struct MockConnector {
    name: &'static str,
    kind: SourceKind,
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    /// Mock statistics API. Computes every unit transform "server-side".
    #[must_use]
    pub const fn new() -> Self {
        Self {
            name: "tasa-mock",
            kind: SourceKind::StatisticsApi,
        }
    }

    /// Mock central-bank API. Serves level series only.
    #[must_use]
    pub const fn central_bank() -> Self {
        Self {
            name: "tasa-mock-bcch",
            kind: SourceKind::CentralBankApi,
        }
    }

    async fn maybe_fail_or_timeout(&self, code: &str) -> Result<(), TasaError> {
        match code {
            "FAIL" => Err(TasaError::connector(self.name, format!("forced failure: {code}"))),
            "AUTH" => Err(TasaError::auth(self.name, "forced credential rejection")),
            "TIMEOUT" => {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl TasaConnector for MockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn source_kind(&self) -> SourceKind {
        self.kind
    }

    fn supports_server_transform(&self, unit: UnitTransform) -> bool {
        self.kind == SourceKind::StatisticsApi || unit == UnitTransform::Level
    }

    fn as_series_provider(&self) -> Option<&dyn SeriesProvider> {
        Some(self as &dyn SeriesProvider)
    }
}

#[async_trait]
impl SeriesProvider for MockConnector {
    async fn fetch(&self, code: &str, req: &FetchRequest) -> Result<Series, TasaError> {
        self.maybe_fail_or_timeout(code).await?;
        if code == "EMPTY" {
            return Ok(Series::empty(code));
        }
        if !self.supports_server_transform(req.unit) {
            return Err(TasaError::unsupported(format!("server units {}", req.unit)));
        }
        let level = fixtures::by_code(code)
            .ok_or_else(|| TasaError::not_found(format!("series {code}")))?;
        let history = Series::new(
            code,
            level.points().iter().copied().filter(|p| p.date >= req.start),
        );
        Ok(tasa_core::apply(&history, req.unit))
    }
}
