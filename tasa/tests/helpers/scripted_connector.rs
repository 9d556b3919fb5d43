#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use tasa_core::connector::{FetchRequest, SeriesProvider, TasaConnector};
use tasa_core::{Series, SourceKind, TasaError, UnitTransform};
use tokio::time::{Duration, sleep};

/// In-memory connector serving canned level series.
///
/// Server-side units are computed with the same primitives the pipeline uses
/// client-side, so the two paths agree value for value.
pub struct ScriptedConnector {
    pub name: &'static str,
    pub kind: SourceKind,
    pub series: HashMap<String, Series>,
    pub errors: HashMap<String, TasaError>,
    pub server_units: Vec<UnitTransform>,
    pub delay_ms: u64,
    pub calls: Arc<Mutex<Vec<(String, FetchRequest)>>>,
}

impl ScriptedConnector {
    pub fn new(name: &'static str, kind: SourceKind) -> Self {
        Self {
            name,
            kind,
            series: HashMap::new(),
            errors: HashMap::new(),
            server_units: vec![UnitTransform::Level],
            delay_ms: 0,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn statistics(name: &'static str) -> Self {
        Self::new(name, SourceKind::StatisticsApi)
    }

    pub fn central_bank(name: &'static str) -> Self {
        Self::new(name, SourceKind::CentralBankApi)
    }

    pub fn with_series(mut self, code: &str, s: Series) -> Self {
        self.series.insert(code.to_string(), s);
        self
    }

    pub fn with_error(mut self, code: &str, e: TasaError) -> Self {
        self.errors.insert(code.to_string(), e);
        self
    }

    pub fn with_server_units(mut self, units: &[UnitTransform]) -> Self {
        self.server_units = units.to_vec();
        self
    }

    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }

    /// Shared handle on the recorded calls, usable after the connector moved
    /// into an orchestrator.
    pub fn calls(&self) -> Arc<Mutex<Vec<(String, FetchRequest)>>> {
        Arc::clone(&self.calls)
    }
}

impl TasaConnector for ScriptedConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn source_kind(&self) -> SourceKind {
        self.kind
    }

    fn supports_server_transform(&self, unit: UnitTransform) -> bool {
        self.server_units.contains(&unit)
    }

    fn as_series_provider(&self) -> Option<&dyn SeriesProvider> {
        Some(self as &dyn SeriesProvider)
    }
}

#[async_trait]
impl SeriesProvider for ScriptedConnector {
    async fn fetch(&self, code: &str, req: &FetchRequest) -> Result<Series, TasaError> {
        self.calls.lock().unwrap().push((code.to_string(), *req));
        if self.delay_ms > 0 {
            sleep(Duration::from_millis(self.delay_ms)).await;
        }
        if let Some(e) = self.errors.get(code) {
            return Err(e.clone());
        }
        let s = self
            .series
            .get(code)
            .ok_or_else(|| TasaError::not_found(format!("series {code}")))?;
        let history = Series::new(
            code,
            s.points().iter().copied().filter(|p| p.date >= req.start),
        );
        Ok(tasa_core::apply(&history, req.unit))
    }
}
