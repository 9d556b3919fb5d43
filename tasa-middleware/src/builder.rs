//! Builder for composing connectors with middleware layers.
//!
//! Layers form an onion around the raw connector. They are stored
//! outermost-first, matching [`MiddlewareStack`], and applied in reverse
//! during [`ConnectorBuilder::build`]:
//!
//! ```text
//! builder.with_cache(..).layer(custom)
//!
//! Storage: [custom, Cache]
//! Result:  custom(Cache(Raw))
//! ```

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tasa_core::Middleware;
use tasa_core::connector::TasaConnector;
use tasa_types::{CacheConfig, MiddlewareLayer, MiddlewareStack, TasaError};

use crate::cache::CacheMiddleware;

const CACHE: &str = "CachingMiddleware";

/// Generic middleware builder for a single connector.
pub struct ConnectorBuilder {
    raw: Arc<dyn TasaConnector>,
    /// Outermost first.
    layers: Vec<Box<dyn Middleware>>,
}

impl ConnectorBuilder {
    /// Start from a raw, unwrapped connector.
    #[must_use]
    pub fn new(raw: Arc<dyn TasaConnector>) -> Self {
        Self {
            raw,
            layers: Vec::new(),
        }
    }

    /// Add or replace the read-through cache at the outermost position.
    #[must_use]
    pub fn with_cache(mut self, cfg: &CacheConfig) -> Self {
        self.layers.retain(|m| m.name() != CACHE);
        self.layers.insert(0, Box::new(CacheMiddleware::new(*cfg)));
        self
    }

    /// Remove the cache if present.
    #[must_use]
    pub fn without_cache(mut self) -> Self {
        self.layers.retain(|m| m.name() != CACHE);
        self
    }

    /// Add an arbitrary layer at the outermost position.
    #[must_use]
    pub fn layer(mut self, layer: Box<dyn Middleware>) -> Self {
        self.layers.insert(0, layer);
        self
    }

    /// Export the layer configuration, outermost first, with the raw
    /// connector appended as the innermost entry.
    #[must_use]
    pub fn to_stack(&self) -> MiddlewareStack {
        let mut stack = MiddlewareStack::new();
        for layer in &self.layers {
            stack.push_inner(MiddlewareLayer::new(layer.name(), layer.config_json()));
        }
        stack.push_inner(MiddlewareLayer::new(
            "RawConnector",
            json!({ "name": self.raw.name() }),
        ));
        stack
    }

    /// Rebuild from a raw connector and an exported stack.
    ///
    /// Unknown layer names (including the `RawConnector` marker) are ignored.
    #[must_use]
    pub fn from_stack(raw: Arc<dyn TasaConnector>, stack: &MiddlewareStack) -> Self {
        let mut layers: Vec<Box<dyn Middleware>> = Vec::new();
        for l in &stack.layers {
            if l.name == CACHE {
                let defaults = CacheConfig::default();
                let ttl_ms = l
                    .config
                    .get("ttl_ms")
                    .and_then(serde_json::Value::as_u64)
                    .unwrap_or_else(|| u64::try_from(defaults.ttl.as_millis()).unwrap_or(u64::MAX));
                let max_entries = l
                    .config
                    .get("max_entries")
                    .and_then(serde_json::Value::as_u64)
                    .unwrap_or(defaults.max_entries);
                layers.push(Box::new(CacheMiddleware::new(CacheConfig {
                    ttl: Duration::from_millis(ttl_ms),
                    max_entries,
                })));
            }
        }
        Self { raw, layers }
    }

    /// Apply the layers innermost-first and return the wrapped connector.
    ///
    /// # Errors
    /// Returns `InvalidMiddlewareStack` if the same layer appears twice.
    pub fn build(self) -> Result<Arc<dyn TasaConnector>, TasaError> {
        let mut seen = HashSet::new();
        for m in &self.layers {
            if !seen.insert(m.name()) {
                return Err(TasaError::InvalidMiddlewareStack {
                    message: format!("duplicate layer {}", m.name()),
                });
            }
        }
        let mut acc: Arc<dyn TasaConnector> = Arc::clone(&self.raw);
        for m in self.layers.into_iter().rev() {
            tracing::debug!(layer = m.name(), connector = acc.name(), "applying middleware");
            acc = m.apply(acc);
        }
        Ok(acc)
    }
}
