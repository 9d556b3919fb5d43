//! Middleware trait for wrapping `TasaConnector` implementations.

use std::sync::Arc;

use crate::connector::TasaConnector;

/// Trait implemented by connector middleware layers.
///
/// A middleware consumes an inner connector and returns a wrapped connector
/// that augments its behavior (e.g. read-through caching).
pub trait Middleware: Send + Sync {
    /// Wrap `inner` and return the wrapped connector.
    fn apply(self: Box<Self>, inner: Arc<dyn TasaConnector>) -> Arc<dyn TasaConnector>;

    /// Middleware name for introspection and logging.
    fn name(&self) -> &'static str;

    /// Configuration snapshot for serialization and inspection.
    fn config_json(&self) -> serde_json::Value;
}
