//! tasa-middleware
//!
//! Connector wrappers and the builder that composes them, plus the retry
//! helper shared by the HTTP connectors.
#![warn(missing_docs)]

mod builder;
mod cache;
/// Exponential backoff with jitter for transient upstream failures.
pub mod retry;

pub use crate::builder::ConnectorBuilder;
pub use crate::cache::{CacheMiddleware, CachingConnector};
pub use crate::retry::{Failure, with_backoff};
