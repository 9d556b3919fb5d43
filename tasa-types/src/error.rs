use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::UnitTransform;

/// Unified error type for the tasa workspace.
///
/// This wraps capability mismatches, argument validation errors, connector-tagged
/// failures, not-found conditions, and an aggregate for fallback-code attempts.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TasaError {
    /// The requested capability is not implemented by the target connector.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested (e.g. "series").
        capability: String,
    },

    /// Issues with the returned or expected data (unparseable payloads, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// An individual connector returned an error.
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The upstream rejected the configured credentials.
    #[error("{connector} rejected credentials: {msg}")]
    Auth {
        /// Connector name that rejected the request.
        connector: String,
        /// Upstream message.
        msg: String,
    },

    /// A series code could not be found or returned no observations.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing resource, e.g. "series UNRATE".
        what: String,
    },

    /// Every fallback code failed; contains the individual failures in order.
    #[error("all codes failed: {0:?}")]
    AllCodesFailed(Vec<TasaError>),

    /// An individual connector call exceeded the configured timeout.
    #[error("provider timed out: {code} via {connector}")]
    ProviderTimeout {
        /// Connector name that timed out.
        connector: String,
        /// Source code being fetched.
        code: String,
    },

    /// The overall request exceeded the configured deadline.
    #[error("request timed out: {capability}")]
    RequestTimeout {
        /// Capability label for which the request timed out.
        capability: String,
    },

    /// The selected column is not present in the merged table.
    #[error("column not present: {name}")]
    MissingColumn {
        /// Requested column name.
        name: String,
    },

    /// Middleware stack configuration is invalid.
    #[error("invalid middleware stack: {message}")]
    InvalidMiddlewareStack {
        /// Human-readable description of the validation failure.
        message: String,
    },
}

impl TasaError {
    /// Helper: build an `Unsupported` error for a capability string.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build a `Connector` error with the connector name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build an `Auth` error.
    pub fn auth(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Auth {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(connector: impl Into<String>, code: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            connector: connector.into(),
            code: code.into(),
        }
    }

    /// Helper: build a `RequestTimeout` error.
    #[must_use]
    pub fn request_timeout(capability: impl Into<String>) -> Self {
        Self::RequestTimeout {
            capability: capability.into(),
        }
    }

    /// Helper: build a `MissingColumn` error.
    pub fn missing_column(name: impl Into<String>) -> Self {
        Self::MissingColumn { name: name.into() }
    }

    /// Returns true if this error should be surfaced to users as actionable.
    ///
    /// Capability absence and not-found conditions are benign; aggregates are
    /// classified based on their contents.
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        match self {
            Self::Unsupported { .. } | Self::NotFound { .. } => false,
            Self::AllCodesFailed(inner) => inner.iter().any(Self::is_actionable),
            _ => true,
        }
    }

    /// Flatten nested `AllCodesFailed` structures into a plain vector.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::AllCodesFailed(list) => list.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}

/// Failure to fetch one catalog series.
///
/// The pipeline recovers from these locally: the series is absent from the
/// merged table and the error is reported alongside it.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[error("{origin} fetch of {code} failed: {cause}")]
pub struct FetchError {
    /// Connector (or upload) the series was requested from.
    pub origin: String,
    /// Source code, or the comma-joined fallback codes.
    pub code: String,
    /// Underlying failure.
    #[source]
    pub cause: TasaError,
}

impl FetchError {
    /// Build a fetch error.
    pub fn new(origin: impl Into<String>, code: impl Into<String>, cause: TasaError) -> Self {
        Self {
            origin: origin.into(),
            code: code.into(),
            cause,
        }
    }
}

/// Transform failures. Recovered by the public transform entry points.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq)]
#[non_exhaustive]
pub enum TransformError {
    /// The custom formula could not be parsed.
    #[error("malformed formula `{formula}`: {reason}")]
    Formula {
        /// Formula as supplied.
        formula: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The transform is mathematically undefined at a point.
    #[error("{transform} undefined at {date}")]
    Undefined {
        /// Transform being applied.
        transform: UnitTransform,
        /// Observation date.
        date: NaiveDate,
    },
}
