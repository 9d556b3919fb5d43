//! Tasa-specific data transfer objects, configuration primitives, and the
//! shared error taxonomy.
#![warn(missing_docs)]

mod config;
mod connector;
mod error;
mod meta;
mod middleware;
mod reports;
mod series;
mod table;
mod transform;

pub use config::{BackoffConfig, CacheConfig, TasaConfig};
pub use connector::ConnectorKey;
pub use error::{FetchError, TasaError, TransformError};
pub use meta::{SeriesCategory, SeriesMeta, SourceKind};
pub use middleware::{MiddlewareLayer, MiddlewareStack};
pub use reports::{FetchReport, TableReport};
pub use series::{LabeledSeries, Observation, Series};
pub use table::{CollisionNotice, Column, MergedTable, ReleaseRow};
pub use transform::{Aggregation, Frequency, TransformSpec, UnitTransform};
