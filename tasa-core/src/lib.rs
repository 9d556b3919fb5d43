//! tasa-core
//!
//! Traits and pure algorithms shared across the tasa workspace.
//!
//! - `connector`: the `TasaConnector` trait and the `SeriesProvider` role.
//! - `middleware`: the trait implemented by connector wrappers.
//! - `catalog`: the immutable registry of named indicator series.
//! - `timeseries`: transform, resample, merge and projection.
//! - `upload`: normalization of user-supplied tables.
//!
//! Connector traits are async (`async_trait`) and assume a Tokio runtime in
//! the caller; everything else here is synchronous and pure.
#![warn(missing_docs)]

/// Series catalog and its builder.
pub mod catalog;
/// Connector role traits and the primary `TasaConnector` interface.
pub mod connector;
/// Value and period label formatting.
pub mod format;
/// Middleware trait implemented by connector wrappers.
pub mod middleware;
/// Time-series utilities.
pub mod timeseries;
/// Upload normalization.
pub mod upload;
/// Parsing helpers.
pub mod util;

pub use catalog::{Catalog, CatalogBuilder};
pub use connector::{FetchRequest, SeriesProvider, TasaConnector};
pub use format::{FormatSettings, MonthLocale};
pub use middleware::Middleware;
pub use timeseries::formula::Formula;
pub use timeseries::merge::{MergeOptions, MergeOutcome, forward_filled, merge, with_derived_column};
pub use timeseries::project::{FormattedReleaseRow, format_rows, project};
pub use timeseries::recession::{recession_bands, visible_window};
pub use timeseries::resample::resample;
pub use timeseries::transform::{apply, apply_formula, apply_spec, try_apply};
pub use upload::{Cell, UploadTable};
pub use util::parse_decimal;

pub use tasa_types::*;
