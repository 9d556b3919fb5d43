//! Tasa turns named macro indicators into one date-aligned table.
//!
//! Overview
//! - Routes catalog series to connectors that implement the `tasa_core`
//!   contracts, by source kind (statistics API, central bank).
//! - Fetches series concurrently with a per-connector timeout and an optional
//!   overall deadline; failed series become warnings instead of errors.
//! - Applies per-series transforms (resample, units, formula) locally, and
//!   asks the upstream for a catalog entry's native units when it can
//!   compute them itself.
//! - Outer-joins catalog and uploaded series, renaming name collisions and
//!   dropping dates after the call-time date.
//! - Projects release-history views for macro columns.
//!
//! Key behaviors and trade-offs
//! - Partial failure: a table is always produced. Check
//!   `TableReport::warnings` to learn which series are missing.
//! - Server-side units are used for native units only. The upstream's own
//!   year-ago and annualized codes follow its calendar rules, while an
//!   explicit `TransformSpec` always uses positional lags.
//! - Forward-fill runs after the merge and never extends a column backwards.
//!
//! Examples
//! Building an orchestrator and a table:
//! ```rust,ignore
//! use tasa::{Tasa, TableRequest, TransformSpec, UnitTransform};
//! use tasa_fred::FredConnector;
//!
//! let fred = FredConnector::from_env()?.build()?;
//! let tasa = Tasa::builder().with_connector(fred).build()?;
//!
//! let req = TableRequest::new(["Desempleo (%)", "Inflación IPC (% a/a)"])
//!     .transform("Desempleo (%)", TransformSpec::units(UnitTransform::Diff));
//! let report = tasa.build_table(&req).await;
//! for w in &report.warnings {
//!     eprintln!("{} {}: {}", w.origin, w.code, w.cause);
//! }
//! ```
//!
//! Release history for one column:
//! ```rust,ignore
//! let releases = tasa.release_table(&report.table, "Desempleo (%)", None, MonthLocale::Spanish)?;
//! ```
//!
//! See `demos/examples/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

pub(crate) mod core;
mod pipeline;

pub use core::{Tasa, TasaBuilder};
pub use pipeline::join_with_deadline;
pub use pipeline::table::TableRequest;
pub use pipeline::views::{AxisContext, ChartContext, ReleaseTable};

pub use tasa_middleware::{CacheMiddleware, ConnectorBuilder};

// Re-export core types for convenience
pub use tasa_core::{
    Aggregation, BackoffConfig, CacheConfig, Catalog, CatalogBuilder, Cell, CollisionNotice,
    Column, FetchError, FetchReport, FetchRequest, FormatSettings, FormattedReleaseRow, Frequency,
    LabeledSeries, MergedTable, MonthLocale, Observation, ReleaseRow, Series, SeriesCategory,
    SeriesMeta, SourceKind, TableReport, TasaConfig, TasaConnector, TasaError, TransformSpec,
    UnitTransform, UploadTable, with_derived_column,
};
