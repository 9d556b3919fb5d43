//! Report envelopes produced by the orchestrator.

use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::{CollisionNotice, LabeledSeries, MergedTable};

/// Result of fetching a set of catalog series.
///
/// Failed series are absent from `series`; their failures are in `warnings`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FetchReport {
    /// Successfully fetched series, in request order.
    pub series: Vec<LabeledSeries>,
    /// Non-fatal fetch failures.
    pub warnings: Vec<FetchError>,
}

/// Result of a full fetch, transform and merge cycle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableReport {
    /// The merged table.
    pub table: MergedTable,
    /// Non-fatal fetch failures; those series are absent from the table.
    pub warnings: Vec<FetchError>,
    /// Renames applied to resolve name collisions.
    pub collisions: Vec<CollisionNotice>,
    /// Number of index rows dropped for being later than the call time.
    pub dropped_future: usize,
}
