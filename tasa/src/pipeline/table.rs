use std::collections::HashMap;

use chrono::NaiveDate;
use tasa_core::{
    LabeledSeries, MergeOptions, TableReport, TransformSpec, UploadTable, apply_spec, merge,
};

use crate::Tasa;

/// One fetch-transform-merge cycle as selected by the caller.
#[derive(Debug, Clone, Default)]
pub struct TableRequest {
    /// Catalog display names, in the order they register in the merge.
    pub names: Vec<String>,
    /// History start; defaults to the configured start date.
    pub start: Option<NaiveDate>,
    /// Normalized uploads, merged after the catalog series in this order.
    pub uploads: Vec<UploadTable>,
    /// Per-series transforms keyed by display name (catalog or upload column).
    pub transforms: HashMap<String, TransformSpec>,
    /// Forward-fill override; defaults to the configured toggle.
    pub forward_fill: Option<bool>,
    /// Call-time date used for the future cut; defaults to today (UTC).
    pub now: Option<NaiveDate>,
}

impl TableRequest {
    /// Request for catalog series by display name.
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the history start.
    #[must_use]
    pub const fn start(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    /// Append an upload.
    #[must_use]
    pub fn upload(mut self, upload: UploadTable) -> Self {
        self.uploads.push(upload);
        self
    }

    /// Select a transform for one series.
    #[must_use]
    pub fn transform(mut self, name: impl Into<String>, spec: TransformSpec) -> Self {
        self.transforms.insert(name.into(), spec);
        self
    }

    /// Override forward-fill.
    #[must_use]
    pub const fn forward_fill(mut self, yes: bool) -> Self {
        self.forward_fill = Some(yes);
        self
    }

    /// Pin the call-time date.
    #[must_use]
    pub const fn at(mut self, now: NaiveDate) -> Self {
        self.now = Some(now);
        self
    }
}

impl Tasa {
    /// Fetch, transform and outer-join the requested series into one table.
    ///
    /// Catalog series register first, in request order, then every upload
    /// column in upload order; later duplicates of a name are renamed with
    /// their source label. Fetch failures are reported as warnings and the
    /// series is left out. Nothing here fails the whole call.
    #[tracing::instrument(
        name = "tasa::build_table",
        skip(self, req),
        fields(series = req.names.len(), uploads = req.uploads.len()),
    )]
    pub async fn build_table(&self, req: &TableRequest) -> TableReport {
        let fetched = self
            .fetch_with(&req.names, req.start, |name| req.transforms.get(name))
            .await;

        let mut inputs = fetched.series;
        for upload in &req.uploads {
            for s in upload.labeled() {
                let s = match req.transforms.get(s.series.name()) {
                    Some(spec) => LabeledSeries::new(apply_spec(&s.series, spec), s.source_label),
                    None => s,
                };
                inputs.push(s);
            }
        }

        let now = req.now.unwrap_or_else(|| chrono::Utc::now().date_naive());
        let opts =
            MergeOptions::at(now).forward_fill(req.forward_fill.unwrap_or(self.cfg.forward_fill));
        let outcome = merge(inputs, &opts);
        tracing::debug!(
            rows = outcome.table.len(),
            columns = outcome.table.width(),
            warnings = fetched.warnings.len(),
            "table built"
        );

        TableReport {
            table: outcome.table,
            warnings: fetched.warnings,
            collisions: outcome.collisions,
            dropped_future: outcome.dropped_future,
        }
    }
}
