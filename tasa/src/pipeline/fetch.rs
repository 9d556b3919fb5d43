use std::collections::HashSet;

use chrono::NaiveDate;
use tasa_core::{
    FetchError, FetchReport, FetchRequest, LabeledSeries, SeriesMeta, TasaError, TransformSpec,
    UnitTransform, apply_spec,
};

use crate::Tasa;

/// How one catalog series is fetched and what is left to do client-side.
#[derive(Debug, Clone, PartialEq)]
struct Plan {
    server_unit: UnitTransform,
    client: TransformSpec,
}

impl Tasa {
    /// Decide which unit the upstream computes and which transform runs
    /// locally.
    ///
    /// An explicit `spec` replaces the entry's native units and always runs
    /// locally over the level series, so its lags stay positional whatever
    /// the connector. Only native units go to the server, and only when it
    /// supports them.
    fn plan(meta: &SeriesMeta, spec: Option<&TransformSpec>, server_supports: bool) -> Plan {
        match spec {
            Some(spec) => Plan {
                server_unit: UnitTransform::Level,
                client: spec.clone(),
            },
            None if server_supports => Plan {
                server_unit: meta.native_unit_transform,
                client: TransformSpec::default(),
            },
            None => Plan {
                server_unit: UnitTransform::Level,
                client: TransformSpec::units(meta.native_unit_transform),
            },
        }
    }

    /// Fetch one catalog entry and shape it into its display form.
    #[tracing::instrument(
        name = "tasa::fetch_series",
        skip(self, meta, start, spec),
        fields(series = %meta.display_name, codes = %meta.joined_codes(), start = %start),
    )]
    pub(crate) async fn fetch_series(
        &self,
        meta: &SeriesMeta,
        start: NaiveDate,
        spec: Option<&TransformSpec>,
    ) -> Result<LabeledSeries, FetchError> {
        let origin = meta.source_kind.label();
        let codes = meta.joined_codes();
        let Some(connector) = self.connector_for(meta.source_kind) else {
            return Err(FetchError::new(
                origin,
                codes,
                TasaError::unsupported(format!("no connector for {origin}")),
            ));
        };
        let Some(provider) = connector.as_series_provider() else {
            return Err(FetchError::new(
                connector.name(),
                codes,
                TasaError::unsupported("series"),
            ));
        };

        let plan = Self::plan(
            meta,
            spec,
            connector.supports_server_transform(meta.native_unit_transform),
        );
        let start = meta.recommended_start.map_or(start, |r| r.max(start));
        let req = FetchRequest::new(start).with_unit(plan.server_unit);

        let raw = Self::provider_call_with_timeout(
            connector.name(),
            &codes,
            self.cfg.provider_timeout,
            provider.fetch_any(&meta.source_codes, &req),
        )
        .await
        .map_err(|e| FetchError::new(connector.name(), codes.clone(), e))?;

        // The series comes back named after the code that answered.
        let label = format!("{origin} {}", raw.name());
        let shaped = apply_spec(&raw, &plan.client).renamed(meta.display_name.clone());
        tracing::debug!(
            points = shaped.len(),
            server_unit = %plan.server_unit,
            "series fetched"
        );
        Ok(LabeledSeries::new(shaped, label))
    }

    /// Fetch catalog series by display name, concurrently, in their native
    /// units.
    ///
    /// Failures never abort the batch: each failed or unknown name becomes a
    /// warning and the series is absent from the report. Duplicate names are
    /// fetched once. `start` defaults to the configured start date.
    pub async fn fetch<S: AsRef<str>>(&self, names: &[S], start: Option<NaiveDate>) -> FetchReport {
        self.fetch_with(names, start, |_| None).await
    }

    pub(crate) async fn fetch_with<'a, S, F>(
        &self,
        names: &[S],
        start: Option<NaiveDate>,
        spec_for: F,
    ) -> FetchReport
    where
        S: AsRef<str>,
        F: Fn(&str) -> Option<&'a TransformSpec>,
    {
        let start = start.unwrap_or(self.cfg.start_date);
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();
        let mut metas = Vec::new();
        for name in names {
            let name = name.as_ref();
            if !seen.insert(name) {
                continue;
            }
            match self.catalog.get(name) {
                Some(meta) => metas.push(meta),
                None => {
                    let e = FetchError::new(
                        "catalog",
                        name,
                        TasaError::not_found(format!("catalog entry {name}")),
                    );
                    tracing::warn!(code = %e.code, "unknown series name");
                    warnings.push(e);
                }
            }
        }

        let tasks = metas
            .iter()
            .map(|meta| self.fetch_series(meta, start, spec_for(meta.display_name.as_str())));
        let results = super::join_with_deadline(tasks, self.cfg.request_timeout).await;

        let mut series = Vec::with_capacity(results.len());
        for (meta, r) in metas.iter().zip(results) {
            let r = r.unwrap_or_else(|| {
                Err(FetchError::new(
                    meta.source_kind.label(),
                    meta.joined_codes(),
                    TasaError::request_timeout("fetch"),
                ))
            });
            match r {
                Ok(s) => series.push(s),
                Err(e) => {
                    tracing::warn!(
                        series = %meta.display_name,
                        origin = %e.origin,
                        code = %e.code,
                        error = %e.cause,
                        "series fetch failed; continuing without it"
                    );
                    warnings.push(e);
                }
            }
        }
        FetchReport { series, warnings }
    }
}
