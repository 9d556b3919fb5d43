use chrono::NaiveDate;
use serde::Serialize;
use tasa_core::{
    FormatSettings, FormattedReleaseRow, MergedTable, MonthLocale, ReleaseRow, TasaError,
    format_rows, project, recession_bands, visible_window,
};

use crate::Tasa;

/// Release history of one merged column, raw and rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleaseTable {
    /// Column the rows were projected from.
    pub column: String,
    /// Newest first.
    pub rows: Vec<ReleaseRow>,
    /// `rows` rendered with the column's format settings.
    pub formatted: Vec<FormattedReleaseRow>,
}

/// Formatting and attribution for one charted column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisContext {
    /// Column drawn on this axis.
    pub column: String,
    /// Value rendering for axis labels and tooltips.
    pub format: FormatSettings,
    /// Attribution line.
    pub source_label: String,
}

/// What a chart renderer needs to draw one or two columns besides the data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartContext {
    /// Column on the primary axis.
    pub column: String,
    /// Visible x-range, starting at the earlier first observation of the
    /// charted columns.
    pub window: (NaiveDate, NaiveDate),
    /// Recession shading inside the window.
    pub bands: Vec<(NaiveDate, NaiveDate)>,
    /// Value rendering for the primary axis.
    pub format: FormatSettings,
    /// Attribution line for the primary column.
    pub source_label: String,
    /// Secondary axis, when one was requested.
    pub secondary: Option<AxisContext>,
}

impl Tasa {
    /// Project `column` of `table` into its release history.
    ///
    /// `since` defaults to the configured release start.
    ///
    /// # Errors
    /// Returns `MissingColumn` if `column` is not in `table`, and
    /// `Unsupported` for high-frequency market series.
    #[tracing::instrument(name = "tasa::release_table", skip(self, table), fields(since))]
    pub fn release_table(
        &self,
        table: &MergedTable,
        column: &str,
        since: Option<NaiveDate>,
        locale: MonthLocale,
    ) -> Result<ReleaseTable, TasaError> {
        if !table.contains(column) {
            return Err(TasaError::missing_column(column));
        }
        if !self.catalog.has_release_table(column) {
            return Err(TasaError::unsupported(format!(
                "release table for '{column}': not available for high-frequency data"
            )));
        }
        let since = since.unwrap_or(self.cfg.release_since);
        tracing::Span::current().record("since", tracing::field::display(since));

        let rows = project(table, column, since, locale)?;
        let formatted = format_rows(&rows, self.catalog.format_settings(column));
        Ok(ReleaseTable {
            column: column.to_string(),
            rows,
            formatted,
        })
    }

    fn axis(&self, table: &MergedTable, column: &str) -> Result<AxisContext, TasaError> {
        let col = table
            .column(column)
            .ok_or_else(|| TasaError::missing_column(column))?;
        Ok(AxisContext {
            column: column.to_string(),
            format: self.catalog.format_settings(column),
            source_label: self.catalog.source_label_or(column, &col.source_label),
        })
    }

    /// Window, recession bands, formatting and attribution for charting
    /// `column`, optionally against `secondary` on a second axis, as of `now`.
    ///
    /// # Errors
    /// Returns `MissingColumn` if either column is not in `table`.
    pub fn chart_context(
        &self,
        table: &MergedTable,
        column: &str,
        secondary: Option<&str>,
        now: NaiveDate,
    ) -> Result<ChartContext, TasaError> {
        let primary = self.axis(table, column)?;
        let secondary = secondary.map(|c| self.axis(table, c)).transpose()?;

        let mut charted = vec![column];
        charted.extend(secondary.as_ref().map(|a| a.column.as_str()));
        let window = visible_window(table, &charted, now);
        Ok(ChartContext {
            column: primary.column,
            window,
            bands: recession_bands(window.0, window.1),
            format: primary.format,
            source_label: primary.source_label,
            secondary,
        })
    }
}
