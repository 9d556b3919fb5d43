//! Release-history view over one merged column.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::format::{FormatSettings, MonthLocale};
use crate::{MergedTable, ReleaseRow, TasaError};

/// Project `column` into release rows dated at or after `since`, newest first.
///
/// Each row's prior value is the next-older present observation in that
/// filtered set; the oldest row has none and is left out. The publication
/// label is the reference month plus one calendar month, an estimate rather
/// than a calendar lookup.
///
/// # Errors
/// Returns `MissingColumn` if `column` is not in `table`.
pub fn project(
    table: &MergedTable,
    column: &str,
    since: NaiveDate,
    locale: MonthLocale,
) -> Result<Vec<ReleaseRow>, TasaError> {
    let mut present: Vec<(NaiveDate, f64)> = table
        .series(column)?
        .present()
        .filter(|(d, _)| *d >= since)
        .collect();
    present.reverse();

    Ok(present
        .windows(2)
        .map(|w| {
            let (date, current_value) = w[0];
            let (_, prior_value) = w[1];
            let publication = date.checked_add_months(Months::new(1)).unwrap_or(date);
            ReleaseRow {
                date,
                reference_period_label: locale.period_label(date),
                estimated_publication_label: locale.period_label(publication),
                current_value,
                prior_value,
            }
        })
        .collect())
}

/// A release row rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedReleaseRow {
    /// Reference period label.
    pub reference: String,
    /// Estimated publication label.
    pub publication: String,
    /// Current value text.
    pub current: String,
    /// Prior value text.
    pub prior: String,
}

/// Render release rows with `settings`.
#[must_use]
pub fn format_rows(rows: &[ReleaseRow], settings: FormatSettings) -> Vec<FormattedReleaseRow> {
    rows.iter()
        .map(|r| FormattedReleaseRow {
            reference: r.reference_period_label.clone(),
            publication: r.estimated_publication_label.clone(),
            current: settings.format_value(Some(r.current_value)),
            prior: settings.format_value(Some(r.prior_value)),
        })
        .collect()
}
