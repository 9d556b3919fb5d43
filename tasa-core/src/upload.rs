//! Normalization of user-supplied tables into catalog-shaped series.
//!
//! The spreadsheet reader itself is external; this module starts from the
//! cells it yields. The first column holds dates, every other column values.

use std::collections::HashMap;

use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::util::parse_decimal;
use crate::{LabeledSeries, Observation, Series, SeriesMeta, TasaError};

/// One spreadsheet cell as produced by a reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// Blank cell.
    Empty,
    /// Text as written.
    Text(String),
    /// Numeric cell. In the date column this is an Excel serial day number.
    Number(f64),
    /// Date cell.
    Date(NaiveDate),
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<NaiveDate> for Cell {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y",
];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

fn excel_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
}

fn coerce_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(d) => Some(*d),
        Cell::Text(s) => parse_date_text(s),
        Cell::Number(n) if n.is_finite() && *n >= 1.0 => {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let days = n.trunc() as u64;
            excel_epoch()?.checked_add_days(Days::new(days))
        }
        Cell::Number(_) | Cell::Empty => None,
    }
}

fn coerce_number(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(n) => Some(*n).filter(|v| v.is_finite()),
        Cell::Text(s) => parse_decimal(s.trim_end_matches('%')),
        Cell::Date(_) | Cell::Empty => None,
    }
}

fn is_unnamed(header: &str) -> bool {
    header.trim().is_empty() || header.contains("Unnamed")
}

/// Column names for the value columns: blanks become `Unnamed: {i}`, repeats
/// get `.1`, `.2` suffixes, and unnamed ones are qualified with the file label.
fn column_names(file_label: &str, headers: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, h)| {
            let base = if h.trim().is_empty() {
                format!("Unnamed: {i}")
            } else {
                h.trim().to_string()
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base.clone()
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            if is_unnamed(&base) {
                format!("{name} ({file_label})")
            } else {
                name
            }
        })
        .collect()
}

/// A normalized upload: one series per value column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadTable {
    file_label: String,
    series: Vec<Series>,
    skipped_rows: usize,
}

impl UploadTable {
    /// Normalize raw cells.
    ///
    /// Rows whose first cell is not a date are dropped; value cells that do
    /// not parse as numbers are absent. Short rows are padded with blanks.
    ///
    /// # Errors
    /// Returns `InvalidArg` when there is no value column.
    pub fn from_cells(
        file_label: impl Into<String>,
        headers: &[String],
        rows: &[Vec<Cell>],
    ) -> Result<Self, TasaError> {
        let file_label = file_label.into();
        if headers.len() < 2 {
            return Err(TasaError::InvalidArg(format!(
                "upload '{file_label}' needs a date column and at least one value column"
            )));
        }
        let names = column_names(&file_label, headers);
        let mut columns: Vec<Vec<Observation>> = vec![Vec::new(); names.len()];
        let mut skipped_rows = 0;

        for row in rows {
            let Some(date) = row.first().and_then(coerce_date) else {
                skipped_rows += 1;
                continue;
            };
            for (j, col) in columns.iter_mut().enumerate() {
                let value = row.get(j + 1).and_then(coerce_number);
                col.push(Observation { date, value });
            }
        }
        if skipped_rows > 0 {
            tracing::debug!(file = %file_label, skipped_rows, "upload rows without a parseable date dropped");
        }

        let series = names
            .into_iter()
            .zip(columns)
            .map(|(name, points)| Series::new(name, points))
            .collect();
        Ok(Self {
            file_label,
            series,
            skipped_rows,
        })
    }

    /// File label the upload is attributed to.
    #[must_use]
    pub fn file_label(&self) -> &str {
        &self.file_label
    }

    /// Normalized series, in column order.
    #[must_use]
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Column names, in column order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(Series::name)
    }

    /// Rows dropped for lacking a parseable date.
    #[must_use]
    pub const fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// Synthesized metadata for each column.
    #[must_use]
    pub fn metas(&self) -> Vec<SeriesMeta> {
        self.series
            .iter()
            .map(|s| SeriesMeta::upload(s.name(), &self.file_label))
            .collect()
    }

    /// Series tagged with the file label, ready for merging.
    #[must_use]
    pub fn labeled(&self) -> Vec<LabeledSeries> {
        self.series
            .iter()
            .map(|s| LabeledSeries::new(s.clone(), self.file_label.clone()))
            .collect()
    }
}
