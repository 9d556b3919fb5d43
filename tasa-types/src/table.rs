//! Merged, date-aligned table and the views derived from it.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Observation, Series, TasaError};

/// One column of a [`MergedTable`], aligned with the table index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Unique display name.
    pub name: String,
    /// Source label the column was fetched or uploaded from.
    pub source_label: String,
    /// Values aligned with the table index; `None` is an absent marker.
    pub values: Vec<Option<f64>>,
    /// Rows whose value was carried forward rather than observed. Empty when
    /// nothing was filled.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filled: Vec<bool>,
}

impl Column {
    /// Column of observed values only.
    pub fn new(
        name: impl Into<String>,
        source_label: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Self {
        Self {
            name: name.into(),
            source_label: source_label.into(),
            values,
            filled: Vec::new(),
        }
    }

    /// Value at row `i` if it was observed there, not carried forward.
    #[must_use]
    pub fn observed(&self, i: usize) -> Option<f64> {
        if self.filled.get(i).copied().unwrap_or(false) {
            return None;
        }
        self.values.get(i).copied().flatten()
    }

    /// True when any row holds a carried-forward value.
    #[must_use]
    pub fn has_filled(&self) -> bool {
        self.filled.iter().any(|f| *f)
    }
}

/// Outer-joined table: a strictly increasing date index and any number of
/// independently sparse columns with unique names.
///
/// Tables are values: every operation that changes shape returns a new table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MergedTable {
    index: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl MergedTable {
    /// Assemble a table, validating index order, column lengths and names.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the index is not strictly increasing, a column
    /// length differs from the index length, or two columns share a name.
    /// A non-empty fill mask must match the index length too.
    pub fn from_parts(index: Vec<NaiveDate>, columns: Vec<Column>) -> Result<Self, TasaError> {
        if index.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TasaError::InvalidArg(
                "table index must be strictly increasing".into(),
            ));
        }
        let mut seen = HashSet::new();
        for c in &columns {
            if c.values.len() != index.len() {
                return Err(TasaError::InvalidArg(format!(
                    "column '{}' has {} values for {} index rows",
                    c.name,
                    c.values.len(),
                    index.len()
                )));
            }
            if !c.filled.is_empty() && c.filled.len() != index.len() {
                return Err(TasaError::InvalidArg(format!(
                    "column '{}' fill mask has {} rows for {} index rows",
                    c.name,
                    c.filled.len(),
                    index.len()
                )));
            }
            if !seen.insert(c.name.as_str()) {
                return Err(TasaError::InvalidArg(format!(
                    "duplicate column name '{}'",
                    c.name
                )));
            }
        }
        Ok(Self { index, columns })
    }

    /// Table with no rows and no columns.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            index: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Date index, ascending.
    #[must_use]
    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    /// Columns in registration order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in registration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Look up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// True if a column with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Number of index rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Decompose into index and columns.
    #[must_use]
    pub fn into_parts(self) -> (Vec<NaiveDate>, Vec<Column>) {
        (self.index, self.columns)
    }

    fn require(&self, name: &str) -> Result<&Column, TasaError> {
        self.column(name)
            .ok_or_else(|| TasaError::missing_column(name))
    }

    /// The observed values of one column as a standalone series. Rows filled
    /// forward by the merge are left out.
    ///
    /// # Errors
    /// Returns `MissingColumn` if `name` is not in the table.
    pub fn series(&self, name: &str) -> Result<Series, TasaError> {
        let col = self.require(name)?;
        Ok(Series::new(
            name,
            self.index
                .iter()
                .enumerate()
                .filter_map(|(i, d)| col.observed(i).map(|v| Observation::new(*d, v))),
        ))
    }

    /// Value of a column at an exact index date.
    ///
    /// # Errors
    /// Returns `MissingColumn` if `name` is not in the table.
    pub fn value_at(&self, name: &str, date: NaiveDate) -> Result<Option<f64>, TasaError> {
        let col = self.require(name)?;
        Ok(self
            .index
            .binary_search(&date)
            .ok()
            .and_then(|i| col.values[i]))
    }

    /// Date of the first present value in a column.
    ///
    /// # Errors
    /// Returns `MissingColumn` if `name` is not in the table.
    pub fn first_valid_date(&self, name: &str) -> Result<Option<NaiveDate>, TasaError> {
        let col = self.require(name)?;
        Ok(self
            .index
            .iter()
            .zip(&col.values)
            .find(|(_, v)| v.is_some())
            .map(|(d, _)| *d))
    }

    /// The last `n` observed values of a column, oldest first.
    ///
    /// # Errors
    /// Returns `MissingColumn` if `name` is not in the table.
    pub fn recent(&self, name: &str, n: usize) -> Result<Vec<(NaiveDate, f64)>, TasaError> {
        let col = self.require(name)?;
        let mut out: Vec<(NaiveDate, f64)> = self
            .index
            .iter()
            .enumerate()
            .rev()
            .filter_map(|(i, d)| col.observed(i).map(|v| (*d, v)))
            .take(n)
            .collect();
        out.reverse();
        Ok(out)
    }

    /// Return a copy with columns renamed according to `renames`.
    ///
    /// Keys that are not column names are ignored.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the result would contain two columns with the
    /// same name.
    pub fn rename_columns(&self, renames: &HashMap<String, String>) -> Result<Self, TasaError> {
        let columns: Vec<Column> = self
            .columns
            .iter()
            .map(|c| Column {
                name: renames.get(&c.name).cloned().unwrap_or_else(|| c.name.clone()),
                ..c.clone()
            })
            .collect();
        Self::from_parts(self.index.clone(), columns)
    }

    /// Return a copy without the named columns. Unknown names are ignored.
    #[must_use]
    pub fn without_columns(&self, names: &[&str]) -> Self {
        Self {
            index: self.index.clone(),
            columns: self
                .columns
                .iter()
                .filter(|c| !names.contains(&c.name.as_str()))
                .cloned()
                .collect(),
        }
    }
}

/// Deterministic rename applied when an incoming name was already taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionNotice {
    /// Name the series was requested under.
    pub original: String,
    /// Name it was registered as.
    pub renamed: String,
    /// Source label used as the suffix.
    pub source_label: String,
}

/// One row of the release-history view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseRow {
    /// Observation date of the current value.
    pub date: NaiveDate,
    /// Reference period, e.g. `Mar 2024`.
    pub reference_period_label: String,
    /// Estimated publication period (one month after the reference period).
    pub estimated_publication_label: String,
    /// Value at `date`.
    pub current_value: f64,
    /// Value at the chronologically preceding row.
    pub prior_value: f64,
}
