//! Date-indexed numeric series.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One observation. `None` marks an absent value, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Observation date.
    pub date: NaiveDate,
    /// Value, if present.
    pub value: Option<f64>,
}

impl Observation {
    /// Present observation.
    #[must_use]
    pub const fn new(date: NaiveDate, value: f64) -> Self {
        Self {
            date,
            value: Some(value),
        }
    }

    /// Absent observation.
    #[must_use]
    pub const fn absent(date: NaiveDate) -> Self {
        Self { date, value: None }
    }
}

/// Named, immutable series with strictly increasing dates.
///
/// Non-finite values are stored as absent. Derived series are new instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    name: String,
    points: Vec<Observation>,
}

impl Series {
    /// Build a series from observations in any order.
    ///
    /// Observations are sorted by date; for duplicate dates the first
    /// occurrence wins.
    pub fn new(name: impl Into<String>, points: impl IntoIterator<Item = Observation>) -> Self {
        let mut by_date: BTreeMap<NaiveDate, Option<f64>> = BTreeMap::new();
        for p in points {
            by_date
                .entry(p.date)
                .or_insert(p.value.filter(|v| v.is_finite()));
        }
        Self {
            name: name.into(),
            points: by_date
                .into_iter()
                .map(|(date, value)| Observation { date, value })
                .collect(),
        }
    }

    /// Build a series from present `(date, value)` pairs.
    pub fn from_pairs(
        name: impl Into<String>,
        pairs: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> Self {
        Self::new(
            name,
            pairs.into_iter().map(|(d, v)| Observation::new(d, v)),
        )
    }

    /// Empty series.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Observations in ascending date order.
    #[must_use]
    pub fn points(&self) -> &[Observation] {
        &self.points
    }

    /// Number of observations, absent ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when there are no observations at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when at least one value is present.
    #[must_use]
    pub fn has_values(&self) -> bool {
        self.points.iter().any(|p| p.value.is_some())
    }

    /// Dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    /// Values aligned with [`Series::dates`].
    pub fn values(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// Present `(date, value)` pairs only.
    pub fn present(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.points
            .iter()
            .filter_map(|p| p.value.map(|v| (p.date, v)))
    }

    /// Value at an exact date.
    #[must_use]
    pub fn value_at(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .and_then(|i| self.points[i].value)
    }

    /// Date of the first present value.
    #[must_use]
    pub fn first_valid_date(&self) -> Option<NaiveDate> {
        self.present().next().map(|(d, _)| d)
    }

    /// Date of the last present value.
    #[must_use]
    pub fn last_valid_date(&self) -> Option<NaiveDate> {
        self.points
            .iter()
            .rev()
            .find(|p| p.value.is_some())
            .map(|p| p.date)
    }

    /// Copy of this series under another name.
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: self.points.clone(),
        }
    }

    /// Same dates, new values. Extra values are ignored; missing ones are absent.
    #[must_use]
    pub fn with_values(&self, values: impl IntoIterator<Item = Option<f64>>) -> Self {
        let mut values = values.into_iter();
        Self {
            name: self.name.clone(),
            points: self
                .points
                .iter()
                .map(|p| Observation {
                    date: p.date,
                    value: values.next().flatten().filter(|v| v.is_finite()),
                })
                .collect(),
        }
    }

    /// Copy without observations strictly after `cutoff`.
    #[must_use]
    pub fn truncated_after(&self, cutoff: NaiveDate) -> Self {
        Self {
            name: self.name.clone(),
            points: self
                .points
                .iter()
                .copied()
                .filter(|p| p.date <= cutoff)
                .collect(),
        }
    }
}

/// A series tagged with the label used to disambiguate name collisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSeries {
    /// The series itself; its name is the requested display name.
    pub series: Series,
    /// Source label, e.g. `FRED UNRATE` or an upload file name.
    pub source_label: String,
}

impl LabeledSeries {
    /// Convenience constructor.
    pub fn new(series: Series, source_label: impl Into<String>) -> Self {
        Self {
            series,
            source_label: source_label.into(),
        }
    }
}
