//! Transform configuration: unit representation, target cadence, and bucket
//! aggregation.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TasaError;

/// Unit representation requested for a series.
///
/// Lagged variants compare against a positional predecessor: `*_yoy` means
/// twelve observations back, regardless of the calendar gap between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitTransform {
    /// Identity.
    #[default]
    Level,
    /// `v[t] - v[t-1]`.
    Diff,
    /// `v[t] - v[t-12]`.
    DiffYoy,
    /// `(v[t]/v[t-1] - 1) * 100`.
    PctChange,
    /// `(v[t]/v[t-12] - 1) * 100`.
    PctChangeYoy,
    /// `((v[t]/v[t-1])^12 - 1) * 100`.
    CompoundAnnualRate,
    /// `ln(v[t]/v[t-1]) * 100`.
    LogRate,
    /// `ln(v[t]/v[t-1]) * 1200`.
    LogRateAnnualized,
    /// `ln(v[t])`.
    NaturalLog,
}

impl UnitTransform {
    /// All variants in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Level,
        Self::Diff,
        Self::DiffYoy,
        Self::PctChange,
        Self::PctChangeYoy,
        Self::CompoundAnnualRate,
        Self::LogRate,
        Self::LogRateAnnualized,
        Self::NaturalLog,
    ];

    /// Number of leading observations that cannot be computed.
    #[must_use]
    pub const fn lag(self) -> usize {
        match self {
            Self::Level | Self::NaturalLog => 0,
            Self::DiffYoy | Self::PctChangeYoy => 12,
            Self::Diff
            | Self::PctChange
            | Self::CompoundAnnualRate
            | Self::LogRate
            | Self::LogRateAnnualized => 1,
        }
    }

    /// Stable snake-case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Level => "level",
            Self::Diff => "diff",
            Self::DiffYoy => "diff_yoy",
            Self::PctChange => "pct_change",
            Self::PctChangeYoy => "pct_change_yoy",
            Self::CompoundAnnualRate => "compound_annual_rate",
            Self::LogRate => "log_rate",
            Self::LogRateAnnualized => "log_rate_annualized",
            Self::NaturalLog => "natural_log",
        }
    }

    /// FRED `units` query code for this representation.
    #[must_use]
    pub const fn fred_code(self) -> &'static str {
        match self {
            Self::Level => "lin",
            Self::Diff => "chg",
            Self::DiffYoy => "ch1",
            Self::PctChange => "pch",
            Self::PctChangeYoy => "pc1",
            Self::CompoundAnnualRate => "pca",
            Self::LogRate => "cch",
            Self::LogRateAnnualized => "cca",
            Self::NaturalLog => "log",
        }
    }

    /// Parse a FRED `units` code.
    #[must_use]
    pub fn from_fred_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.fred_code().eq_ignore_ascii_case(code.trim()))
    }
}

impl fmt::Display for UnitTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitTransform {
    type Err = TasaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .or_else(|| Self::from_fred_code(s))
            .ok_or_else(|| TasaError::InvalidArg(format!("unknown unit transform '{s}'")))
    }
}

/// Calendar-aligned target cadence for resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// One bucket per calendar day.
    Daily,
    /// Weeks starting Monday.
    Weekly,
    /// Calendar months.
    Monthly,
    /// Calendar quarters starting Jan/Apr/Jul/Oct.
    Quarterly,
    /// Half-years starting Jan/Jul.
    Semiannual,
    /// Calendar years.
    Annual,
}

impl Frequency {
    /// Stable snake-case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Semiannual => "semiannual",
            Self::Annual => "annual",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reduction applied to the observations of one resample bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Arithmetic mean.
    #[default]
    Mean,
    /// Sum.
    Sum,
    /// Chronologically latest observation.
    Last,
    /// Chronologically earliest observation.
    First,
    /// Maximum.
    Max,
    /// Minimum.
    Min,
}

impl Aggregation {
    /// Stable snake-case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Sum => "sum",
            Self::Last => "last",
            Self::First => "first",
            Self::Max => "max",
            Self::Min => "min",
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-series transform selection.
///
/// Applied in order: resample (if `target_frequency` is set), unit transform,
/// then the custom formula.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransformSpec {
    /// Unit representation.
    pub unit_transform: UnitTransform,
    /// Optional coarser cadence.
    pub target_frequency: Option<Frequency>,
    /// Bucket reduction used when resampling.
    pub aggregation: Aggregation,
    /// Optional arithmetic expression over the placeholder `x`.
    pub custom_formula: Option<String>,
}

impl TransformSpec {
    /// Transform that only changes units.
    #[must_use]
    pub fn units(unit_transform: UnitTransform) -> Self {
        Self {
            unit_transform,
            ..Self::default()
        }
    }

    /// Set the resample target.
    #[must_use]
    pub fn resampled(mut self, frequency: Frequency, aggregation: Aggregation) -> Self {
        self.target_frequency = Some(frequency);
        self.aggregation = aggregation;
        self
    }

    /// Attach a custom formula.
    #[must_use]
    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.custom_formula = Some(formula.into());
        self
    }

    /// True when applying this transform leaves a series unchanged.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.unit_transform == UnitTransform::Level
            && self.target_frequency.is_none()
            && self.custom_formula.is_none()
    }
}
