//! Series metadata: where a series comes from and how to display it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Frequency, UnitTransform};

/// Upstream family a series is fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Macro statistics API (FRED).
    StatisticsApi,
    /// Central-bank API (BCCh SIETE).
    CentralBankApi,
    /// A table supplied by the user.
    UserUpload,
}

impl SourceKind {
    /// Short label used in source attributions.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::StatisticsApi => "FRED",
            Self::CentralBankApi => "BCCh",
            Self::UserUpload => "upload",
        }
    }
}

/// Display category. Market series are high-frequency and get no release table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesCategory {
    /// Periodic macro release (monthly/weekly statistics).
    #[default]
    Macro,
    /// Daily market quote.
    Market,
}

/// Static description of a catalog series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesMeta {
    /// Unique display name.
    pub display_name: String,
    /// Upstream family.
    pub source_kind: SourceKind,
    /// Source codes tried in order; the first non-empty result wins.
    /// For uploads this holds the file label.
    pub source_codes: Vec<String>,
    /// Values are percentages.
    pub is_percent: bool,
    /// Unit representation the series is shown in by default.
    pub native_unit_transform: UnitTransform,
    /// Expected native cadence, if known.
    pub frequency_hint: Option<Frequency>,
    /// Preferred start of history, if narrower than the global default.
    pub recommended_start: Option<NaiveDate>,
    /// Display category.
    pub category: SeriesCategory,
}

impl SeriesMeta {
    /// Statistics-API series with a single code, level units.
    pub fn statistics(display_name: impl Into<String>, code: impl Into<String>) -> Self {
        Self::with_source(display_name, SourceKind::StatisticsApi, vec![code.into()])
    }

    /// Central-bank series with a single code, level units.
    pub fn central_bank(display_name: impl Into<String>, code: impl Into<String>) -> Self {
        Self::with_source(display_name, SourceKind::CentralBankApi, vec![code.into()])
    }

    /// Synthesized metadata for an uploaded column.
    pub fn upload(display_name: impl Into<String>, file_label: impl Into<String>) -> Self {
        let display_name = display_name.into();
        let is_percent = display_name.contains('%');
        Self {
            is_percent,
            ..Self::with_source(display_name, SourceKind::UserUpload, vec![file_label.into()])
        }
    }

    fn with_source(
        display_name: impl Into<String>,
        source_kind: SourceKind,
        source_codes: Vec<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            source_kind,
            source_codes,
            is_percent: false,
            native_unit_transform: UnitTransform::Level,
            frequency_hint: None,
            recommended_start: None,
            category: SeriesCategory::Macro,
        }
    }

    /// Append a fallback code.
    #[must_use]
    pub fn fallback_code(mut self, code: impl Into<String>) -> Self {
        self.source_codes.push(code.into());
        self
    }

    /// Set the percent flag.
    #[must_use]
    pub const fn percent(mut self, yes: bool) -> Self {
        self.is_percent = yes;
        self
    }

    /// Set the native unit transform.
    #[must_use]
    pub const fn units(mut self, units: UnitTransform) -> Self {
        self.native_unit_transform = units;
        self
    }

    /// Set the expected cadence.
    #[must_use]
    pub const fn frequency(mut self, frequency: Frequency) -> Self {
        self.frequency_hint = Some(frequency);
        self
    }

    /// Set the recommended history start.
    #[must_use]
    pub const fn start(mut self, start: NaiveDate) -> Self {
        self.recommended_start = Some(start);
        self
    }

    /// Set the display category.
    #[must_use]
    pub const fn category(mut self, category: SeriesCategory) -> Self {
        self.category = category;
        self
    }

    /// Primary source code.
    #[must_use]
    pub fn primary_code(&self) -> &str {
        self.source_codes.first().map_or("", String::as_str)
    }

    /// Codes joined for diagnostics.
    #[must_use]
    pub fn joined_codes(&self) -> String {
        self.source_codes.join(",")
    }

    /// Attribution label, e.g. `FRED UNRATE`; uploads use their file label.
    #[must_use]
    pub fn source_label(&self) -> String {
        match self.source_kind {
            SourceKind::UserUpload => self.primary_code().to_string(),
            kind => format!("{} {}", kind.label(), self.primary_code()),
        }
    }
}
