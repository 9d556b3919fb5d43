//! Value and period label formatting for tabular views.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Suffix and precision used to render a series' values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatSettings {
    /// Appended to every rendered value (`"%"` or empty).
    pub suffix: &'static str,
    /// Fixed number of decimals.
    pub decimals: usize,
}

impl FormatSettings {
    /// Two decimals, with a `%` suffix when `percent`.
    #[must_use]
    pub const fn for_percent(percent: bool) -> Self {
        Self {
            suffix: if percent { "%" } else { "" },
            decimals: 2,
        }
    }

    /// True when values carry a percent suffix.
    #[must_use]
    pub fn is_percent(&self) -> bool {
        self.suffix == "%"
    }

    /// Render a value: fixed decimals, an all-zero fraction dropped, suffix
    /// appended. Absent values render as an empty string.
    #[must_use]
    pub fn format_value(&self, value: Option<f64>) -> String {
        let Some(v) = value.filter(|v| v.is_finite()) else {
            return String::new();
        };
        let mut txt = format!("{v:.prec$}", prec = self.decimals);
        if self.decimals > 0 {
            let zeros = format!(".{}", "0".repeat(self.decimals));
            if let Some(stripped) = txt.strip_suffix(&zeros) {
                txt = stripped.to_string();
            }
        }
        if txt == "-0" {
            txt = "0".into();
        }
        txt.push_str(self.suffix);
        txt
    }
}

/// Month-name table used for period labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MonthLocale {
    /// `Ene Feb Mar Abr May Jun Jul Ago Sep Oct Nov Dic`.
    #[default]
    Spanish,
    /// `Jan Feb Mar ... Dec`.
    English,
}

const ES: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];
const EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl MonthLocale {
    /// Abbreviation for a 1-based month; empty for out-of-range input.
    #[must_use]
    pub fn month_abbrev(self, month: u32) -> &'static str {
        let table = match self {
            Self::Spanish => &ES,
            Self::English => &EN,
        };
        month
            .checked_sub(1)
            .and_then(|i| table.get(i as usize))
            .copied()
            .unwrap_or("")
    }

    /// `"{month-abbrev} {year}"` for the month containing `date`.
    #[must_use]
    pub fn period_label(self, date: NaiveDate) -> String {
        format!("{} {}", self.month_abbrev(date.month()), date.year())
    }
}
