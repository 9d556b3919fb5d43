//! NBER recession periods and chart window helpers.

use chrono::NaiveDate;

use crate::MergedTable;

/// US recessions as (first month, last month), per the NBER chronology.
pub const NBER_RECESSIONS: [((i32, u32), (i32, u32)); 12] = [
    ((1948, 11), (1949, 10)),
    ((1953, 7), (1954, 5)),
    ((1957, 8), (1958, 4)),
    ((1960, 4), (1961, 2)),
    ((1969, 12), (1970, 11)),
    ((1973, 11), (1975, 3)),
    ((1980, 1), (1980, 7)),
    ((1981, 7), (1982, 11)),
    ((1990, 7), (1991, 3)),
    ((2001, 3), (2001, 11)),
    ((2007, 12), (2009, 6)),
    ((2020, 2), (2020, 4)),
];

/// Start used when none of the charted columns has data.
pub const DEFAULT_WINDOW_START: (i32, u32, u32) = (2000, 1, 1);

fn month(ym: (i32, u32)) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(ym.0, ym.1, 1)
}

/// Recession bands ending after `first_valid`, clipped to `[first_valid, now]`.
#[must_use]
pub fn recession_bands(first_valid: NaiveDate, now: NaiveDate) -> Vec<(NaiveDate, NaiveDate)> {
    NBER_RECESSIONS
        .iter()
        .filter_map(|&(s, e)| Some((month(s)?, month(e)?)))
        .filter(|(_, e)| *e > first_valid)
        .map(|(s, e)| (s.max(first_valid), e.min(now)))
        .filter(|(s, e)| s <= e)
        .collect()
}

/// Visible x-range for the charted `columns`: the earliest first present
/// date among them (or 2000-01-01 when none has data) through `now`.
/// Missing columns are skipped.
#[must_use]
pub fn visible_window(table: &MergedTable, columns: &[&str], now: NaiveDate) -> (NaiveDate, NaiveDate) {
    let (y, m, d) = DEFAULT_WINDOW_START;
    let fallback = NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN);
    let start = columns
        .iter()
        .filter_map(|c| table.first_valid_date(c).ok().flatten())
        .filter(|d| *d <= now)
        .min()
        .unwrap_or(fallback);
    (start, now)
}
