// Re-export helpers so tests can `use helpers::*;`
pub mod scripted_connector;

pub use scripted_connector::ScriptedConnector;

use chrono::NaiveDate;
use tasa::{Series, SeriesMeta};

/// Calendar date from components; panics on invalid input.
pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid test date")
}

/// Monthly series on the first of each month starting at `y`-`m`.
pub fn monthly(name: &str, y: i32, m: u32, values: &[f64]) -> Series {
    let start = d(y, m, 1);
    Series::from_pairs(
        name,
        values.iter().enumerate().map(|(i, v)| {
            let date = start
                .checked_add_months(chrono::Months::new(u32::try_from(i).unwrap()))
                .unwrap();
            (date, *v)
        }),
    )
}

/// Statistics-API catalog entry whose display name equals its code.
pub fn stat(code: &str) -> SeriesMeta {
    SeriesMeta::statistics(code, code)
}
