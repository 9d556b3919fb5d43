//! Deterministic synthetic series for the catalog codes.
//!
//! Values follow a compounding trend plus a sine wave so that every unit
//! transform yields non-trivial output. Nothing here resembles real data.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use tasa_core::{Observation, Series};

#[derive(Clone, Copy)]
enum Cadence {
    /// Weekdays only.
    Daily,
    /// Saturdays.
    Weekly,
    /// First of each month.
    Monthly,
}

impl Cadence {
    const fn periods_per_year(self) -> f64 {
        match self {
            Self::Daily => 252.0,
            Self::Weekly => 52.0,
            Self::Monthly => 12.0,
        }
    }
}

struct Fixture {
    code: &'static str,
    cadence: Cadence,
    base: f64,
    annual_growth_pct: f64,
    wave: f64,
}

const fn fx(
    code: &'static str,
    cadence: Cadence,
    base: f64,
    annual_growth_pct: f64,
    wave: f64,
) -> Fixture {
    Fixture {
        code,
        cadence,
        base,
        annual_growth_pct,
        wave,
    }
}

const FIXTURES: &[Fixture] = &[
    // FRED
    fx("UNRATE", Cadence::Monthly, 4.2, 0.0, 0.6),
    fx("CIVPART", Cadence::Monthly, 62.8, 0.0, 0.3),
    fx("PAYEMS", Cadence::Monthly, 150_000.0, 1.4, 120.0),
    fx("ICSA", Cadence::Weekly, 225_000.0, 0.5, 9_000.0),
    fx("PCEPI", Cadence::Monthly, 110.0, 2.3, 0.2),
    fx("CPIAUCSL", Cadence::Monthly, 250.0, 2.8, 0.4),
    fx("WALCL", Cadence::Weekly, 4_500_000.0, 6.0, 40_000.0),
    fx("M2SL", Cadence::Monthly, 14_000.0, 5.5, 30.0),
    fx("INDPRO", Cadence::Monthly, 101.0, 0.8, 0.9),
    fx("DGS10", Cadence::Daily, 3.9, 0.0, 0.35),
    fx("DGS2", Cadence::Daily, 4.3, 0.0, 0.45),
    fx("FEDFUNDS", Cadence::Monthly, 2.5, 0.0, 1.5),
    fx("VIXCLS", Cadence::Daily, 17.0, 0.0, 4.0),
    // BCCh SIETE
    fx("F073.TCO.PRE.Z.D", Cadence::Daily, 870.0, 1.5, 25.0),
    fx("F022.TPM.TIN.D001.NO.Z.D", Cadence::Daily, 6.0, 0.0, 1.2),
    fx("F074.IPC.VAR.Z.Z.C.M", Cadence::Monthly, 0.3, 0.0, 0.25),
    fx("F032.IMC.IND.Z.Z.EP18.Z.Z.0.M", Cadence::Monthly, 104.0, 2.0, 1.8),
];

fn dates(cadence: Cadence) -> Vec<NaiveDate> {
    let ymd = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN);
    let mut out = Vec::new();
    match cadence {
        Cadence::Monthly => {
            let end = ymd(2024, 12, 1);
            let mut d = ymd(2015, 1, 1);
            while d <= end {
                out.push(d);
                let Some(next) = d.checked_add_months(Months::new(1)) else {
                    break;
                };
                d = next;
            }
        }
        Cadence::Weekly => {
            let end = ymd(2024, 12, 28);
            let mut d = ymd(2019, 1, 5);
            while d <= end {
                out.push(d);
                let Some(next) = d.checked_add_days(Days::new(7)) else {
                    break;
                };
                d = next;
            }
        }
        Cadence::Daily => {
            let end = ymd(2024, 12, 31);
            let mut d = ymd(2023, 1, 2);
            while d <= end {
                if !matches!(d.weekday(), Weekday::Sat | Weekday::Sun) {
                    out.push(d);
                }
                let Some(next) = d.succ_opt() else {
                    break;
                };
                d = next;
            }
        }
    }
    out
}

#[allow(clippy::cast_precision_loss)]
fn build(f: &Fixture) -> Series {
    let growth = 1.0 + f.annual_growth_pct / 100.0;
    let ppy = f.cadence.periods_per_year();
    let points = dates(f.cadence).into_iter().enumerate().map(|(i, date)| {
        // Daily series skip New Year's Day like the real market feeds.
        if matches!(f.cadence, Cadence::Daily) && date.month() == 1 && date.day() == 1 {
            return Observation::absent(date);
        }
        let t = i as f64;
        let v = f.base * growth.powf(t / ppy) + f.wave * (t * 0.7).sin();
        Observation::new(date, (v * 10_000.0).round() / 10_000.0)
    });
    Series::new(f.code, points)
}

/// Fixture series for `code`, named after the code.
pub fn by_code(code: &str) -> Option<Series> {
    FIXTURES.iter().find(|f| f.code == code).map(build)
}

/// Every code with a fixture.
pub fn codes() -> impl Iterator<Item = &'static str> {
    FIXTURES.iter().map(|f| f.code)
}
