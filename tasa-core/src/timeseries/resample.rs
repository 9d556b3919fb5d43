use chrono::{Datelike, Days, NaiveDate};

use crate::{Aggregation, Frequency, Observation, Series};

/// Calendar-aligned bucket start containing `date`.
///
/// Weeks start on Monday; quarters on Jan/Apr/Jul/Oct; half-years on Jan/Jul.
#[must_use]
pub fn bucket_start(date: NaiveDate, freq: Frequency) -> NaiveDate {
    let first_of = |month: u32| NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date);
    match freq {
        Frequency::Daily => date,
        Frequency::Weekly => date
            .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
            .unwrap_or(date),
        Frequency::Monthly => first_of(date.month()),
        Frequency::Quarterly => first_of((date.month() - 1) / 3 * 3 + 1),
        Frequency::Semiannual => first_of(if date.month() <= 6 { 1 } else { 7 }),
        Frequency::Annual => first_of(1),
    }
}

fn reduce(values: &[f64], agg: Aggregation) -> Option<f64> {
    let (&first, &last) = (values.first()?, values.last()?);
    let v = match agg {
        Aggregation::First => first,
        Aggregation::Last => last,
        Aggregation::Sum => values.iter().sum(),
        #[allow(clippy::cast_precision_loss)]
        Aggregation::Mean => values.iter().sum::<f64>() / values.len() as f64,
        Aggregation::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        Aggregation::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
    };
    Some(v)
}

/// Resample `series` to `freq`, reducing each bucket with `agg`.
///
/// Rows are labeled by bucket start. Absent observations are ignored and a
/// bucket without any present value produces no row.
#[must_use]
pub fn resample(series: &Series, freq: Frequency, agg: Aggregation) -> Series {
    let mut out: Vec<Observation> = Vec::new();
    let mut bucket: Option<NaiveDate> = None;
    let mut acc: Vec<f64> = Vec::new();

    let mut flush = |bucket: Option<NaiveDate>, acc: &mut Vec<f64>| {
        if let (Some(b), Some(v)) = (bucket, reduce(acc, agg)) {
            out.push(Observation::new(b, v));
        }
        acc.clear();
    };

    for (date, value) in series.present() {
        let b = bucket_start(date, freq);
        if bucket != Some(b) {
            flush(bucket, &mut acc);
            bucket = Some(b);
        }
        acc.push(value);
    }
    flush(bucket, &mut acc);

    Series::new(series.name(), out)
}
