//! Outer join of labeled series into one table, with collision renames, the
//! future cut and forward-fill. Filled rows are flagged on each column so
//! views can tell them from observations.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;

use crate::timeseries::transform::apply_spec;
use crate::{CollisionNotice, Column, LabeledSeries, MergedTable, Series, TasaError, TransformSpec};

/// Knobs for [`merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    /// Forward-fill each column after the join.
    pub forward_fill: bool,
    /// Rows dated strictly after this are dropped.
    pub now: NaiveDate,
}

impl MergeOptions {
    /// No forward-fill, cut at `now`.
    #[must_use]
    pub const fn at(now: NaiveDate) -> Self {
        Self {
            forward_fill: false,
            now,
        }
    }

    /// Toggle forward-fill.
    #[must_use]
    pub const fn forward_fill(mut self, yes: bool) -> Self {
        self.forward_fill = yes;
        self
    }
}

/// Output of [`merge`]: the table plus what was changed to build it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergeOutcome {
    /// Outer-joined table.
    pub table: MergedTable,
    /// Renames applied, in input order.
    pub collisions: Vec<CollisionNotice>,
    /// Distinct dates removed for being after `now`.
    pub dropped_future: usize,
}

fn unique_name(taken: &HashSet<String>, name: &str, label: &str) -> String {
    let base = format!("{name} ({label})");
    if !taken.contains(&base) {
        return base;
    }
    (2..)
        .map(|n| format!("{name} ({label} {n})"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(base)
}

/// Outer-join `inputs` into one date-aligned table.
///
/// Inputs are registered in order; the first keeps its bare name and later
/// duplicates are renamed `"{name} ({source_label})"`. The index is the
/// ascending union of every input date up to and including `opts.now`.
#[must_use]
pub fn merge<I>(inputs: I, opts: &MergeOptions) -> MergeOutcome
where
    I: IntoIterator<Item = LabeledSeries>,
{
    let mut taken: HashSet<String> = HashSet::new();
    let mut collisions = Vec::new();
    let mut named: Vec<(String, LabeledSeries)> = Vec::new();
    let mut future: BTreeSet<NaiveDate> = BTreeSet::new();
    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();

    for input in inputs {
        let requested = input.series.name().to_string();
        let name = if taken.contains(&requested) {
            let renamed = unique_name(&taken, &requested, &input.source_label);
            tracing::warn!(
                original = %requested,
                renamed = %renamed,
                source = %input.source_label,
                "series name collision; renamed"
            );
            collisions.push(CollisionNotice {
                original: requested,
                renamed: renamed.clone(),
                source_label: input.source_label.clone(),
            });
            renamed
        } else {
            requested
        };
        taken.insert(name.clone());
        for d in input.series.dates() {
            if d > opts.now {
                future.insert(d);
            } else {
                dates.insert(d);
            }
        }
        named.push((name, input));
    }

    if !future.is_empty() {
        tracing::debug!(count = future.len(), now = %opts.now, "dropped future-dated rows");
    }

    let index: Vec<NaiveDate> = dates.into_iter().collect();
    let columns = named
        .into_iter()
        .map(|(name, input)| {
            let mut values = align(&index, &input.series);
            let filled = if opts.forward_fill {
                fill_forward(&mut values)
            } else {
                Vec::new()
            };
            Column {
                name,
                source_label: input.source_label,
                values,
                filled: sparse_mask(filled),
            }
        })
        .collect();

    MergeOutcome {
        table: MergedTable::from_parts(index, columns).unwrap_or_default(),
        collisions,
        dropped_future: future.len(),
    }
}

// Both inputs are sorted ascending; walk them together.
fn align(index: &[NaiveDate], series: &Series) -> Vec<Option<f64>> {
    let mut out = vec![None; index.len()];
    let mut points = series.points().iter().peekable();
    for (slot, d) in out.iter_mut().zip(index) {
        while points.next_if(|p| p.date < *d).is_some() {}
        if let Some(p) = points.next_if(|p| p.date == *d) {
            *slot = p.value;
        }
    }
    out
}

// Returns which slots were filled.
fn fill_forward(values: &mut [Option<f64>]) -> Vec<bool> {
    let mut last = None;
    values
        .iter_mut()
        .map(|v| match v {
            Some(x) => {
                last = Some(*x);
                false
            }
            None => {
                *v = last;
                last.is_some()
            }
        })
        .collect()
}

fn sparse_mask(filled: Vec<bool>) -> Vec<bool> {
    if filled.iter().any(|f| *f) {
        filled
    } else {
        Vec::new()
    }
}

/// Forward-fill every column of `table`, returning a new table.
///
/// Filled rows are flagged, so `MergedTable::series` and the release view
/// still see only observed values.
#[must_use]
pub fn forward_filled(table: &MergedTable) -> MergedTable {
    let (index, mut columns) = table.clone().into_parts();
    for c in &mut columns {
        let newly = fill_forward(&mut c.values);
        let filled = if c.filled.is_empty() {
            newly
        } else {
            c.filled.iter().zip(newly).map(|(old, new)| *old || new).collect()
        };
        c.filled = sparse_mask(filled);
    }
    MergedTable::from_parts(index, columns).unwrap_or_else(|_| table.clone())
}

// `to` is a superset of `from`. Filled columns stay filled across new rows.
fn reindex(from: &[NaiveDate], to: &[NaiveDate], col: &Column) -> Column {
    let mut values = vec![None; to.len()];
    let mut filled = vec![false; to.len()];
    for (i, d) in from.iter().enumerate() {
        if let Ok(j) = to.binary_search(d) {
            values[j] = col.values[i];
            filled[j] = col.filled.get(i).copied().unwrap_or(false);
        }
    }
    if col.has_filled() {
        let newly = fill_forward(&mut values);
        for (f, n) in filled.iter_mut().zip(newly) {
            *f |= n;
        }
    }
    Column {
        name: col.name.clone(),
        source_label: col.source_label.clone(),
        values,
        filled: sparse_mask(filled),
    }
}

/// Append a transformed copy of column `from` as `name`.
///
/// The transform runs on the observed values of `from`, so positional lags
/// count that column's own observations rather than union or filled rows.
/// If `from` was forward-filled, the derived column is filled the same way.
///
/// # Errors
/// - `MissingColumn` if `from` is not in `table`.
/// - `InvalidArg` if `name` is already a column.
pub fn with_derived_column(
    table: &MergedTable,
    name: &str,
    from: &str,
    spec: &TransformSpec,
) -> Result<MergedTable, TasaError> {
    let source_col = table
        .column(from)
        .ok_or_else(|| TasaError::missing_column(from))?;
    if table.contains(name) {
        return Err(TasaError::InvalidArg(format!("column '{name}' already exists")));
    }
    let derived = apply_spec(&table.series(from)?, spec);

    let index: Vec<NaiveDate> = table
        .index()
        .iter()
        .copied()
        .chain(derived.dates())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let mut columns: Vec<Column> = table
        .columns()
        .iter()
        .map(|c| reindex(table.index(), &index, c))
        .collect();

    let mut values = align(&index, &derived);
    let filled = if source_col.has_filled() {
        fill_forward(&mut values)
    } else {
        Vec::new()
    };
    columns.push(Column {
        name: name.to_string(),
        source_label: source_col.source_label.clone(),
        values,
        filled: sparse_mask(filled),
    });
    MergedTable::from_parts(index, columns)
}
