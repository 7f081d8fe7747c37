//! Distribution statistics for numeric metrics columns.
//!
//! Percentiles use linear interpolation between closest ranks: for quantile
//! `q` over `n` sorted values the position is `q * (n - 1)`, and the result is
//! interpolated between the values at the floor and ceiling of that position.

use zonalyss_core::{ScoreStats, ScoreSummary};

use crate::metrics::MetricsTable;
use crate::values::{is_missing, parse_number};

/// Numeric view of a column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericColumn {
    pub values: Vec<f64>,
    /// Non-missing cells that are not finite numbers.
    pub non_numeric: u64,
}

impl NumericColumn {
    pub fn from_cells<'a>(cells: impl IntoIterator<Item = &'a str>) -> Self {
        let mut column = Self::default();
        for cell in cells {
            if is_missing(cell) {
                continue;
            }
            match parse_number(cell) {
                Some(value) => column.values.push(value),
                None => column.non_numeric += 1,
            }
        }
        column
    }
}

/// Summarize `column`; the empty summary when it is absent or has no numeric values.
pub fn summarize_column(table: &MetricsTable, column: &str) -> ScoreSummary {
    match table.column(column) {
        Some(cells) => summarize(&NumericColumn::from_cells(cells).values),
        None => ScoreSummary::empty(),
    }
}

pub fn summarize(values: &[f64]) -> ScoreSummary {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    describe(&sorted).map_or_else(ScoreSummary::empty, ScoreSummary::Stats)
}

fn describe(sorted: &[f64]) -> Option<ScoreStats> {
    let (&min, &max) = (sorted.first()?, sorted.last()?);
    let count = sorted.len();
    Some(ScoreStats {
        count: count as u64,
        min,
        p25: quantile(sorted, 0.25)?,
        median: quantile(sorted, 0.5)?,
        p75: quantile(sorted, 0.75)?,
        max,
        mean: sorted.iter().sum::<f64>() / count as f64,
    })
}

/// Linear-interpolated quantile of ascending `sorted`; `None` when it is empty.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let position = q.clamp(0.0, 1.0) * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}
