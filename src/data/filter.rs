use std::collections::HashSet;

use super::model::{CellValue, Table};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Slicing: rows where one column equals a value
// ---------------------------------------------------------------------------

/// Return indices of rows whose `column` cell equals `value`, in row order.
pub fn slice_indices(table: &Table, column: &str, value: &CellValue) -> Result<Vec<usize>> {
    Ok(table
        .column(column)?
        .iter()
        .enumerate()
        .filter(|(_, cell)| *cell == value)
        .map(|(i, _)| i)
        .collect())
}

/// Sub-table of the rows where `column == value`, original row order kept.
pub fn extract_slice(table: &Table, column: &str, value: &CellValue) -> Result<Table> {
    let indices = slice_indices(table, column, value)?;
    Ok(table.take_rows(&indices))
}

/// Distinct values of a column in the order they first appear.
pub fn distinct_values(table: &Table, column: &str) -> Result<Vec<CellValue>> {
    let mut seen = HashSet::new();
    Ok(table
        .column(column)?
        .iter()
        .filter(|cell| seen.insert(*cell))
        .cloned()
        .collect())
}

// ---------------------------------------------------------------------------
// Shared axis bounds
// ---------------------------------------------------------------------------

/// Min/max over the finite values of one or more numeric columns.
///
/// Missing cells are skipped. `None` when no column holds a finite value
/// (for example an empty table).
pub fn numeric_bounds<S: AsRef<str>>(table: &Table, columns: &[S]) -> Result<Option<(f64, f64)>> {
    let mut bounds: Option<(f64, f64)> = None;
    for column in columns {
        for v in table.numeric_column(column.as_ref())? {
            if !v.is_finite() {
                continue;
            }
            bounds = Some(match bounds {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            });
        }
    }
    Ok(bounds)
}
