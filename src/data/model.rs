use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a table column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common dataframe dtypes.
/// Group values key `HashSet`s and get sorted, so `CellValue` is `Ord + Hash`.
#[derive(Debug, Clone)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date string kept as text for simplicity.
    Date(String),
    Null,
}

// -- Manual Eq/Ord so Float cells are usable as group keys (total_cmp) --

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) | (Date(a), Date(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) | CellValue::Date(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            // integral floats keep one decimal: 3.0, not 3
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => write!(f, "null"),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` for plotting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Guess the type of a raw text cell.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }

    /// File stem used for the frame rendered from this group value.
    ///
    /// Path separators, characters reserved on common filesystems and control
    /// characters become `_`.
    pub fn file_stem(&self) -> String {
        let raw = self.to_string();
        let stem: String = raw
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect();
        if stem.is_empty() || stem == "." || stem == ".." {
            "_".to_string()
        } else {
            stem
        }
    }
}

// ---------------------------------------------------------------------------
// Table – ordered, named, positionally aligned columns
// ---------------------------------------------------------------------------

/// An in-memory table. Column-major; every column has `num_rows()` cells.
#[derive(Debug, Clone, Default)]
pub struct Table {
    column_names: Vec<String>,
    columns: Vec<Vec<CellValue>>,
}

impl Table {
    /// Build a table from named columns, validating their shape.
    pub fn new(column_names: Vec<String>, columns: Vec<Vec<CellValue>>) -> Result<Self> {
        if column_names.len() != columns.len() {
            return Err(Error::RaggedTable {
                column: "<header>".to_string(),
                expected: column_names.len(),
                found: columns.len(),
            });
        }
        let mut seen = HashSet::new();
        for name in &column_names {
            if !seen.insert(name.as_str()) {
                return Err(Error::DuplicateColumn(name.clone()));
            }
        }
        let expected = columns.first().map_or(0, Vec::len);
        for (name, col) in column_names.iter().zip(&columns) {
            if col.len() != expected {
                return Err(Error::RaggedTable {
                    column: name.clone(),
                    expected,
                    found: col.len(),
                });
            }
        }
        Ok(Table {
            column_names,
            columns,
        })
    }

    /// Build a table from row-major cells.
    pub fn from_rows(column_names: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self> {
        let mut columns: Vec<Vec<CellValue>> = column_names
            .iter()
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();
        for (row_no, row) in rows.into_iter().enumerate() {
            if row.len() != column_names.len() {
                return Err(Error::RaggedTable {
                    column: format!("<row {row_no}>"),
                    expected: column_names.len(),
                    found: row.len(),
                });
            }
            for (col, cell) in columns.iter_mut().zip(row) {
                col.push(cell);
            }
        }
        Table::new(column_names, columns)
    }

    /// Ordered column names.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Cells of one column.
    pub fn column(&self, name: &str) -> Result<&[CellValue]> {
        self.column_names
            .iter()
            .position(|c| c == name)
            .map(|idx| self.columns[idx].as_slice())
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    /// A column as `f64`. Missing cells become NaN; text cells are an error.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        self.column(name)?
            .iter()
            .enumerate()
            .map(|(row, cell)| match cell {
                CellValue::Null => Ok(f64::NAN),
                other => other.as_f64().ok_or_else(|| Error::NonNumeric {
                    column: name.to_string(),
                    row,
                    value: other.to_string(),
                }),
            })
            .collect()
    }

    /// New table holding only the given rows, in the given order.
    pub fn take_rows(&self, indices: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|col| indices.iter().map(|&i| col[i].clone()).collect())
            .collect();
        Table {
            column_names: self.column_names.clone(),
            columns,
        }
    }

    /// Promote columns mixing integer and float cells to all-float.
    pub fn unify_numeric_columns(&mut self) {
        for col in &mut self.columns {
            let has_float = col.iter().any(|c| matches!(c, CellValue::Float(_)));
            let has_int = col.iter().any(|c| matches!(c, CellValue::Integer(_)));
            if has_float && has_int {
                for cell in col.iter_mut() {
                    if let CellValue::Integer(i) = *cell {
                        *cell = CellValue::Float(i as f64);
                    }
                }
            }
        }
    }
}
