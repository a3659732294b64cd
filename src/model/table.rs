//! Table, Row, and Cell data structures

use std::borrow::Cow;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::schema::Column;
use crate::error::{PipelineError, Result};

/// A single cell value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Float(f64),
    String(String),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Float(a), CellValue::Float(b)) => a.to_bits() == b.to_bits() || a == b,
            (CellValue::String(a), CellValue::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Null => {}
            // +0.0 and -0.0 compare equal, so they must hash equal too
            CellValue::Float(f) => {
                let f = if *f == 0.0 { 0.0 } else { *f };
                f.to_bits().hash(state)
            }
            CellValue::String(s) => s.hash(state),
        }
    }
}

impl CellValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Render the value as it is written to CSV output.
    ///
    /// Null renders empty; whole floats keep one decimal place (`16.0`).
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed(""),
            CellValue::Float(f) => Cow::Owned(format_float(*f)),
            CellValue::String(s) => Cow::Borrowed(s.as_str()),
        }
    }
}

fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

/// A row in the table
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Cell values in column order
    pub cells: Vec<CellValue>,
    /// Original line number in the source text (1-indexed, 0 for derived rows)
    pub source_line: usize,
}

impl Row {
    pub fn new(cells: Vec<CellValue>, source_line: usize) -> Self {
        Self { cells, source_line }
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }

    /// Number of distinct non-null values in the row
    pub fn distinct_values(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| !c.is_null())
            .collect::<FxHashSet<_>>()
            .len()
    }
}

/// A rectangular table: named columns plus rows of equal arity
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Column definitions
    pub columns: Vec<Column>,
    /// All rows in the table
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a new empty table with column definitions
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Create a table from column names, rejecting duplicates
    pub fn with_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<Column> = names.into_iter().map(Column::new).collect();
        super::schema::ensure_unique(&columns)?;
        Ok(Self::new(columns))
    }

    /// Add a row, padding short rows with nulls
    pub fn add_row(&mut self, mut cells: Vec<CellValue>, source_line: usize) -> Result<()> {
        let expected = self.column_count();
        if cells.len() > expected {
            return Err(PipelineError::RaggedRow {
                line: source_line,
                expected,
                found: cells.len(),
            });
        }
        cells.resize(expected, CellValue::Null);
        self.rows.push(Row::new(cells, source_line));
        Ok(())
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get column index by name, failing if absent
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Keep only the named columns, in the given order
    pub fn select(&mut self, names: &[&str]) -> Result<()> {
        let indices = names
            .iter()
            .map(|n| self.require_column(n))
            .collect::<Result<Vec<_>>>()?;

        let columns: Vec<Column> = names.iter().map(|n| Column::new(*n)).collect();
        super::schema::ensure_unique(&columns)?;

        for row in &mut self.rows {
            row.cells = indices.iter().map(|&i| row.cells[i].clone()).collect();
        }
        self.columns = columns;
        Ok(())
    }

    /// Rename a column
    pub fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        let idx = self.require_column(from)?;
        if from != to && self.column_index(to).is_some() {
            return Err(PipelineError::DuplicateColumn(to.to_string()));
        }
        self.columns[idx].name = to.to_string();
        Ok(())
    }

    /// Remove a column
    pub fn drop_column(&mut self, name: &str) -> Result<()> {
        let idx = self.require_column(name)?;
        self.columns.remove(idx);
        for row in &mut self.rows {
            row.cells.remove(idx);
        }
        Ok(())
    }

    /// Remove duplicate rows, keeping the first occurrence
    pub fn dedup(&mut self) {
        let mut seen: FxHashSet<Vec<CellValue>> = FxHashSet::default();
        self.rows.retain(|row| seen.insert(row.cells.clone()));
    }

    /// Stable sort of rows by a column's displayed value
    pub fn sort_by_column(&mut self, column_name: &str) -> Result<()> {
        let col_idx = self.require_column(column_name)?;
        self.rows.sort_by(|a, b| match (a.get(col_idx), b.get(col_idx)) {
            (Some(CellValue::Float(a)), Some(CellValue::Float(b))) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (Some(a), Some(b)) => a.display().cmp(&b.display()),
            _ => Ordering::Equal,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::with_names(["a", "b", "c"]).unwrap();
        table.add_row(vec!["1".into(), "x".into(), "p".into()], 2).unwrap();
        table.add_row(vec!["2".into(), "y".into()], 3).unwrap();
        table
    }

    #[test]
    fn test_add_row_pads_short_rows() {
        let table = sample();
        assert_eq!(table.rows[1].cells[2], CellValue::Null);
    }

    #[test]
    fn test_add_row_rejects_long_rows() {
        let mut table = sample();
        let err = table
            .add_row(vec!["1".into(), "2".into(), "3".into(), "4".into()], 9)
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::RaggedRow { line: 9, expected: 3, found: 4 }
        ));
    }

    #[test]
    fn test_select_reorders() {
        let mut table = sample();
        table.select(&["c", "a"]).unwrap();
        assert_eq!(table.column_names(), vec!["c", "a"]);
        assert_eq!(
            table.rows[0].cells,
            vec![CellValue::from("p"), CellValue::from("1")]
        );
    }

    #[test]
    fn test_select_missing_column() {
        let mut table = sample();
        assert!(matches!(
            table.select(&["nope"]),
            Err(PipelineError::MissingColumn(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_drop_and_rename() {
        let mut table = sample();
        table.drop_column("b").unwrap();
        table.rename("c", "d").unwrap();
        assert_eq!(table.column_names(), vec!["a", "d"]);
        assert_eq!(table.rows[0].cells.len(), 2);
        assert!(table.rename("a", "d").is_err());
    }

    #[test]
    fn test_dedup_keeps_first() {
        let mut table = Table::with_names(["a"]).unwrap();
        for (i, v) in ["x", "y", "x"].iter().enumerate() {
            table.add_row(vec![(*v).into()], i + 2).unwrap();
        }
        table.dedup();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[1].source_line, 3);
    }

    #[test]
    fn test_distinct_values_ignores_null() {
        let row = Row::new(vec!["".into(), CellValue::Null, CellValue::Null], 1);
        assert_eq!(row.distinct_values(), 1);
    }

    #[test]
    fn test_float_display() {
        assert_eq!(CellValue::Float(16.0).display(), "16.0");
        assert_eq!(CellValue::Float(45.6).display(), "45.6");
        assert_eq!(CellValue::Null.display(), "");
    }

    #[test]
    fn test_with_names_rejects_duplicates() {
        assert!(matches!(
            Table::with_names(["a", "a"]),
            Err(PipelineError::DuplicateColumn(_))
        ));
    }
}
