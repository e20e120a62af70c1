use std::fmt;

use crate::domain::TVError;

/// A single typed value of a loaded table.
#[derive(Debug, Clone)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Null,
}

// Floats compare by bit pattern so a NaN cell equals itself.
impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cell::Int(a), Cell::Int(b)) => a == b,
            (Cell::Float(a), Cell::Float(b)) => a.to_bits() == b.to_bits(),
            (Cell::Bool(a), Cell::Bool(b)) => a == b,
            (Cell::Text(a), Cell::Text(b)) => a == b,
            (Cell::Null, Cell::Null) => true,
            _ => false,
        }
    }
}

// Canonical string form shared by both filter modes and the renderer.
// Whole floats keep one decimal so `3.0` stays distinguishable from the integer `3`.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(v) => write!(f, "{v}"),
            Cell::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Bool(v) => write!(f, "{v}"),
            Cell::Text(v) => f.write_str(v),
            Cell::Null => Ok(()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Null, Into::into)
    }
}

/// Column names plus row major cells. Every row is exactly as wide as `columns`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, TVError> {
        let expected = columns.len();
        if let Some((row, found)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != expected)
            .map(|(idx, r)| (idx, r.len()))
        {
            return Err(TVError::SchemaMismatch {
                row,
                expected,
                found,
            });
        }
        Ok(Self { columns, rows })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    // Duplicate header names resolve to the first occurrence.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Same columns, a subset of rows. Used to build derived views.
    pub fn with_rows(&self, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_stringify_canonically() {
        assert_eq!(Cell::Int(3).to_string(), "3");
        assert_eq!(Cell::Int(-42).to_string(), "-42");
        assert_eq!(Cell::Float(3.0).to_string(), "3.0");
        assert_eq!(Cell::Float(2.5).to_string(), "2.5");
        assert_eq!(Cell::Float(0.1).to_string(), "0.1");
        assert_eq!(Cell::Float(f64::NAN).to_string(), "NaN");
        assert_eq!(Cell::Bool(true).to_string(), "true");
        assert_eq!(Cell::from("Apple").to_string(), "Apple");
        assert_eq!(Cell::Null.to_string(), "");
        assert_eq!(Cell::from(None::<i64>), Cell::Null);
    }

    #[test]
    fn nan_cells_equal_themselves() {
        assert_eq!(Cell::Float(f64::NAN), Cell::Float(f64::NAN));
        assert_eq!(Cell::Float(1.5), Cell::Float(1.5));
        assert_ne!(Cell::Float(1.0), Cell::Int(1));
        let table = Table::new(vec!["x".into()], vec![vec![Cell::Float(f64::NAN)]]).unwrap();
        assert_eq!(table, table.clone());
    }

    #[test]
    fn new_rejects_ragged_rows() {
        let err = Table::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![
                vec![Cell::Int(1), Cell::Int(2), Cell::Int(3)],
                vec![Cell::Int(1), Cell::Int(2)],
            ],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TVError::SchemaMismatch {
                row: 1,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn duplicate_columns_resolve_to_first() {
        let table = Table::new(
            vec!["x".into(), "y".into(), "x".into()],
            vec![vec![Cell::Null, Cell::Null, Cell::Null]],
        )
        .unwrap();
        assert_eq!(table.column_index("x"), Some(0));
        assert_eq!(table.column_index("y"), Some(1));
        assert_eq!(table.column_index("z"), None);
        assert_eq!(table.ncols(), 3);
        assert_eq!(table.nrows(), 1);
    }
}
