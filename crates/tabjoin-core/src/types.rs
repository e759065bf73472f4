//! Lightweight value/column/table types.
//!
//! A `Table` is a set of equally long, uniquely named columns. Tables are built
//! once (by a reader or by the join) and then only read.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::{DataType, Field, Schema};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    Str(String),
}

impl Scalar {
    pub fn data_type(&self) -> DataType {
        match self {
            Scalar::Null => DataType::Null,
            Scalar::Bool(_) => DataType::Boolean,
            Scalar::I64(_) => DataType::Int64,
            Scalar::F64(_) => DataType::Float64,
            Scalar::Str(_) => DataType::Utf8,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Null, or a float that carries no value (NaN).
    pub fn is_missing(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::F64(v) => v.is_nan(),
            _ => false,
        }
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::I64(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::F64(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Scalar::Null)
    }
}

/// Text rendering used by the delimited writer and the CLI preview.
/// Nulls render as the empty string; integral floats keep a trailing `.0`
/// so they read back as floats.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::I64(i) => write!(f, "{i}"),
            Scalar::F64(v) if v.is_nan() => Ok(()),
            Scalar::F64(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 => {
                write!(f, "{v:.1}")
            }
            Scalar::F64(v) => write!(f, "{v}"),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Scalar>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Scalar>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Logical type: the type of the first non-null value, widened to
    /// `Float64` when integers and floats are mixed, `Utf8` for any other mix.
    pub fn data_type(&self) -> DataType {
        let mut out = DataType::Null;
        for v in &self.values {
            let dt = v.data_type();
            out = match (out, dt) {
                (acc, DataType::Null) => acc,
                (DataType::Null, dt) => dt,
                (a, b) if a == b => a,
                (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
                    DataType::Float64
                }
                _ => return DataType::Utf8,
            };
        }
        out
    }

    /// Gather values by position; `None` yields `Scalar::Null`.
    pub fn take(&self, positions: &[Option<usize>]) -> Column {
        let values = positions
            .iter()
            .map(|p| match p {
                Some(i) => self.values.get(*i).cloned().unwrap_or(Scalar::Null),
                None => Scalar::Null,
            })
            .collect();
        Column {
            name: self.name.clone(),
            values,
        }
    }

    pub fn renamed(mut self, name: impl Into<String>) -> Column {
        self.name = name.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, checking that names are unique and lengths agree.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(Error::Schema(format!(
                    "duplicate column name '{}'",
                    col.name
                )));
            }
        }
        if let Some(first) = columns.first() {
            let rows = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != rows) {
                return Err(Error::Schema(format!(
                    "column '{}' has {} rows, expected {} (from column '{}')",
                    bad.name,
                    bad.len(),
                    rows,
                    first.name
                )));
            }
        }
        Ok(Self { columns })
    }

    /// Build a table from row-major data. Every row must have one value per name.
    pub fn from_rows<S: AsRef<str>>(names: &[S], rows: Vec<Vec<Scalar>>) -> Result<Self> {
        let mut columns: Vec<Column> = names
            .iter()
            .map(|n| Column::new(n.as_ref(), Vec::with_capacity(rows.len())))
            .collect();
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != columns.len() {
                return Err(Error::Schema(format!(
                    "row {} has {} values, expected {}",
                    row_idx,
                    row.len(),
                    columns.len()
                )));
            }
            for (col, value) in columns.iter_mut().zip(row) {
                col.values.push(value);
            }
        }
        Self::new(columns)
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Borrow one row across all columns.
    pub fn row(&self, idx: usize) -> Option<Vec<&Scalar>> {
        if idx >= self.num_rows() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[idx]).collect())
    }

    pub fn schema(&self) -> Schema {
        Schema::new(
            self.columns
                .iter()
                .map(|c| {
                    let nullable = c.values.iter().any(Scalar::is_null);
                    Field::new(c.name.clone(), c.data_type(), nullable)
                })
                .collect(),
        )
    }

    /// Project the named columns (in the given order) into a new table.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Table> {
        let columns = names
            .iter()
            .map(|n| {
                self.column(n.as_ref())
                    .cloned()
                    .ok_or_else(|| Error::Schema(format!("column '{}' not found", n.as_ref())))
            })
            .collect::<Result<Vec<_>>>()?;
        Table::new(columns)
    }

    /// Keep the rows whose position satisfies `keep`, preserving order.
    pub fn filter_rows(&self, mut keep: impl FnMut(usize) -> bool) -> Table {
        let positions: Vec<Option<usize>> =
            (0..self.num_rows()).filter(|i| keep(*i)).map(Some).collect();
        Table {
            columns: self.columns.iter().map(|c| c.take(&positions)).collect(),
        }
    }
}
