//! Spreadsheet reader (.xls and .xlsx) backed by calamine.
//!
//! Only the first worksheet is read; its first row is the header.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use tabjoin_core::types::{Column, Scalar, Table};

use crate::error::{Error, Result};

/// Spreadsheets store every number as a double; integral values within this
/// bound come back as integers.
const EXACT_INT_BOUND: f64 = 9_007_199_254_740_992.0;

pub fn read_excel(bytes: Vec<u8>, path: &str) -> Result<Table> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| Error::parse(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::parse(path, "workbook has no worksheets"))?
        .map_err(|e| Error::parse(path, e))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Err(Error::parse(path, "first worksheet is empty"));
    };

    let mut columns: Vec<Column> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| Column::new(header_name(i, cell), Vec::new()))
        .collect();

    for row in rows {
        for (col, cell) in columns.iter_mut().zip(row) {
            col.values.push(cell_to_scalar(cell));
        }
    }

    Table::new(columns).map_err(|e| Error::parse(path, e))
}

fn header_name(idx: usize, cell: &Data) -> String {
    match cell {
        Data::Empty => format!("Unnamed: {idx}"),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn cell_to_scalar(cell: &Data) -> Scalar {
    match cell {
        Data::Empty | Data::Error(_) => Scalar::Null,
        Data::Bool(b) => Scalar::Bool(*b),
        Data::Int(i) => Scalar::I64(*i),
        Data::Float(f) if f.fract() == 0.0 && f.abs() <= EXACT_INT_BOUND => {
            Scalar::I64(*f as i64)
        }
        Data::Float(f) => Scalar::F64(*f),
        Data::String(s) => Scalar::Str(s.clone()),
        Data::DateTime(dt) => Scalar::F64(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Scalar::Str(s.clone()),
    }
}
