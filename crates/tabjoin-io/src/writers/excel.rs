//! .xlsx writer backed by rust_xlsxwriter.
//!
//! One worksheet: header row, then one typed cell per value. Nulls and
//! non-finite floats leave the cell empty.

use rust_xlsxwriter::{Workbook, XlsxError};
use tabjoin_core::types::{Scalar, Table};

/// Sheet limits of the xlsx format.
pub const MAX_ROWS: usize = 1_048_576;
pub const MAX_COLUMNS: usize = 16_384;

#[derive(Debug, thiserror::Error)]
pub enum ExcelWriteError {
    #[error("{rows} rows (plus header) exceed the sheet limit of {MAX_ROWS}")]
    TooManyRows { rows: usize },
    #[error("{columns} columns exceed the sheet limit of {MAX_COLUMNS}")]
    TooManyColumns { columns: usize },
    #[error(transparent)]
    Xlsx(#[from] XlsxError),
}

pub fn encode_xlsx(table: &Table) -> Result<Vec<u8>, ExcelWriteError> {
    if table.num_rows() + 1 > MAX_ROWS {
        return Err(ExcelWriteError::TooManyRows {
            rows: table.num_rows(),
        });
    }
    if table.num_columns() > MAX_COLUMNS {
        return Err(ExcelWriteError::TooManyColumns {
            columns: table.num_columns(),
        });
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (c, col) in table.columns().iter().enumerate() {
        // Bounds checked above.
        let c = c as u16;
        sheet.write_string(0, c, col.name.as_str())?;
        for (r, value) in col.values.iter().enumerate() {
            let row = (r + 1) as u32;
            match value {
                Scalar::Null => {}
                Scalar::Bool(b) => {
                    sheet.write_boolean(row, c, *b)?;
                }
                // Cells hold doubles; integers beyond 2^53 lose precision.
                Scalar::I64(i) => {
                    sheet.write_number(row, c, *i as f64)?;
                }
                Scalar::F64(f) if f.is_finite() => {
                    sheet.write_number(row, c, *f)?;
                }
                Scalar::F64(_) => {}
                Scalar::Str(s) => {
                    sheet.write_string(row, c, s.as_str())?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
