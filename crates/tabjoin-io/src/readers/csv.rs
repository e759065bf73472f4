//! Delimited-text reader.

use csv::ReaderBuilder;
use tabjoin_core::types::{Column, Table};

use crate::error::{Error, Result};
use crate::value::parse_text_cell;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse a delimited file with a mandatory header row. Every record must have
/// exactly one field per header.
pub fn read_csv(bytes: &[u8], delimiter: u8, path: &str) -> Result<Table> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(false)
        .from_reader(bytes);

    let headers = reader.headers().map_err(|e| Error::parse(path, e))?.clone();
    if headers.is_empty() {
        return Err(Error::parse(path, "missing header row"));
    }

    let row_hint = bytes.len() / (headers.len() * 8).max(1);
    let mut columns: Vec<Column> = headers
        .iter()
        .map(|name| Column::new(name, Vec::with_capacity(row_hint)))
        .collect();

    for record in reader.records() {
        let record = record.map_err(|e| Error::parse(path, e))?;
        for (col, field) in columns.iter_mut().zip(record.iter()) {
            col.values.push(parse_text_cell(field));
        }
    }

    Table::new(columns).map_err(|e| Error::parse(path, e))
}
