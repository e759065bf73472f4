#![forbid(unsafe_code)]
//! tabjoin-io: load and store whole tables.
//!
//! The format is chosen from the file extension (`Format::from_path`):
//! - `.csv`  : delimited text with a header row
//! - `.xls`, `.xlsx` : first worksheet, header row (`.xls` is read-only)
//! - `.json` : array of objects
//! - `.jsonl`: one object per line
//!
//! Writers encode the whole table in memory first and then hand the bytes to
//! `fs::write_atomic`, so an encoding failure never touches the target path.

pub mod error;
pub mod format;
pub mod fs;
pub mod readers;
pub mod value;
pub mod writers;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tabjoin_core::config::JoinConfig;
use tabjoin_core::hash::{hash_bytes, Hash256};
use tabjoin_core::types::Table;
use tracing::debug;

pub use error::{Error, Result};
pub use format::Format;

/// Knobs shared by readers and writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoOptions {
    /// Field delimiter for `.csv`.
    pub csv_delimiter: u8,
}

impl Default for IoOptions {
    fn default() -> Self {
        Self { csv_delimiter: b',' }
    }
}

impl IoOptions {
    pub fn from_config(cfg: &JoinConfig) -> Self {
        Self {
            csv_delimiter: cfg.csv_delimiter,
        }
    }
}

/// What `write_table` put on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteSummary {
    pub path: String,
    pub format: Format,
    pub rows: usize,
    pub columns: usize,
    pub bytes: u64,
    /// blake3 of the bytes written.
    pub digest: Hash256,
}

pub fn read_table(path: impl AsRef<Path>) -> Result<Table> {
    read_table_with(path, &IoOptions::default())
}

pub fn read_table_with(path: impl AsRef<Path>, opts: &IoOptions) -> Result<Table> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    let bytes = fs::read_bytes(path)?;
    let table = decode_table(bytes, format, opts, &path.display().to_string())?;
    debug!(
        path = %path.display(),
        %format,
        rows = table.num_rows(),
        columns = table.num_columns(),
        "loaded table"
    );
    Ok(table)
}

/// Decode file contents; `path` is only used in error messages.
pub fn decode_table(bytes: Vec<u8>, format: Format, opts: &IoOptions, path: &str) -> Result<Table> {
    match format {
        Format::Csv => readers::csv::read_csv(&bytes, opts.csv_delimiter, path),
        Format::Json => readers::json::read_json(&bytes, path),
        Format::Jsonl => readers::jsonl::read_jsonl(&bytes, path),
        Format::Xls | Format::Xlsx => readers::excel::read_excel(bytes, path),
    }
}

/// Encode a table; `path` is only used in error messages.
pub fn encode_table(table: &Table, format: Format, opts: &IoOptions, path: &str) -> Result<Vec<u8>> {
    match format {
        Format::Csv => {
            writers::csv::encode_csv(table, opts.csv_delimiter).map_err(|e| Error::write(path, e))
        }
        Format::Json => writers::json::encode_json(table).map_err(|e| Error::write(path, e)),
        Format::Jsonl => writers::jsonl::encode_jsonl(table).map_err(|e| Error::write(path, e)),
        Format::Xlsx => writers::excel::encode_xlsx(table).map_err(|e| Error::write(path, e)),
        Format::Xls => Err(Error::UnsupportedFormat {
            path: path.to_string(),
            detail: "legacy .xls output is not supported; write .xlsx instead".into(),
        }),
    }
}

pub fn write_table(table: &Table, path: impl AsRef<Path>) -> Result<WriteSummary> {
    write_table_with(table, path, &IoOptions::default())
}

pub fn write_table_with(
    table: &Table,
    path: impl AsRef<Path>,
    opts: &IoOptions,
) -> Result<WriteSummary> {
    let path = path.as_ref();
    let shown = path.display().to_string();
    let format = Format::for_output(path)?;
    let bytes = encode_table(table, format, opts, &shown)?;
    fs::write_atomic(path, &bytes)?;

    let summary = WriteSummary {
        path: shown,
        format,
        rows: table.num_rows(),
        columns: table.num_columns(),
        bytes: bytes.len() as u64,
        digest: hash_bytes(&bytes),
    };
    debug!(
        path = %summary.path,
        %format,
        rows = summary.rows,
        bytes = summary.bytes,
        "wrote table"
    );
    Ok(summary)
}
