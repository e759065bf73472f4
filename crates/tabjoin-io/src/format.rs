//! File format detection from the path extension.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Csv,
    Xls,
    Xlsx,
    Json,
    Jsonl,
}

impl Format {
    pub const ALL: [Format; 5] = [
        Format::Csv,
        Format::Xls,
        Format::Xlsx,
        Format::Json,
        Format::Jsonl,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Xls => "xls",
            Format::Xlsx => "xlsx",
            Format::Json => "json",
            Format::Jsonl => "jsonl",
        }
    }

    /// Legacy `.xls` can be read but not produced.
    pub fn is_writable(self) -> bool {
        self != Format::Xls
    }

    /// Format implied by the extension of `path` (case-insensitive).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        Format::ALL
            .into_iter()
            .find(|f| f.extension() == ext)
            .ok_or_else(|| Error::UnsupportedFormat {
                path: path.display().to_string(),
                detail: if ext.is_empty() {
                    "no file extension; expected one of .csv, .xls, .xlsx, .json, .jsonl".into()
                } else {
                    format!("'.{ext}' is not one of .csv, .xls, .xlsx, .json, .jsonl")
                },
            })
    }

    /// Like `from_path`, but also rejects formats that cannot be written.
    pub fn for_output(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        if !format.is_writable() {
            return Err(Error::UnsupportedFormat {
                path: path.display().to_string(),
                detail: "legacy .xls output is not supported; write .xlsx instead".into(),
            });
        }
        Ok(format)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
