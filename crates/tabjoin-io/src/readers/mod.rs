//! Whole-file readers producing one `Table` each.

pub mod csv;
pub mod excel;
pub mod json;
pub mod jsonl;
