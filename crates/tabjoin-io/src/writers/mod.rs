//! In-memory encoders; `crate::fs` puts the bytes on disk.

pub mod csv;
pub mod excel;
pub mod json;
pub mod jsonl;
