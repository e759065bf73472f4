//! NDJSON writer.

use std::io::{BufWriter, Write};

use serde_json::{Map, Value};
use tabjoin_core::types::Table;

use crate::value::scalar_to_json;

pub struct JsonlWriter<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// One JSON object per row, keys in column order.
    pub fn write_table(&mut self, table: &Table) -> std::io::Result<()> {
        for r in 0..table.num_rows() {
            let obj = row_object(table, r);
            serde_json::to_writer(&mut self.writer, &Value::Object(obj))?;
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()
    }

    pub fn into_inner(self) -> std::io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }
}

/// Row `r` as a JSON object.
pub(crate) fn row_object(table: &Table, r: usize) -> Map<String, Value> {
    table
        .columns()
        .iter()
        .map(|col| (col.name.clone(), scalar_to_json(&col.values[r])))
        .collect()
}

pub fn encode_jsonl(table: &Table) -> std::io::Result<Vec<u8>> {
    let mut w = JsonlWriter::new(Vec::new());
    w.write_table(table)?;
    w.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabjoin_core::types::Scalar;

    #[test]
    fn writes_one_object_per_line_in_column_order() {
        let t = Table::from_rows(
            &["z", "a"],
            vec![
                vec![Scalar::I64(1), Scalar::Null],
                vec![Scalar::I64(2), "x".into()],
            ],
        )
        .unwrap();
        let out = String::from_utf8(encode_jsonl(&t).unwrap()).unwrap();
        assert_eq!(out, "{\"z\":1,\"a\":null}\n{\"z\":2,\"a\":\"x\"}\n");
    }
}
