//! Record-oriented JSON writer: one array of row objects.

use serde_json::Value;
use tabjoin_core::types::Table;

use super::jsonl::row_object;

pub fn encode_json(table: &Table) -> serde_json::Result<Vec<u8>> {
    let records: Vec<Value> = (0..table.num_rows())
        .map(|r| Value::Object(row_object(table, r)))
        .collect();
    let mut out = serde_json::to_vec_pretty(&Value::Array(records))?;
    out.push(b'\n');
    Ok(out)
}
