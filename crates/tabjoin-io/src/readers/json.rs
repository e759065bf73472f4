//! Record-oriented JSON: a top-level array of objects.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tabjoin_core::types::{Column, Scalar, Table};

use crate::error::{Error, Result};
use crate::value::json_to_scalar;

pub fn read_json(bytes: &[u8], path: &str) -> Result<Table> {
    let doc: Value = serde_json::from_slice(bytes).map_err(|e| Error::parse(path, e))?;
    let Value::Array(records) = doc else {
        return Err(Error::parse(
            path,
            "expected a top-level array of objects",
        ));
    };

    let mut builder = RecordColumns::default();
    for (i, record) in records.iter().enumerate() {
        match record {
            Value::Object(obj) => builder.push(obj),
            other => {
                return Err(Error::parse(
                    path,
                    format!("record {i} is {}, expected an object", kind(other)),
                ))
            }
        }
    }
    builder.finish(path)
}

pub(crate) fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Accumulates JSON objects into columns.
///
/// Columns appear in first-seen key order across all records; a key missing
/// from a record is null in that row.
#[derive(Debug, Default)]
pub(crate) struct RecordColumns {
    columns: Vec<Column>,
    by_name: HashMap<String, usize>,
    rows: usize,
}

impl RecordColumns {
    pub(crate) fn push(&mut self, record: &Map<String, Value>) {
        for (name, value) in record {
            let idx = match self.by_name.get(name) {
                Some(&idx) => idx,
                None => {
                    let idx = self.columns.len();
                    self.columns
                        .push(Column::new(name.clone(), vec![Scalar::Null; self.rows]));
                    self.by_name.insert(name.clone(), idx);
                    idx
                }
            };
            self.columns[idx].values.push(json_to_scalar(value));
        }
        self.rows += 1;
        for col in &mut self.columns {
            if col.values.len() < self.rows {
                col.values.push(Scalar::Null);
            }
        }
    }

    pub(crate) fn finish(self, path: &str) -> Result<Table> {
        Table::new(self.columns).map_err(|e| Error::parse(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unions_keys_in_first_seen_order() {
        let t = read_json(
            br#"[{"id": 1, "b": "x"}, {"c": true, "id": 2}]"#,
            "t.json",
        )
        .unwrap();
        assert_eq!(t.column_names(), vec!["id", "b", "c"]);
        assert_eq!(t.column("b").unwrap().values, vec!["x".into(), Scalar::Null]);
        assert_eq!(
            t.column("c").unwrap().values,
            vec![Scalar::Null, Scalar::Bool(true)]
        );
    }

    #[test]
    fn rejects_non_array_documents() {
        assert!(matches!(
            read_json(br#"{"id": 1}"#, "t.json"),
            Err(Error::Parse { .. })
        ));
        assert!(read_json(br#"[1, 2]"#, "t.json").is_err());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            read_json(b"[{\"id\": ", "t.json"),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn empty_array_is_an_empty_table() {
        let t = read_json(b"[]", "t.json").unwrap();
        assert_eq!(t.num_columns(), 0);
    }
}
