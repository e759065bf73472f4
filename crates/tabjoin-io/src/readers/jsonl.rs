//! Line-delimited JSON: one object per non-blank line.

use serde_json::Value;
use tabjoin_core::types::Table;

use super::json::{kind, RecordColumns};
use crate::error::{Error, Result};

pub fn read_jsonl(bytes: &[u8], path: &str) -> Result<Table> {
    let text = std::str::from_utf8(bytes).map_err(|e| Error::parse(path, e))?;
    let mut builder = RecordColumns::default();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let lineno = i + 1;
        let value: Value = serde_json::from_str(line)
            .map_err(|e| Error::parse(path, format!("line {lineno}: {e}")))?;
        match &value {
            Value::Object(obj) => builder.push(obj),
            other => {
                return Err(Error::parse(
                    path,
                    format!("line {lineno} is {}, expected an object", kind(other)),
                ))
            }
        }
    }
    builder.finish(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabjoin_core::types::Scalar;

    #[test]
    fn skips_blank_lines() {
        let t = read_jsonl(b"{\"id\":1}\n\n{\"id\":2,\"v\":0.5}\n", "t.jsonl").unwrap();
        assert_eq!(t.num_rows(), 2);
        assert_eq!(t.column("v").unwrap().values, vec![Scalar::Null, Scalar::F64(0.5)]);
    }

    #[test]
    fn reports_failing_line() {
        let err = read_jsonl(b"{\"id\":1}\nnot json\n", "t.jsonl").unwrap_err();
        match err {
            Error::Parse { reason, .. } => assert!(reason.starts_with("line 2")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
