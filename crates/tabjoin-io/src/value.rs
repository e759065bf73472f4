//! Conversions between cell text / JSON values and `Scalar`.

use serde_json::{Number, Value};
use tabjoin_core::types::Scalar;

/// Parse one delimited-text cell.
///
/// Empty → Null, then integer, finite float, `true`/`false` (any case), else
/// the original text. Numbers and booleans tolerate surrounding whitespace.
/// Words the float parser accepts (`nan`, `inf`, `Infinity`) stay text.
pub fn parse_text_cell(field: &str) -> Scalar {
    if field.is_empty() {
        return Scalar::Null;
    }
    let trimmed = field.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Scalar::I64(v);
    }
    if let Ok(v) = trimmed.parse::<f64>() {
        if v.is_finite() {
            return Scalar::F64(v);
        }
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Scalar::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Scalar::Bool(false);
    }
    Scalar::Str(field.to_string())
}

/// Nested arrays/objects are kept as their compact JSON text.
pub fn json_to_scalar(value: &Value) -> Scalar {
    match value {
        Value::Null => Scalar::Null,
        Value::Bool(b) => Scalar::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Scalar::I64(i),
            None => n.as_f64().map_or(Scalar::Null, Scalar::F64),
        },
        Value::String(s) => Scalar::Str(s.clone()),
        nested @ (Value::Array(_) | Value::Object(_)) => Scalar::Str(nested.to_string()),
    }
}

/// Non-finite floats have no JSON representation and become `null`.
pub fn scalar_to_json(value: &Scalar) -> Value {
    match value {
        Scalar::Null => Value::Null,
        Scalar::Bool(b) => Value::Bool(*b),
        Scalar::I64(i) => Value::from(*i),
        Scalar::F64(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        Scalar::Str(s) => Value::String(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_cells_parse_by_shape() {
        assert_eq!(parse_text_cell(""), Scalar::Null);
        assert_eq!(parse_text_cell("42"), Scalar::I64(42));
        assert_eq!(parse_text_cell(" 7 "), Scalar::I64(7));
        assert_eq!(parse_text_cell("2.5"), Scalar::F64(2.5));
        assert_eq!(parse_text_cell("TRUE"), Scalar::Bool(true));
        assert_eq!(parse_text_cell("False"), Scalar::Bool(false));
        assert_eq!(parse_text_cell(" hi "), Scalar::Str(" hi ".into()));
    }

    #[test]
    fn non_finite_float_words_stay_text() {
        for word in ["Nan", "NaN", "inf", "INF", "Infinity", "-inf", "1e999"] {
            assert_eq!(parse_text_cell(word), Scalar::Str(word.into()), "{word}");
        }
        assert_eq!(parse_text_cell("1e3"), Scalar::F64(1000.0));
    }

    #[test]
    fn json_numbers_keep_int_float_split() {
        assert_eq!(json_to_scalar(&json!(3)), Scalar::I64(3));
        assert_eq!(json_to_scalar(&json!(3.0)), Scalar::F64(3.0));
        assert_eq!(json_to_scalar(&json!(null)), Scalar::Null);
    }

    #[test]
    fn nested_json_becomes_text() {
        assert_eq!(
            json_to_scalar(&json!({"a": [1, 2]})),
            Scalar::Str(r#"{"a":[1,2]}"#.into())
        );
    }

    #[test]
    fn nan_is_written_as_null() {
        assert_eq!(scalar_to_json(&Scalar::F64(f64::NAN)), Value::Null);
        assert_eq!(scalar_to_json(&Scalar::F64(1.5)), json!(1.5));
    }
}
