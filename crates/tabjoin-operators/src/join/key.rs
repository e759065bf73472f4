//! Key resolution and hashable key values.
//!
//! Keys borrow from the input tables so building the index never clones
//! strings. Missing values (null, NaN) have no key and never match.

use std::collections::HashMap;
use std::fmt;

use tabjoin_core::join::{JoinKey, Side};
use tabjoin_core::prelude::{Column, Scalar, Schema, Table};

use crate::error::JoinError;

/// 2^63 as f64; floats at or above it do not fit in i64.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyValue<'a> {
    Bool(bool),
    Int(i64),
    /// Non-integral float, stored by bit pattern.
    Float(u64),
    Str(&'a str),
}

impl<'a> KeyValue<'a> {
    /// Normalize a scalar into a key. Integral floats collapse onto `Int`
    /// so `1` and `1.0` compare equal.
    pub fn from_scalar(value: &'a Scalar) -> Option<Self> {
        match value {
            Scalar::Null => None,
            Scalar::Bool(b) => Some(KeyValue::Bool(*b)),
            Scalar::I64(i) => Some(KeyValue::Int(*i)),
            Scalar::F64(f) if f.is_nan() => None,
            Scalar::F64(f) if f.fract() == 0.0 && *f >= -I64_BOUND && *f < I64_BOUND => {
                Some(KeyValue::Int(*f as i64))
            }
            Scalar::F64(f) => Some(KeyValue::Float(f.to_bits())),
            Scalar::Str(s) => Some(KeyValue::Str(s.as_str())),
        }
    }
}

impl fmt::Display for KeyValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Bool(b) => write!(f, "{b}"),
            KeyValue::Int(i) => write!(f, "{i}"),
            KeyValue::Float(bits) => write!(f, "{}", f64::from_bits(*bits)),
            KeyValue::Str(s) => f.write_str(s),
        }
    }
}

/// Key value per row, `None` where the row has no usable key.
pub fn key_values(column: &Column) -> Vec<Option<KeyValue<'_>>> {
    column.values.iter().map(KeyValue::from_scalar).collect()
}

/// Map of key value → row positions (ascending), plus first-seen key order.
#[derive(Debug, Default)]
pub struct KeyIndex<'a> {
    positions: HashMap<KeyValue<'a>, Vec<usize>>,
    order: Vec<KeyValue<'a>>,
    null_rows: usize,
}

impl<'a> KeyIndex<'a> {
    pub fn build(keys: &[Option<KeyValue<'a>>]) -> Self {
        let mut index = KeyIndex {
            positions: HashMap::with_capacity(keys.len()),
            order: Vec::new(),
            null_rows: 0,
        };
        for (pos, key) in keys.iter().enumerate() {
            match key {
                Some(k) => {
                    let rows = index.positions.entry(*k).or_default();
                    if rows.is_empty() {
                        index.order.push(*k);
                    }
                    rows.push(pos);
                }
                None => index.null_rows += 1,
            }
        }
        index
    }

    pub fn get(&self, key: &KeyValue<'a>) -> Option<&[usize]> {
        self.positions.get(key).map(Vec::as_slice)
    }

    pub fn count(&self, key: &KeyValue<'a>) -> usize {
        self.positions.get(key).map_or(0, Vec::len)
    }

    /// Distinct keys in order of first occurrence.
    pub fn keys(&self) -> &[KeyValue<'a>] {
        &self.order
    }

    pub fn distinct(&self) -> usize {
        self.order.len()
    }

    pub fn null_rows(&self) -> usize {
        self.null_rows
    }
}

/// Locate both key columns, failing with the side and name of the first
/// one that is missing.
pub fn resolve_key_columns<'t>(
    left: &'t Table,
    right: &'t Table,
    key: &JoinKey,
) -> Result<(&'t Column, &'t Column), JoinError> {
    let l = left.column(&key.left).ok_or_else(|| JoinError::KeyNotFound {
        side: Side::Left,
        column: key.left.clone(),
    })?;
    let r = right.column(&key.right).ok_or_else(|| JoinError::KeyNotFound {
        side: Side::Right,
        column: key.right.clone(),
    })?;
    Ok((l, r))
}

/// Schema-only variant of `resolve_key_columns`, returning field positions.
pub fn resolve_key_fields(
    left: &Schema,
    right: &Schema,
    key: &JoinKey,
) -> Result<(usize, usize), JoinError> {
    let l = left.index_of(&key.left).ok_or_else(|| JoinError::KeyNotFound {
        side: Side::Left,
        column: key.left.clone(),
    })?;
    let r = right.index_of(&key.right).ok_or_else(|| JoinError::KeyNotFound {
        side: Side::Right,
        column: key.right.clone(),
    })?;
    Ok((l, r))
}
