//! Stable hashing helpers for plans, tables, and manifests.

use blake3::Hasher;
use serde::Serialize;

use crate::types::{Scalar, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    pub fn to_hex(&self) -> String {
        // blake3 hex(32b) is 64 hex chars
        let mut s = String::with_capacity(64);
        for b in &self.0 {
            use std::fmt::Write as _;
            let _ = write!(&mut s, "{:02x}", b);
        }
        s
    }
}

impl std::fmt::Display for Hash256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

pub fn hash_bytes(bytes: &[u8]) -> Hash256 {
    let mut h = Hasher::new();
    h.update(bytes);
    let out = h.finalize();
    Hash256(out.into())
}

/// Hash any serde-serializable value deterministically (via JSON).
pub fn hash_serde<T: Serialize>(v: &T) -> Result<Hash256, crate::error::Error> {
    let bytes = serde_json::to_vec(v).map_err(|e| crate::error::Error::Hash(e.to_string()))?;
    Ok(hash_bytes(&bytes))
}

/// Content digest of a table: column names, then every value column by column.
pub fn hash_table(table: &Table) -> Hash256 {
    let mut h = Hasher::new();
    h.update(&(table.num_columns() as u64).to_le_bytes());
    h.update(&(table.num_rows() as u64).to_le_bytes());
    for col in table.columns() {
        h.update(&(col.name.len() as u64).to_le_bytes());
        h.update(col.name.as_bytes());
        for v in &col.values {
            hash_scalar(v, &mut h);
        }
    }
    Hash256(h.finalize().into())
}

/// Combine several digests in order.
pub fn hash_all(parts: &[Hash256]) -> Hash256 {
    let mut h = Hasher::new();
    for p in parts {
        h.update(&p.0);
    }
    Hash256(h.finalize().into())
}

fn hash_scalar(scalar: &Scalar, hasher: &mut Hasher) {
    use Scalar::*;

    // Write type discriminant first
    let tag: u8 = match scalar {
        Null => 0,
        Bool(_) => 1,
        I64(_) => 2,
        F64(_) => 3,
        Str(_) => 4,
    };
    hasher.update(&[tag]);

    match scalar {
        Null => {}
        Bool(b) => {
            hasher.update(&[*b as u8]);
        }
        I64(i) => {
            hasher.update(&i.to_le_bytes());
        }
        F64(f) => {
            hasher.update(&f.to_bits().to_le_bytes());
        }
        Str(s) => {
            hasher.update(&(s.len() as u64).to_le_bytes());
            hasher.update(s.as_bytes());
        }
    }
}
