//! Cardinality validation.
//!
//! Only key values present on *both* sides are constrained: a duplicate that
//! has no partner on the other side never multiplies output rows, so it is
//! not a violation.

use serde::Serialize;
use tabjoin_core::join::Cardinality;

use super::key::KeyIndex;
use crate::error::JoinError;

/// Check the declared cardinality against observed key multiplicities.
///
/// The first offending key is reported in order of first occurrence on the
/// left side, so the error is stable across runs.
pub fn validate_cardinality(
    cardinality: Cardinality,
    left: &KeyIndex<'_>,
    right: &KeyIndex<'_>,
) -> Result<(), JoinError> {
    if cardinality == Cardinality::ManyToMany {
        return Ok(());
    }

    for key in left.keys() {
        let right_count = right.count(key);
        if right_count == 0 {
            continue;
        }
        let left_count = left.count(key);
        let left_bad = cardinality.left_unique() && left_count > 1;
        let right_bad = cardinality.right_unique() && right_count > 1;
        if left_bad || right_bad {
            return Err(JoinError::CardinalityViolation {
                cardinality,
                key: key.to_string(),
                left_count,
                right_count,
            });
        }
    }
    Ok(())
}

/// Summary of key multiplicities, logged before a join runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KeyProfile {
    pub left_distinct: usize,
    pub right_distinct: usize,
    /// Distinct keys present on both sides.
    pub shared: usize,
    pub left_null_rows: usize,
    pub right_null_rows: usize,
    /// Largest number of rows sharing one key on each side.
    pub left_max_dup: usize,
    pub right_max_dup: usize,
    /// Number of (left, right) pairs with equal keys; the inner-join row count.
    pub matched_pairs: usize,
}

pub fn key_profile(left: &KeyIndex<'_>, right: &KeyIndex<'_>) -> KeyProfile {
    let mut profile = KeyProfile {
        left_distinct: left.distinct(),
        right_distinct: right.distinct(),
        left_null_rows: left.null_rows(),
        right_null_rows: right.null_rows(),
        ..Default::default()
    };
    for key in left.keys() {
        let l = left.count(key);
        let r = right.count(key);
        profile.left_max_dup = profile.left_max_dup.max(l);
        if r > 0 {
            profile.shared += 1;
            profile.matched_pairs += l * r;
        }
    }
    for key in right.keys() {
        profile.right_max_dup = profile.right_max_dup.max(right.count(key));
    }
    profile
}
