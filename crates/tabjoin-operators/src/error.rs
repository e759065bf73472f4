use tabjoin_core::join::{Cardinality, Side};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JoinError {
    #[error("key column '{column}' not found in {side} table")]
    KeyNotFound { side: Side, column: String },

    #[error(
        "cardinality {cardinality} violated by key value '{key}': \
         {left_count} left row(s), {right_count} right row(s)"
    )]
    CardinalityViolation {
        cardinality: Cardinality,
        key: String,
        left_count: usize,
        right_count: usize,
    },

    #[error("cross join ignores keys, so cardinality {cardinality} cannot be enforced; declare many:many")]
    IncompatibleCardinality { cardinality: Cardinality },

    #[error("output column '{column}' appears more than once after applying suffixes")]
    ColumnCollision { column: String },

    #[error("planning error: {0}")]
    Plan(String),

    #[error("schema error: {0}")]
    Schema(String),
}

impl From<tabjoin_core::error::Error> for JoinError {
    fn from(e: tabjoin_core::error::Error) -> Self {
        JoinError::Schema(e.to_string())
    }
}
