//! Operator planning surface.

use serde::{Deserialize, Serialize};
use tabjoin_core::prelude::Schema;

/// Operator plan: output schema plus the columns rows are partitioned on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpPlan {
    pub output_schema: Schema,

    /// Key column names the operator hashes on (left, then right); empty
    /// when rows are not matched on keys.
    pub partitions: Vec<String>,
}

impl OpPlan {
    pub fn new(output_schema: Schema) -> Self {
        Self {
            output_schema,
            partitions: vec![],
        }
    }

    pub fn with_partitions(mut self, cols: Vec<String>) -> Self {
        self.partitions = cols;
        self
    }
}
