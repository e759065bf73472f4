//! Operator trait.
//!
//! The exec runtime calls `plan(...)` once the inputs are loaded (cheap,
//! schema-only validation) and then `eval(...)` on the tables themselves.

use tabjoin_core::prelude::{Schema, Table};

use crate::error::JoinError;
use crate::plan::OpPlan;

/// Trait that all operators must implement.
///
/// Invariants:
/// - `plan` must reject every configuration `eval` would reject for schema
///   reasons, so callers can fail before touching row data.
/// - `eval` must be deterministic given the same inputs.
pub trait Operator: Send + Sync + 'static {
    /// Human-readable operator name (stable).
    fn name(&self) -> &'static str;

    /// Given input schemas, return the output schema and partitioning hints.
    fn plan(&self, input_schemas: &[Schema]) -> Result<OpPlan, JoinError>;

    /// Evaluate the operator over fully materialized inputs.
    fn eval(&self, inputs: &[&Table]) -> Result<Table, JoinError>;
}
