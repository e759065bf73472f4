#![forbid(unsafe_code)]
//! tabjoin-operators: the relational join engine.
//!
//! Design intent:
//! - Pure and synchronous: two materialized tables in, one table out.
//! - Every check (key columns, cardinality, output naming) runs before the
//!   first output row is produced, so a failed join never yields partial data.
//! - `join::hash` only decides *which* row pairs are emitted; `join::layout`
//!   decides *how* they become columns.

pub mod error;
pub mod join;
pub mod plan;
pub mod traits;

pub use error::JoinError;
pub use join::{join, join_with_options, HashJoin, JoinOptions, JoinOutput};
pub use plan::OpPlan;
pub use traits::Operator;
