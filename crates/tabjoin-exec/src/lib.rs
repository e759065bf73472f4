#![forbid(unsafe_code)]
//! tabjoin-exec: runs a resolved `JoinPlan` (load → join → write) and emits a
//! `RunManifest`.
//!
//! Execution is single-threaded and synchronous; both inputs and the result
//! are fully materialized.

pub mod metrics;
pub mod runtime;

pub use runtime::{write_manifest, Engine, ExecError};
