#![forbid(unsafe_code)]
//! tabjoin-core: the in-memory table model shared by every other crate.
//!
//! - `types`: `Scalar`, `Column`, `Table`
//! - `schema`: logical per-column types
//! - `join`: join vocabulary (`JoinType`, `Cardinality`, `JoinKey`, ...)
//! - `config`: `JoinConfig` with env overrides
//! - `hash` / `manifest`: stable digests and the run manifest
//!
//! No file IO lives here.

pub mod config;
pub mod error;
pub mod hash;
pub mod join;
pub mod manifest;
pub mod prelude;
pub mod schema;
pub mod types;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
