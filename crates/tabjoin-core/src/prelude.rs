//! Convenient re-exports for downstream crates.

pub use crate::config::JoinConfig;
pub use crate::error::{Error, Result};
pub use crate::hash::Hash256;
pub use crate::join::{Cardinality, JoinKey, JoinType, MergeIndicator, Side};
pub use crate::manifest::{ManifestId, RunManifest};
pub use crate::schema::{DataType, Field, Schema};
pub use crate::types::{Column, Scalar, Table};
