//! Request → plan resolution.
//!
//! Everything that can be checked without opening a file is checked here:
//! key names, file formats (including whether the output format is
//! writable) and the cross-join/cardinality combination.

use serde::{Deserialize, Serialize};
use tabjoin_core::hash::{hash_serde, Hash256};
use tabjoin_core::join::{Cardinality, JoinKey, JoinType, Side};
use tabjoin_io::Format;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid job file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0} key column name is missing or blank")]
    MissingKey(Side),

    #[error(transparent)]
    Format(#[from] tabjoin_io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot read job file '{path}': {source}")]
    JobFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<tabjoin_core::error::Error> for PlanError {
    fn from(e: tabjoin_core::error::Error) -> Self {
        PlanError::Config(e.to_string())
    }
}

/// A join as the caller describes it. `right_key: None` requests a natural
/// join on `left_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequest {
    pub left: String,
    pub right: String,
    pub left_key: String,
    #[serde(default)]
    pub right_key: Option<String>,
    #[serde(default, rename = "join")]
    pub join_type: JoinType,
    #[serde(default)]
    pub cardinality: Cardinality,
    pub output: String,
}

/// One file the plan reads or writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSpec {
    pub path: String,
    pub format: Format,
}

/// A fully resolved join, ready for execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinPlan {
    pub left: FileSpec,
    pub right: FileSpec,
    pub output: FileSpec,
    pub key: JoinKey,
    pub join_type: JoinType,
    pub cardinality: Cardinality,
}

impl JoinPlan {
    /// Stable digest of the plan, recorded in run manifests.
    pub fn digest(&self) -> Result<Hash256, PlanError> {
        Ok(hash_serde(self)?)
    }

    /// Pretty JSON rendering for `validate`.
    pub fn explain(&self) -> Result<String, PlanError> {
        serde_json::to_string_pretty(self).map_err(|e| PlanError::Config(e.to_string()))
    }
}

pub fn resolve(request: &JoinRequest) -> Result<JoinPlan, PlanError> {
    let left_key = non_blank(&request.left_key).ok_or(PlanError::MissingKey(Side::Left))?;
    let right_key = match request.right_key.as_deref() {
        None => left_key,
        Some(k) => non_blank(k).ok_or(PlanError::MissingKey(Side::Right))?,
    };

    if request.join_type == JoinType::Cross && request.cardinality != Cardinality::ManyToMany {
        return Err(PlanError::Config(format!(
            "cross join cannot enforce cardinality {}; declare many:many",
            request.cardinality
        )));
    }

    let output = FileSpec {
        format: Format::for_output(&request.output)?,
        path: request.output.clone(),
    };
    let left = FileSpec {
        format: Format::from_path(&request.left)?,
        path: request.left.clone(),
    };
    let right = FileSpec {
        format: Format::from_path(&request.right)?,
        path: request.right.clone(),
    };

    Ok(JoinPlan {
        left,
        right,
        output,
        key: JoinKey::new(left_key, right_key),
        join_type: request.join_type,
        cardinality: request.cardinality,
    })
}

fn non_blank(s: &str) -> Option<&str> {
    (!s.trim().is_empty()).then_some(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> JoinRequest {
        JoinRequest {
            left: "people.csv".into(),
            right: "scores.JSON".into(),
            left_key: "id".into(),
            right_key: None,
            join_type: JoinType::Left,
            cardinality: Cardinality::OneToMany,
            output: "out/joined.xlsx".into(),
        }
    }

    #[test]
    fn natural_join_reuses_left_key() {
        let plan = resolve(&request()).unwrap();
        assert_eq!(plan.key, JoinKey::natural("id"));
        assert_eq!(plan.right.format, Format::Json);
        assert_eq!(plan.output.format, Format::Xlsx);
    }

    #[test]
    fn explicit_right_key_is_kept() {
        let mut req = request();
        req.right_key = Some("person_id".into());
        assert_eq!(resolve(&req).unwrap().key, JoinKey::new("id", "person_id"));
    }

    #[test]
    fn blank_keys_are_rejected() {
        let mut req = request();
        req.left_key = "  ".into();
        assert!(matches!(resolve(&req), Err(PlanError::MissingKey(Side::Left))));

        let mut req = request();
        req.right_key = Some(String::new());
        assert!(matches!(resolve(&req), Err(PlanError::MissingKey(Side::Right))));
    }

    #[test]
    fn unsupported_output_fails_up_front() {
        let mut req = request();
        req.output = "joined.xls".into();
        assert!(matches!(resolve(&req), Err(PlanError::Format(_))));

        let mut req = request();
        req.left = "people.parquet".into();
        assert!(matches!(resolve(&req), Err(PlanError::Format(_))));
    }

    #[test]
    fn cross_requires_many_to_many() {
        let mut req = request();
        req.join_type = JoinType::Cross;
        assert!(matches!(resolve(&req), Err(PlanError::Config(_))));
        req.cardinality = Cardinality::ManyToMany;
        assert!(resolve(&req).is_ok());
    }

    #[test]
    fn digest_is_stable_and_sensitive() {
        let a = resolve(&request()).unwrap();
        let b = resolve(&request()).unwrap();
        assert_eq!(a.digest().unwrap(), b.digest().unwrap());

        let mut req = request();
        req.join_type = JoinType::Inner;
        let c = resolve(&req).unwrap();
        assert_ne!(a.digest().unwrap(), c.digest().unwrap());
    }
}
