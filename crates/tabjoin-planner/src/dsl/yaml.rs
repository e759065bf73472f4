//! YAML job files.
//!
//! Example:
//! ```yaml
//! left: data/people.csv
//! right: data/scores.jsonl
//! left_key: id
//! right_key: person_id   # optional; defaults to left_key
//! join: left             # inner | left | right | outer | cross
//! cardinality: "1:many"  # 1:1 | 1:many | many:1 | many:many
//! output: out/joined.xlsx
//! config:
//!   suffixes: ["_l", "_r"]
//!   indicator: source    # a column name, or false to omit it
//!   preview_rows: 10
//!   csv_delimiter: ";"
//! ```
//!
//! Paths are taken as written (relative paths resolve against the working
//! directory of the process).

use std::path::Path;

use serde::{Deserialize, Serialize};
use tabjoin_core::config::{parse_delimiter, JoinConfig, DEFAULT_INDICATOR_COLUMN};

use crate::plan::{resolve, JoinPlan, JoinRequest, PlanError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinJob {
    #[serde(flatten)]
    pub request: JoinRequest,
    #[serde(default)]
    pub config: Option<JobConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub suffixes: Option<(String, String)>,
    pub indicator: Option<IndicatorSetting>,
    pub preview_rows: Option<usize>,
    pub csv_delimiter: Option<String>,
}

/// `indicator: true|false` toggles the default column; a string names it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndicatorSetting {
    Enabled(bool),
    Named(String),
}

impl JobConfig {
    /// Overlay these settings on `cfg`.
    pub fn apply(&self, cfg: &mut JoinConfig) -> Result<(), PlanError> {
        if let Some((l, r)) = &self.suffixes {
            cfg.left_suffix = l.clone();
            cfg.right_suffix = r.clone();
        }
        match &self.indicator {
            None => {}
            Some(IndicatorSetting::Enabled(false)) => cfg.indicator_column = None,
            Some(IndicatorSetting::Enabled(true)) => {
                if cfg.indicator_column.is_none() {
                    cfg.indicator_column = Some(DEFAULT_INDICATOR_COLUMN.to_string());
                }
            }
            Some(IndicatorSetting::Named(name)) => cfg.indicator_column = Some(name.clone()),
        }
        if let Some(n) = self.preview_rows {
            cfg.preview_rows = n;
        }
        if let Some(d) = &self.csv_delimiter {
            cfg.csv_delimiter = parse_delimiter(d)?;
        }
        Ok(())
    }
}

impl JoinJob {
    /// Resolve the plan and the effective config (`base` overlaid with the
    /// job's `config` section).
    pub fn resolve(&self, base: &JoinConfig) -> Result<(JoinPlan, JoinConfig), PlanError> {
        let mut cfg = base.clone();
        if let Some(section) = &self.config {
            section.apply(&mut cfg)?;
        }
        cfg.validate()?;
        let plan = resolve(&self.request)?;
        Ok((plan, cfg))
    }
}

pub fn parse_yaml_job(src: &str) -> Result<JoinJob, PlanError> {
    Ok(serde_yaml::from_str(src)?)
}

pub fn load_yaml_job(path: impl AsRef<Path>) -> Result<JoinJob, PlanError> {
    let path = path.as_ref();
    let src = std::fs::read_to_string(path).map_err(|source| PlanError::JobFile {
        path: path.display().to_string(),
        source,
    })?;
    parse_yaml_job(&src)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabjoin_core::join::{Cardinality, JoinKey, JoinType};

    const JOB: &str = r#"
left: people.csv
right: scores.jsonl
left_key: id
join: left
cardinality: "1:many"
output: out.json
config:
  suffixes: ["_l", "_r"]
  indicator: source
  preview_rows: 2
"#;

    #[test]
    fn parses_full_job() {
        let job = parse_yaml_job(JOB).unwrap();
        let (plan, cfg) = job.resolve(&JoinConfig::default()).unwrap();
        assert_eq!(plan.key, JoinKey::natural("id"));
        assert_eq!(plan.join_type, JoinType::Left);
        assert_eq!(plan.cardinality, Cardinality::OneToMany);
        assert_eq!(cfg.left_suffix, "_l");
        assert_eq!(cfg.right_suffix, "_r");
        assert_eq!(cfg.indicator_column.as_deref(), Some("source"));
        assert_eq!(cfg.preview_rows, 2);
    }

    #[test]
    fn defaults_apply_when_omitted() {
        let job =
            parse_yaml_job("left: a.csv\nright: b.csv\nleft_key: k\noutput: c.csv\n").unwrap();
        let (plan, cfg) = job.resolve(&JoinConfig::default()).unwrap();
        assert_eq!(plan.join_type, JoinType::Inner);
        assert_eq!(plan.cardinality, Cardinality::ManyToMany);
        assert_eq!(cfg, JoinConfig::default());
    }

    #[test]
    fn indicator_can_be_disabled() {
        let job = parse_yaml_job(
            "left: a.csv\nright: b.csv\nleft_key: k\noutput: c.csv\nconfig:\n  indicator: false\n",
        )
        .unwrap();
        let (_, cfg) = job.resolve(&JoinConfig::default()).unwrap();
        assert_eq!(cfg.indicator_column, None);
    }

    #[test]
    fn equal_suffixes_are_a_config_error() {
        let job = parse_yaml_job(
            "left: a.csv\nright: b.csv\nleft_key: k\noutput: c.csv\nconfig:\n  suffixes: [\"_s\", \"_s\"]\n",
        )
        .unwrap();
        assert!(matches!(
            job.resolve(&JoinConfig::default()),
            Err(PlanError::Config(_))
        ));
    }

    #[test]
    fn unknown_join_type_is_a_yaml_error() {
        let err = parse_yaml_job("left: a.csv\nright: b.csv\nleft_key: k\njoin: sideways\noutput: c.csv\n")
            .unwrap_err();
        assert!(matches!(err, PlanError::Yaml(_)));
    }

    #[test]
    fn missing_job_file_reports_path() {
        let err = load_yaml_job("/no/such/job.yaml").unwrap_err();
        assert!(err.to_string().contains("/no/such/job.yaml"));
    }
}
