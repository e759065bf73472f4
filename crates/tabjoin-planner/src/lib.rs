#![forbid(unsafe_code)]
//! tabjoin-planner: turn a join request (CLI flags or a YAML job) into a
//! resolved `JoinPlan`.
//!
//! Resolution is pure: no input file is opened here, so every error it
//! reports happens before any data is read.

pub mod dsl;
pub mod plan;

pub use dsl::yaml::{load_yaml_job, parse_yaml_job, IndicatorSetting, JobConfig, JoinJob};
pub use plan::{resolve, FileSpec, JoinPlan, JoinRequest, PlanError};
