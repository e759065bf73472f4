//! Runtime: load both inputs, join, write the result, emit a `RunManifest`.
//!
//! Every failure before the write stage leaves the output path untouched;
//! the write itself is atomic (see `tabjoin_io::fs`).

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::{debug, info, warn};

use tabjoin_core::config::JoinConfig;
use tabjoin_core::hash::{hash_all, hash_table};
use tabjoin_core::manifest::RunManifest;
use tabjoin_core::types::Table;

use tabjoin_io::{read_table_with, write_table_with, Format, IoOptions};
use tabjoin_operators::{HashJoin, JoinError, JoinOptions, Operator};
use tabjoin_planner::{JoinPlan, PlanError};

use crate::metrics::{emit_counts, timed, StageTimings};

#[derive(Debug, Error)]
pub enum ExecError {
    #[error(transparent)]
    Io(#[from] tabjoin_io::Error),
    #[error(transparent)]
    Join(#[from] JoinError),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Core(#[from] tabjoin_core::error::Error),
}

/// Engine holds the effective configuration for a run.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    cfg: JoinConfig,
}

impl Engine {
    pub fn new(cfg: JoinConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &JoinConfig {
        &self.cfg
    }

    /// Execute `plan` and return its manifest.
    pub fn run(&self, plan: &JoinPlan) -> Result<RunManifest, ExecError> {
        self.execute(plan).map(|(_, manifest)| manifest)
    }

    /// Like `run`, also handing back the joined table.
    pub fn execute(&self, plan: &JoinPlan) -> Result<(Table, RunManifest), ExecError> {
        self.cfg.validate()?;
        // Plans can be built by hand; recheck the output before reading input.
        Format::for_output(&plan.output.path)?;

        let mut manifest = RunManifest::new(plan.digest()?, now_ms());
        let io = IoOptions::from_config(&self.cfg);
        let mut timings = StageTimings::default();

        let (left, ms) = timed("load_left", || read_table_with(&plan.left.path, &io));
        timings.load_left_ms = ms;
        let left = left?;
        let (right, ms) = timed("load_right", || read_table_with(&plan.right.path, &io));
        timings.load_right_ms = ms;
        let right = right?;

        for (side, path, table) in [
            ("left", &plan.left.path, &left),
            ("right", &plan.right.path, &right),
        ] {
            if table.num_rows() == 0 {
                warn!(side, path = %path, "input table has no rows");
            }
        }
        manifest.inputs_digest = Some(hash_all(&[hash_table(&left), hash_table(&right)]));

        let op = HashJoin::new(plan.key.clone(), plan.join_type, plan.cardinality)
            .with_options(JoinOptions::from_config(&self.cfg));
        let op_plan = op.plan(&[left.schema(), right.schema()])?;
        debug!(
            operator = op.name(),
            columns = ?op_plan.output_schema.names(),
            "planned join"
        );
        let (joined, ms) = timed("join", || op.run(&left, &right));
        timings.join_ms = ms;
        let joined = joined?;

        let (summary, ms) = timed("write", || {
            write_table_with(&joined.table, &plan.output.path, &io)
        });
        timings.write_ms = ms;
        let summary = summary?;

        manifest.rows = joined.stats;
        manifest.output_bytes = summary.bytes;
        let manifest = manifest.finish(now_ms(), Some(summary.digest));

        emit_counts(&manifest.rows, &timings);
        info!(
            output = %summary.path,
            format = %summary.format,
            bytes = summary.bytes,
            manifest_id = %manifest.id.0,
            "output written"
        );
        Ok((joined.table, manifest))
    }
}

/// Persist a manifest as pretty JSON.
pub fn write_manifest(manifest: &RunManifest, path: impl AsRef<Path>) -> Result<(), ExecError> {
    let mut bytes = serde_json::to_vec_pretty(manifest).map_err(tabjoin_core::error::Error::from)?;
    bytes.push(b'\n');
    tabjoin_io::fs::write_atomic(path.as_ref(), &bytes)?;
    Ok(())
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
