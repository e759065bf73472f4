//! Stage timing and row-count events.
//!
//! Everything goes through `tracing`; the binary decides where it lands.

use std::time::Instant;

use serde::Serialize;
use tabjoin_core::manifest::RowCounts;
use tracing::{debug, info};

/// Wall-clock time per engine stage, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageTimings {
    pub load_left_ms: u64,
    pub load_right_ms: u64,
    pub join_ms: u64,
    pub write_ms: u64,
}

/// Run `f` as a named stage, logging its duration.
pub fn timed<T, E>(stage: &'static str, f: impl FnOnce() -> Result<T, E>) -> (Result<T, E>, u64) {
    debug!(stage, "stage started");
    let started = Instant::now();
    let out = f();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    match &out {
        Ok(_) => debug!(stage, elapsed_ms, "stage finished"),
        Err(_) => debug!(stage, elapsed_ms, "stage failed"),
    }
    (out, elapsed_ms)
}

pub fn emit_counts(counts: &RowCounts, timings: &StageTimings) {
    info!(
        left_rows = counts.left_rows,
        right_rows = counts.right_rows,
        output_rows = counts.output_rows,
        both = counts.both,
        left_only = counts.left_only,
        right_only = counts.right_only,
        load_ms = timings.load_left_ms + timings.load_right_ms,
        join_ms = timings.join_ms,
        write_ms = timings.write_ms,
        "join finished"
    );
}
