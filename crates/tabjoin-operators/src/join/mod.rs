//! Two-table equality join with cardinality checks and provenance tags.
//!
//! Entry points:
//! - [`join`]: default options, returns the result table.
//! - [`join_with_options`]: explicit suffixes/indicator, returns the table
//!   together with per-row indicators and counts.
//! - [`HashJoin`]: the same join behind the [`Operator`] trait.
//!
//! Validation order: key columns, cross/cardinality compatibility, output
//! column names, key multiplicities. Rows are only gathered once all of these
//! pass.

pub mod cardinality;
pub mod hash;
pub mod key;
pub mod layout;

use serde::{Deserialize, Serialize};
use tabjoin_core::config::JoinConfig;
use tabjoin_core::join::{Cardinality, JoinKey, JoinType, MergeIndicator};
use tabjoin_core::manifest::RowCounts;
use tabjoin_core::prelude::{Schema, Table};
use tracing::debug;

use crate::error::JoinError;
use crate::plan::OpPlan;
use crate::traits::Operator;

use self::cardinality::{key_profile, validate_cardinality};
use self::hash::{cross_pairs, keyed_pairs, Probe, RowPairs};
use self::key::{key_values, resolve_key_columns, resolve_key_fields, KeyIndex};
use self::layout::OutputLayout;

/// Output naming knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinOptions {
    pub left_suffix: String,
    pub right_suffix: String,
    /// Name of the provenance column; `None` computes tags without
    /// appending them to the table.
    pub indicator: Option<String>,
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self::from_config(&JoinConfig::default())
    }
}

impl JoinOptions {
    pub fn from_config(cfg: &JoinConfig) -> Self {
        Self {
            left_suffix: cfg.left_suffix.clone(),
            right_suffix: cfg.right_suffix.clone(),
            indicator: cfg.indicator_column.clone(),
        }
    }
}

/// Result of a join: the table plus the provenance of every row.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutput {
    pub table: Table,
    pub indicators: Vec<MergeIndicator>,
    pub stats: RowCounts,
}

/// Join with default naming (`_x`/`_y` suffixes, `_merge` indicator column).
pub fn join(
    left: &Table,
    right: &Table,
    key: &JoinKey,
    join_type: JoinType,
    cardinality: Cardinality,
) -> Result<Table, JoinError> {
    join_with_options(
        left,
        right,
        key,
        join_type,
        cardinality,
        &JoinOptions::default(),
    )
    .map(|out| out.table)
}

pub fn join_with_options(
    left: &Table,
    right: &Table,
    key: &JoinKey,
    join_type: JoinType,
    cardinality: Cardinality,
    options: &JoinOptions,
) -> Result<JoinOutput, JoinError> {
    let (left_key, right_key) = resolve_key_columns(left, right, key)?;
    check_cross(join_type, cardinality)?;
    let layout = OutputLayout::plan(
        &left.column_names(),
        &right.column_names(),
        key,
        join_type,
        options,
    )?;

    let pairs = if join_type == JoinType::Cross {
        cross_pairs(left.num_rows(), right.num_rows())
    } else {
        let left_keys = key_values(left_key);
        let right_keys = key_values(right_key);
        let left_index = KeyIndex::build(&left_keys);
        let right_index = KeyIndex::build(&right_keys);

        let profile = key_profile(&left_index, &right_index);
        debug!(
            key = %key,
            left_distinct = profile.left_distinct,
            right_distinct = profile.right_distinct,
            shared = profile.shared,
            left_null_rows = profile.left_null_rows,
            right_null_rows = profile.right_null_rows,
            left_max_dup = profile.left_max_dup,
            right_max_dup = profile.right_max_dup,
            matched_pairs = profile.matched_pairs,
            "key profile"
        );

        validate_cardinality(cardinality, &left_index, &right_index)?;
        keyed_pairs(
            join_type,
            &Probe {
                left_keys: &left_keys,
                right_keys: &right_keys,
                left_index: &left_index,
                right_index: &right_index,
            },
        )
    };

    let table = layout.materialize(left, right, &pairs)?;
    let stats = pairs.counts(left.num_rows(), right.num_rows());
    debug!(
        join_type = %join_type,
        output_rows = stats.output_rows,
        both = stats.both,
        left_only = stats.left_only,
        right_only = stats.right_only,
        "join complete"
    );

    let RowPairs { indicators, .. } = pairs;
    Ok(JoinOutput {
        table,
        indicators,
        stats,
    })
}

fn check_cross(join_type: JoinType, cardinality: Cardinality) -> Result<(), JoinError> {
    if join_type == JoinType::Cross && cardinality != Cardinality::ManyToMany {
        return Err(JoinError::IncompatibleCardinality { cardinality });
    }
    Ok(())
}

/// Hash join operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashJoin {
    pub key: JoinKey,
    pub join_type: JoinType,
    pub cardinality: Cardinality,
    pub options: JoinOptions,
}

impl HashJoin {
    pub fn new(key: JoinKey, join_type: JoinType, cardinality: Cardinality) -> Self {
        Self {
            key,
            join_type,
            cardinality,
            options: JoinOptions::default(),
        }
    }

    pub fn with_options(mut self, options: JoinOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the join, keeping indicators and counts alongside the table.
    pub fn run(&self, left: &Table, right: &Table) -> Result<JoinOutput, JoinError> {
        join_with_options(
            left,
            right,
            &self.key,
            self.join_type,
            self.cardinality,
            &self.options,
        )
    }
}

impl Operator for HashJoin {
    fn name(&self) -> &'static str {
        "join_hash"
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<OpPlan, JoinError> {
        let [left, right] = input_schemas else {
            return Err(JoinError::Plan(format!(
                "hash join expects two inputs, got {}",
                input_schemas.len()
            )));
        };
        resolve_key_fields(left, right, &self.key)?;
        check_cross(self.join_type, self.cardinality)?;
        let layout = OutputLayout::plan(
            &left.names(),
            &right.names(),
            &self.key,
            self.join_type,
            &self.options,
        )?;
        let out = layout.schema(left, right, self.join_type);
        let partitions = if self.join_type == JoinType::Cross {
            vec![]
        } else {
            vec![self.key.left.clone(), self.key.right.clone()]
        };
        Ok(OpPlan::new(out).with_partitions(partitions))
    }

    fn eval(&self, inputs: &[&Table]) -> Result<Table, JoinError> {
        let [left, right] = inputs else {
            return Err(JoinError::Plan(format!(
                "hash join needs two table inputs, got {}",
                inputs.len()
            )));
        };
        self.run(left, right).map(|out| out.table)
    }
}
