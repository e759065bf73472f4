//! Output column layout.
//!
//! Left columns come first, then right columns, then the indicator. When the
//! key has the same name on both sides (and the join matches on keys) the two
//! key columns collapse into one at the left key's position. Any other name
//! present on both sides gets the left/right suffix.

use std::collections::HashSet;

use tabjoin_core::join::{JoinKey, JoinType};
use tabjoin_core::prelude::{Column, DataType, Field, Scalar, Schema, Table};

use super::hash::RowPairs;
use super::JoinOptions;
use crate::error::JoinError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Left(usize),
    Right(usize),
    /// Left value when present, otherwise the right one.
    Coalesced { left: usize, right: usize },
    Indicator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    name: String,
    source: Source,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    slots: Vec<Slot>,
}

impl OutputLayout {
    pub fn plan(
        left_names: &[&str],
        right_names: &[&str],
        key: &JoinKey,
        join_type: JoinType,
        options: &JoinOptions,
    ) -> Result<Self, JoinError> {
        let coalesce = join_type != JoinType::Cross && key.is_natural();
        let left_set: HashSet<&str> = left_names.iter().copied().collect();
        let right_set: HashSet<&str> = right_names.iter().copied().collect();
        let shared_key = |name: &str| coalesce && name == key.left;

        let right_key_pos = right_names.iter().position(|n| *n == key.right);
        let mut slots = Vec::with_capacity(left_names.len() + right_names.len() + 1);

        for (i, name) in left_names.iter().enumerate() {
            let slot = match right_key_pos {
                Some(r) if shared_key(name) => Slot {
                    name: name.to_string(),
                    source: Source::Coalesced { left: i, right: r },
                },
                _ if right_set.contains(name) => Slot {
                    name: format!("{name}{}", options.left_suffix),
                    source: Source::Left(i),
                },
                _ => Slot {
                    name: name.to_string(),
                    source: Source::Left(i),
                },
            };
            slots.push(slot);
        }

        for (j, name) in right_names.iter().enumerate() {
            if shared_key(name) && left_set.contains(name) {
                continue;
            }
            let name = if left_set.contains(name) {
                format!("{name}{}", options.right_suffix)
            } else {
                name.to_string()
            };
            slots.push(Slot {
                name,
                source: Source::Right(j),
            });
        }

        if let Some(indicator) = &options.indicator {
            slots.push(Slot {
                name: indicator.clone(),
                source: Source::Indicator,
            });
        }

        let mut seen = HashSet::with_capacity(slots.len());
        for slot in &slots {
            if !seen.insert(slot.name.as_str()) {
                return Err(JoinError::ColumnCollision {
                    column: slot.name.clone(),
                });
            }
        }

        Ok(Self { slots })
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.slots.iter().map(|s| s.name.as_str()).collect()
    }

    /// Output schema. Columns from the side that may be null-filled become
    /// nullable.
    pub fn schema(&self, left: &Schema, right: &Schema, join_type: JoinType) -> Schema {
        let left_may_be_missing = matches!(join_type, JoinType::Right | JoinType::Outer);
        let right_may_be_missing = matches!(join_type, JoinType::Left | JoinType::Outer);
        let fields = self
            .slots
            .iter()
            .map(|slot| match slot.source {
                Source::Left(i) => {
                    let (dt, nullable) = field_shape(left.field(i));
                    Field::new(slot.name.clone(), dt, nullable || left_may_be_missing)
                }
                Source::Right(j) => {
                    let (dt, nullable) = field_shape(right.field(j));
                    Field::new(slot.name.clone(), dt, nullable || right_may_be_missing)
                }
                Source::Coalesced { left: i, right: j } => {
                    let (ldt, lnull) = field_shape(left.field(i));
                    let (rdt, rnull) = field_shape(right.field(j));
                    let dt = if ldt == DataType::Null { rdt } else { ldt };
                    Field::new(slot.name.clone(), dt, lnull || rnull)
                }
                Source::Indicator => Field::new(slot.name.clone(), DataType::Utf8, false),
            })
            .collect();
        Schema::new(fields)
    }

    /// Gather the selected row pairs into the output table.
    pub fn materialize(
        &self,
        left: &Table,
        right: &Table,
        pairs: &RowPairs,
    ) -> Result<Table, JoinError> {
        let columns = self
            .slots
            .iter()
            .map(|slot| {
                let col = match slot.source {
                    Source::Left(i) => left.columns()[i].take(&pairs.left),
                    Source::Right(j) => right.columns()[j].take(&pairs.right),
                    Source::Coalesced { left: i, right: j } => {
                        coalesce(&left.columns()[i], &right.columns()[j], pairs)
                    }
                    Source::Indicator => Column::new(
                        slot.name.clone(),
                        pairs
                            .indicators
                            .iter()
                            .map(|t| Scalar::from(t.as_str()))
                            .collect(),
                    ),
                };
                col.renamed(slot.name.clone())
            })
            .collect();
        Ok(Table::new(columns)?)
    }
}

fn field_shape(field: Option<&Field>) -> (DataType, bool) {
    field.map_or((DataType::Null, true), |f| (f.data_type, f.nullable))
}

fn coalesce(left: &Column, right: &Column, pairs: &RowPairs) -> Column {
    let values = pairs
        .left
        .iter()
        .zip(&pairs.right)
        .map(|(l, r)| match (l, r) {
            (Some(l), _) => left.values[*l].clone(),
            (None, Some(r)) => right.values[*r].clone(),
            (None, None) => Scalar::Null,
        })
        .collect();
    Column::new(left.name.clone(), values)
}
