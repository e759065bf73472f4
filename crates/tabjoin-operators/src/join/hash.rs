//! Hash join row selection.
//!
//! Produces the ordered list of (left row, right row) pairs the output will
//! contain. Row order:
//! - inner/left/outer: left rows in order, each followed by its matches in
//!   right order (or one unmatched row); outer then appends never-matched
//!   right rows in right order.
//! - right: the mirror image, driven by right rows.
//! - cross: left-major Cartesian product.

use tabjoin_core::join::{JoinType, MergeIndicator};
use tabjoin_core::manifest::RowCounts;

use super::key::{KeyIndex, KeyValue};

/// Positions to gather from each input, one entry per output row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowPairs {
    pub left: Vec<Option<usize>>,
    pub right: Vec<Option<usize>>,
    pub indicators: Vec<MergeIndicator>,
}

impl RowPairs {
    fn with_capacity(n: usize) -> Self {
        Self {
            left: Vec::with_capacity(n),
            right: Vec::with_capacity(n),
            indicators: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, left: Option<usize>, right: Option<usize>) {
        let tag = match (left, right) {
            (Some(_), Some(_)) => MergeIndicator::Both,
            (Some(_), None) => MergeIndicator::LeftOnly,
            (None, Some(_)) => MergeIndicator::RightOnly,
            (None, None) => return,
        };
        self.left.push(left);
        self.right.push(right);
        self.indicators.push(tag);
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    pub fn counts(&self, left_rows: usize, right_rows: usize) -> RowCounts {
        let mut counts = RowCounts {
            left_rows,
            right_rows,
            output_rows: self.len(),
            ..Default::default()
        };
        for tag in &self.indicators {
            match tag {
                MergeIndicator::Both => counts.both += 1,
                MergeIndicator::LeftOnly => counts.left_only += 1,
                MergeIndicator::RightOnly => counts.right_only += 1,
            }
        }
        counts
    }
}

/// Keyed inputs for one join.
pub struct Probe<'k, 'a> {
    pub left_keys: &'k [Option<KeyValue<'a>>],
    pub right_keys: &'k [Option<KeyValue<'a>>],
    pub left_index: &'k KeyIndex<'a>,
    pub right_index: &'k KeyIndex<'a>,
}

/// Cartesian product; keys are not consulted.
pub fn cross_pairs(left_rows: usize, right_rows: usize) -> RowPairs {
    let mut out = RowPairs::with_capacity(left_rows.saturating_mul(right_rows));
    for l in 0..left_rows {
        for r in 0..right_rows {
            out.push(Some(l), Some(r));
        }
    }
    out
}

/// Equality join for every type except `cross`.
pub fn keyed_pairs(join_type: JoinType, probe: &Probe<'_, '_>) -> RowPairs {
    match join_type {
        JoinType::Right => probe_right(probe),
        JoinType::Cross => cross_pairs(probe.left_keys.len(), probe.right_keys.len()),
        JoinType::Inner | JoinType::Left | JoinType::Outer => probe_left(join_type, probe),
    }
}

fn estimate_output_rows(
    driving: &[Option<KeyValue<'_>>],
    other: &KeyIndex<'_>,
    keep_unmatched: bool,
) -> usize {
    driving
        .iter()
        .map(|k| match k.as_ref().map(|k| other.count(k)) {
            Some(n) if n > 0 => n,
            _ if keep_unmatched => 1,
            _ => 0,
        })
        .sum()
}

fn probe_left(join_type: JoinType, probe: &Probe<'_, '_>) -> RowPairs {
    let keep_left = matches!(join_type, JoinType::Left | JoinType::Outer);
    let keep_right = join_type == JoinType::Outer;

    let mut capacity = estimate_output_rows(probe.left_keys, probe.right_index, keep_left);
    if keep_right {
        capacity += probe.right_keys.len();
    }
    let mut out = RowPairs::with_capacity(capacity);
    let mut right_matched = vec![false; if keep_right { probe.right_keys.len() } else { 0 }];

    for (l, key) in probe.left_keys.iter().enumerate() {
        let matches = key.as_ref().and_then(|k| probe.right_index.get(k));
        match matches {
            Some(rows) if !rows.is_empty() => {
                for &r in rows {
                    out.push(Some(l), Some(r));
                    if keep_right {
                        right_matched[r] = true;
                    }
                }
            }
            _ if keep_left => out.push(Some(l), None),
            _ => {}
        }
    }

    if keep_right {
        for (r, matched) in right_matched.iter().enumerate() {
            if !matched {
                out.push(None, Some(r));
            }
        }
    }
    out
}

fn probe_right(probe: &Probe<'_, '_>) -> RowPairs {
    let capacity = estimate_output_rows(probe.right_keys, probe.left_index, true);
    let mut out = RowPairs::with_capacity(capacity);

    for (r, key) in probe.right_keys.iter().enumerate() {
        let matches = key.as_ref().and_then(|k| probe.left_index.get(k));
        match matches {
            Some(rows) if !rows.is_empty() => {
                for &l in rows {
                    out.push(Some(l), Some(r));
                }
            }
            _ => out.push(None, Some(r)),
        }
    }
    out
}
