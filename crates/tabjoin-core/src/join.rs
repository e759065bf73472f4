//! Join vocabulary shared by the planner, the join operator, and the CLI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// SQL-equivalent join types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    #[serde(alias = "full")]
    Outer,
    Cross,
}

impl JoinType {
    pub const ALL: [JoinType; 5] = [
        JoinType::Inner,
        JoinType::Left,
        JoinType::Right,
        JoinType::Outer,
        JoinType::Cross,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JoinType::Inner => "inner",
            JoinType::Left => "left",
            JoinType::Right => "right",
            JoinType::Outer => "outer",
            JoinType::Cross => "cross",
        }
    }

    /// Whether this join type may emit the given provenance tag.
    pub fn admits(self, indicator: MergeIndicator) -> bool {
        use MergeIndicator::*;
        match (self, indicator) {
            (_, Both) => true,
            (JoinType::Left | JoinType::Outer, LeftOnly) => true,
            (JoinType::Right | JoinType::Outer, RightOnly) => true,
            _ => false,
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inner" => Ok(JoinType::Inner),
            "left" => Ok(JoinType::Left),
            "right" => Ok(JoinType::Right),
            "outer" | "full" => Ok(JoinType::Outer),
            "cross" => Ok(JoinType::Cross),
            other => Err(Error::Config(format!(
                "unknown join type '{other}' (expected inner, left, right, outer or cross)"
            ))),
        }
    }
}

/// Declared multiplicity of matching rows per key value, checked before joining.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinality {
    #[serde(rename = "1:1", alias = "one_to_one")]
    OneToOne,
    #[serde(rename = "1:many", alias = "1:m", alias = "one_to_many")]
    OneToMany,
    #[serde(rename = "many:1", alias = "m:1", alias = "many_to_one")]
    ManyToOne,
    #[default]
    #[serde(rename = "many:many", alias = "m:m", alias = "many_to_many")]
    ManyToMany,
}

impl Cardinality {
    pub fn as_str(self) -> &'static str {
        match self {
            Cardinality::OneToOne => "1:1",
            Cardinality::OneToMany => "1:many",
            Cardinality::ManyToOne => "many:1",
            Cardinality::ManyToMany => "many:many",
        }
    }

    /// Left side must be unique among keys that also appear on the right.
    pub fn left_unique(self) -> bool {
        matches!(self, Cardinality::OneToOne | Cardinality::OneToMany)
    }

    /// Right side must be unique among keys that also appear on the left.
    pub fn right_unique(self) -> bool {
        matches!(self, Cardinality::OneToOne | Cardinality::ManyToOne)
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cardinality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1:1" | "one_to_one" => Ok(Cardinality::OneToOne),
            "1:m" | "1:many" | "one_to_many" => Ok(Cardinality::OneToMany),
            "m:1" | "many:1" | "many_to_one" => Ok(Cardinality::ManyToOne),
            "m:m" | "many:many" | "many_to_many" => Ok(Cardinality::ManyToMany),
            other => Err(Error::Config(format!(
                "unknown cardinality '{other}' (expected 1:1, 1:m, m:1 or m:m)"
            ))),
        }
    }
}

/// Which input a column or row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Column pair compared for equality. Always fully resolved by the time it
/// reaches the join operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JoinKey {
    pub left: String,
    pub right: String,
}

impl JoinKey {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Same column name on both sides.
    pub fn natural(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            left: name.clone(),
            right: name,
        }
    }

    pub fn is_natural(&self) -> bool {
        self.left == self.right
    }
}

impl fmt::Display for JoinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_natural() {
            write!(f, "{}", self.left)
        } else {
            write!(f, "{} = {}", self.left, self.right)
        }
    }
}

/// Per-row provenance of a join result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeIndicator {
    LeftOnly,
    RightOnly,
    Both,
}

impl MergeIndicator {
    pub fn as_str(self) -> &'static str {
        match self {
            MergeIndicator::LeftOnly => "left_only",
            MergeIndicator::RightOnly => "right_only",
            MergeIndicator::Both => "both",
        }
    }
}

impl fmt::Display for MergeIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
