//! Join configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_INDICATOR_COLUMN: &str = "_merge";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinConfig {
    /// Appended to a left column whose name also exists on the right.
    pub left_suffix: String,

    /// Appended to a right column whose name also exists on the left.
    pub right_suffix: String,

    /// Name of the provenance column; `None` leaves it out of the output.
    pub indicator_column: Option<String>,

    /// Rows of the key columns echoed after a successful run.
    pub preview_rows: usize,

    /// Field delimiter for delimited-text input and output.
    pub csv_delimiter: u8,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            left_suffix: "_x".to_string(),
            right_suffix: "_y".to_string(),
            indicator_column: Some(DEFAULT_INDICATOR_COLUMN.to_string()),
            preview_rows: 5,
            csv_delimiter: b',',
        }
    }
}

impl JoinConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `TABJOIN_LEFT_SUFFIX` / `TABJOIN_RIGHT_SUFFIX`: overlap suffixes
    /// - `TABJOIN_INDICATOR`: provenance column name
    /// - `TABJOIN_NO_INDICATOR`: any non-empty value drops the provenance column
    /// - `TABJOIN_PREVIEW_ROWS`: preview length
    /// - `TABJOIN_CSV_DELIMITER`: single-byte delimiter (`\t` accepted)
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(s) = lookup("TABJOIN_LEFT_SUFFIX") {
            cfg.left_suffix = s;
        }

        if let Some(s) = lookup("TABJOIN_RIGHT_SUFFIX") {
            cfg.right_suffix = s;
        }

        if let Some(s) = lookup("TABJOIN_INDICATOR") {
            if !s.is_empty() {
                cfg.indicator_column = Some(s);
            }
        }

        if lookup("TABJOIN_NO_INDICATOR").is_some_and(|s| !s.is_empty()) {
            cfg.indicator_column = None;
        }

        if let Some(s) = lookup("TABJOIN_PREVIEW_ROWS") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.preview_rows = v;
            }
        }

        if let Some(s) = lookup("TABJOIN_CSV_DELIMITER") {
            if let Ok(b) = parse_delimiter(&s) {
                cfg.csv_delimiter = b;
            }
        }

        cfg
    }

    /// Reject settings that would make the output ambiguous.
    pub fn validate(&self) -> Result<()> {
        if self.left_suffix == self.right_suffix {
            return Err(Error::Config(format!(
                "left and right suffixes must differ (both are '{}')",
                self.left_suffix
            )));
        }
        if let Some(name) = &self.indicator_column {
            if name.trim().is_empty() {
                return Err(Error::Config("indicator column name is blank".into()));
            }
        }
        Ok(())
    }
}

/// Parse a delimiter given as one ASCII character or the escape `\t`.
pub fn parse_delimiter(s: &str) -> Result<u8> {
    match s {
        "\\t" | "\t" | "tab" => Ok(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => Err(Error::Config(format!(
            "delimiter must be a single ASCII character, got '{s}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn env_overrides_defaults() {
        let cfg = JoinConfig::from_lookup(lookup(&[
            ("TABJOIN_LEFT_SUFFIX", "_l"),
            ("TABJOIN_RIGHT_SUFFIX", "_r"),
            ("TABJOIN_INDICATOR", "source"),
            ("TABJOIN_PREVIEW_ROWS", "12"),
            ("TABJOIN_CSV_DELIMITER", "\\t"),
        ]));
        assert_eq!(cfg.left_suffix, "_l");
        assert_eq!(cfg.right_suffix, "_r");
        assert_eq!(cfg.indicator_column.as_deref(), Some("source"));
        assert_eq!(cfg.preview_rows, 12);
        assert_eq!(cfg.csv_delimiter, b'\t');
    }

    #[test]
    fn no_indicator_wins_over_indicator_name() {
        let cfg = JoinConfig::from_lookup(lookup(&[
            ("TABJOIN_INDICATOR", "source"),
            ("TABJOIN_NO_INDICATOR", "1"),
        ]));
        assert_eq!(cfg.indicator_column, None);
    }

    #[test]
    fn unparsable_values_keep_defaults() {
        let cfg = JoinConfig::from_lookup(lookup(&[
            ("TABJOIN_PREVIEW_ROWS", "lots"),
            ("TABJOIN_CSV_DELIMITER", ";;"),
        ]));
        assert_eq!(cfg, JoinConfig::default());
    }

    #[test]
    fn identical_suffixes_are_rejected() {
        let cfg = JoinConfig {
            left_suffix: "_dup".into(),
            right_suffix: "_dup".into(),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
        assert!(JoinConfig::default().validate().is_ok());
    }
}
