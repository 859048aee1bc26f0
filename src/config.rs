// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Engine configuration.
//!
//! [`Options`] is a plain record of every recognised knob, validated once at
//! engine construction and passed by shared reference into the scoring
//! kernels. Callback-valued options are `Arc`-wrapped so `Options` stays
//! cheap to clone.
//!
//! Defaults are tuned for suggest-as-you-type over titles and short fields;
//! they favour few long subsequence matches over many fragmentary ones.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

/// How declared keys are supplied.
///
/// A tagged mapping exposes each tag both as a query prefix (`tag:` scopes a
/// sub-query to that field) and as an output alias for the alias-object
/// projection.
#[derive(Debug, Clone)]
pub enum Keys {
    /// A single dotted path. The empty string means the record itself.
    Single(String),
    /// A list of dotted paths, searched in declared order.
    List(Vec<String>),
    /// Ordered `(tag, path)` pairs.
    Tagged(Vec<(String, String)>),
}

impl Default for Keys {
    fn default() -> Self {
        Keys::Single(String::new())
    }
}

impl From<&str> for Keys {
    fn from(path: &str) -> Self {
        Keys::Single(path.to_string())
    }
}

impl From<Vec<String>> for Keys {
    fn from(paths: Vec<String>) -> Self {
        Keys::List(paths)
    }
}

impl From<Vec<&str>> for Keys {
    fn from(paths: Vec<&str>) -> Self {
        Keys::List(paths.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<(&str, &str)>> for Keys {
    fn from(pairs: Vec<(&str, &str)>) -> Self {
        Keys::Tagged(
            pairs
                .into_iter()
                .map(|(t, p)| (t.to_string(), p.to_string()))
                .collect(),
        )
    }
}

/// Projection applied to each matched record before it is returned.
#[derive(Clone, Default)]
pub enum OutputMapping {
    /// Return the record as indexed.
    #[default]
    Identity,
    /// Return an object with one entry per declared tag, valued with that
    /// field's flattened text.
    AliasObject,
    /// Return the value at a dotted path inside the record
    /// (missing → `Value::Null`).
    Path(String),
    /// Caller-supplied mapping.
    Custom(Arc<dyn Fn(&Value) -> Value + Send + Sync>),
}

impl fmt::Debug for OutputMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMapping::Identity => f.write_str("Identity"),
            OutputMapping::AliasObject => f.write_str("AliasObject"),
            OutputMapping::Path(p) => write!(f, "Path({p:?})"),
            OutputMapping::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Record-to-id extraction, enabling in-place upsert on [`crate::Suggester::add`].
pub type IdentifyItem = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Every recognised option. See each field for its effect.
#[derive(Clone)]
pub struct Options {
    /// Score floor below which two tokens are treated as unrelated for
    /// order-bonus purposes.
    pub minimum_match: f64,
    /// Absolute minimum candidate score.
    pub thresh_include: f64,
    /// Dynamic floor as a fraction of the best score seen so far, in `[0,1]`.
    pub thresh_relative_to_best: f64,
    /// Stop scanning further fields of a record once one scores above this.
    pub field_good_enough: f64,
    /// Per-character bonus for a common prefix.
    pub bonus_match_start: f64,
    /// Bonus per in-order consecutive token pair (distance-weighted).
    pub bonus_token_order: f64,
    /// Multiplicative decay of the per-field position bonus, in `(0,1]`.
    pub bonus_position_decay: f64,
    /// Per-token composition; when false, fused scoring only.
    pub score_per_token: bool,
    /// Additionally try a whole-string fused pass and keep the better score.
    pub score_test_fused: bool,
    /// Synthesise acronym tokens at indexing and reward initials during
    /// alignment.
    pub score_acronym: bool,
    /// Separator character set (always extended with Unicode whitespace).
    pub token_sep: String,
    /// Rounding granularity applied to scores before the tie-break.
    pub score_round: f64,
    /// Maximum number of returned results; 0 means unlimited.
    pub output_limit: usize,
    /// Projection applied to matched records.
    pub output_map: OutputMapping,
    /// Query tokens shorter than this are dropped.
    pub token_query_min_length: usize,
    /// Field tokens shorter than this are dropped (see the short-leaf
    /// exception in the extractor).
    pub token_field_min_length: usize,
    /// Query tokens longer than this are truncated.
    pub token_query_max_length: usize,
    /// Field tokens longer than this are truncated.
    pub token_field_max_length: usize,
    /// Length cap of the fused query string and fused field concatenation.
    pub token_fused_max_length: usize,
    /// Reject a pair when `n < token_min_rel_size * m`.
    pub token_min_rel_size: f64,
    /// Reject a pair when `n > token_max_rel_size * m`.
    pub token_max_rel_size: f64,
    /// Include a shared prefix in highlight alignment.
    pub highlight_prefix: bool,
    /// Largest gap bridged inside a single highlight span.
    pub highlight_bridge_gap: usize,
    /// Opening marker emitted around matched slices.
    pub highlight_before: String,
    /// Closing marker emitted around matched slices.
    pub highlight_after: String,
    /// Enable the n-gram candidate pre-filter.
    pub use_index_store: bool,
    /// Keep candidates with at least this fraction of the best key count,
    /// in `[0,1]`.
    pub store_thresh: f64,
    /// Cap on candidates returned by the pre-filter.
    pub store_max_results: usize,
    /// Declared searchable keys.
    pub keys: Keys,
    /// Record-to-id extraction; enables upsert.
    pub identify_item: Option<IdentifyItem>,
    /// Defer (re)indexing until the next search.
    pub lazy: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            minimum_match: 1.0,
            thresh_include: 2.0,
            thresh_relative_to_best: 0.5,
            field_good_enough: 20.0,
            bonus_match_start: 0.5,
            bonus_token_order: 2.0,
            bonus_position_decay: 0.7,
            score_per_token: true,
            score_test_fused: false,
            score_acronym: false,
            token_sep: " .,-:".to_string(),
            score_round: 0.1,
            output_limit: 0,
            output_map: OutputMapping::Identity,
            token_query_min_length: 2,
            token_field_min_length: 3,
            token_query_max_length: 64,
            token_field_max_length: 64,
            token_fused_max_length: 64,
            token_min_rel_size: 0.6,
            token_max_rel_size: 10.0,
            highlight_prefix: false,
            highlight_bridge_gap: 2,
            highlight_before: "<strong class=\"highlight\">".to_string(),
            highlight_after: "</strong>".to_string(),
            use_index_store: false,
            store_thresh: 0.7,
            store_max_results: 1500,
            keys: Keys::default(),
            identify_item: None,
            lazy: false,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("minimum_match", &self.minimum_match)
            .field("thresh_include", &self.thresh_include)
            .field("thresh_relative_to_best", &self.thresh_relative_to_best)
            .field("field_good_enough", &self.field_good_enough)
            .field("score_per_token", &self.score_per_token)
            .field("score_test_fused", &self.score_test_fused)
            .field("score_acronym", &self.score_acronym)
            .field("use_index_store", &self.use_index_store)
            .field("keys", &self.keys)
            .field("output_map", &self.output_map)
            .finish_non_exhaustive()
    }
}

/// Configuration rejected at construction.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A declared key segment is syntactically malformed.
    #[error("invalid key path `{path}`: {reason}")]
    InvalidKeyPath { path: String, reason: &'static str },
    /// A numeric option is outside its documented range.
    #[error("option `{name}` = {value} out of range (expected {expected})")]
    OptionOutOfRange {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },
}

impl Options {
    /// Check every range constraint of §CONFIGURATION. Called once when the
    /// engine is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn range(
            name: &'static str,
            value: f64,
            ok: bool,
            expected: &'static str,
        ) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::OptionOutOfRange {
                    name,
                    value,
                    expected,
                })
            }
        }

        range("minimum_match", self.minimum_match, self.minimum_match >= 0.0, ">= 0")?;
        range("thresh_include", self.thresh_include, self.thresh_include >= 0.0, ">= 0")?;
        range(
            "thresh_relative_to_best",
            self.thresh_relative_to_best,
            (0.0..=1.0).contains(&self.thresh_relative_to_best),
            "[0, 1]",
        )?;
        range(
            "field_good_enough",
            self.field_good_enough,
            self.field_good_enough > 0.0,
            "> 0",
        )?;
        range(
            "bonus_match_start",
            self.bonus_match_start,
            self.bonus_match_start >= 0.0,
            ">= 0",
        )?;
        range(
            "bonus_token_order",
            self.bonus_token_order,
            self.bonus_token_order >= 0.0,
            ">= 0",
        )?;
        range(
            "bonus_position_decay",
            self.bonus_position_decay,
            self.bonus_position_decay > 0.0 && self.bonus_position_decay <= 1.0,
            "(0, 1]",
        )?;
        range("score_round", self.score_round, self.score_round > 0.0, "> 0")?;
        range(
            "token_min_rel_size",
            self.token_min_rel_size,
            self.token_min_rel_size >= 0.0 && self.token_min_rel_size <= self.token_max_rel_size,
            ">= 0 and <= token_max_rel_size",
        )?;
        range(
            "store_thresh",
            self.store_thresh,
            (0.0..=1.0).contains(&self.store_thresh),
            "[0, 1]",
        )?;
        range(
            "store_max_results",
            self.store_max_results as f64,
            self.store_max_results > 0,
            "> 0",
        )?;
        Ok(())
    }

    /// The `(tag, path)` view of the declared keys. Untagged declarations
    /// get empty tags (no query prefix, no alias).
    pub(crate) fn key_pairs(&self) -> Vec<(String, String)> {
        match &self.keys {
            Keys::Single(path) => vec![(String::new(), path.clone())],
            Keys::List(paths) => paths.iter().map(|p| (String::new(), p.clone())).collect(),
            Keys::Tagged(pairs) => pairs.clone(),
        }
    }
}
