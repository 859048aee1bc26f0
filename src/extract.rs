// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Record walking and leaf tokenisation.
//!
//! A declared key is a dotted path (`author.name`, `tags.*`, `chapters.*.title`)
//! walked through a [`serde_json::Value`] record. `*` branches over array
//! elements and object values; a numeric segment indexes into arrays; a
//! missing component simply yields no leaves (unreachable keys are not
//! errors). Whatever scalar the walk lands on is string-coerced and split
//! into a [`Leaf`] of searchable tokens.
//!
//! Size discipline: field tokens shorter than `token_field_min_length` are
//! dropped and longer than `token_field_max_length` truncated — except that
//! a leaf whose whole normalised text is at most twice the minimum keeps
//! every token, so short titles like "Item 3" survive intact.

use serde_json::Value;

use crate::config::{ConfigError, Options};
use crate::normalize::normalize;

/// One path component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    /// Object key, or array index when it parses as one.
    Key(String),
    /// Branch over every element / value.
    Wildcard,
}

/// A parsed dotted path.
#[derive(Debug, Clone)]
pub struct KeyPath {
    segments: Vec<Segment>,
}

impl KeyPath {
    /// Parse a dotted path. An optional leading `item.` or `root.` prefix is
    /// stripped; the empty remainder addresses the record itself.
    pub fn parse(path: &str) -> Result<KeyPath, ConfigError> {
        let stripped = path
            .strip_prefix("item.")
            .or_else(|| path.strip_prefix("root."))
            .unwrap_or(match path {
                "item" | "root" => "",
                other => other,
            });

        let mut segments = Vec::new();
        if !stripped.is_empty() {
            for seg in stripped.split('.') {
                if seg.is_empty() {
                    return Err(ConfigError::InvalidKeyPath {
                        path: path.to_string(),
                        reason: "empty path segment",
                    });
                }
                segments.push(if seg == "*" {
                    Segment::Wildcard
                } else {
                    Segment::Key(seg.to_string())
                });
            }
        }
        Ok(KeyPath { segments })
    }

    /// Every scalar leaf reachable along this path, string-coerced, in
    /// document order. Nulls produce no leaf.
    pub fn leaf_strings(&self, record: &Value) -> Vec<String> {
        let mut out = Vec::new();
        walk(record, &self.segments, &mut out);
        out
    }

    /// All leaf text of this path joined by single spaces and normalised.
    /// Used for the alphabetical sort key and the alias-object projection.
    pub fn flat_text(&self, record: &Value, separators: &str) -> String {
        let leaves = self.leaf_strings(record);
        normalize(&leaves.join(" "), separators)
    }
}

fn walk(value: &Value, segments: &[Segment], out: &mut Vec<String>) {
    let Some((head, rest)) = segments.split_first() else {
        flatten(value, out);
        return;
    };
    match head {
        Segment::Wildcard => match value {
            Value::Array(items) => {
                for item in items {
                    walk(item, rest, out);
                }
            }
            Value::Object(map) => {
                for item in map.values() {
                    walk(item, rest, out);
                }
            }
            _ => {}
        },
        Segment::Key(key) => match value {
            Value::Object(map) => {
                if let Some(item) = map.get(key) {
                    walk(item, rest, out);
                }
            }
            Value::Array(items) => {
                if let Ok(index) = key.parse::<usize>() {
                    if let Some(item) = items.get(index) {
                        walk(item, rest, out);
                    }
                }
            }
            _ => {}
        },
    }
}

/// Recurse through containers at the end of a path; each scalar is one leaf.
fn flatten(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Null => {}
        Value::String(s) => out.push(s.clone()),
        Value::Bool(b) => out.push(b.to_string()),
        Value::Number(n) => out.push(n.to_string()),
        Value::Array(items) => {
            for item in items {
                flatten(item, out);
            }
        }
        Value::Object(map) => {
            for item in map.values() {
                flatten(item, out);
            }
        }
    }
}

/// The tokenised content of one leaf. `tokens[..words]` are word tokens;
/// anything after is synthetic (the acronym token), which participates in
/// matching but not in the fused concatenation.
#[derive(Debug, Clone, Default)]
pub struct Leaf {
    pub tokens: Vec<String>,
    pub words: usize,
}

impl Leaf {
    /// The word tokens, without synthetic additions.
    #[inline]
    pub fn word_tokens(&self) -> &[String] {
        &self.tokens[..self.words]
    }

    /// The text the fused pass scores against.
    pub fn fused_text(&self, max_len: usize) -> String {
        let joined = self.word_tokens().join(" ");
        truncate_chars(&joined, max_len)
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

/// Normalise and tokenise one leaf string under the configured size
/// discipline, appending the acronym token when enabled.
pub(crate) fn tokenize_leaf(text: &str, opts: &Options) -> Leaf {
    let norm = normalize(text, &opts.token_sep);
    if norm.is_empty() {
        return Leaf::default();
    }

    // Short-leaf exception: a title barely longer than the minimum keeps
    // all of its tokens.
    let keep_short = norm.chars().count() <= 2 * opts.token_field_min_length;

    let mut tokens: Vec<String> = Vec::new();
    let mut acronym = String::new();
    for word in norm.split(' ') {
        if let Some(initial) = word.chars().next() {
            acronym.push(initial);
        }
        if keep_short || word.chars().count() >= opts.token_field_min_length {
            tokens.push(truncate_chars(word, opts.token_field_max_length));
        }
    }

    let words = tokens.len();
    if opts.score_acronym && acronym.chars().count() >= 2 {
        tokens.push(truncate_chars(&acronym, opts.token_field_max_length));
    }
    Leaf { tokens, words }
}
