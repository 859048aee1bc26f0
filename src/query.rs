// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query parsing: tag routing, token packing, fused string.
//!
//! A raw query splits into a root segment and, when tagged keys are
//! declared, per-tag segments introduced by `tag:` markers. Each segment is
//! normalised, tokenised under the query size discipline, and packed into
//! machine-word groups. The root also carries the *fused* string — the whole
//! normalised query, truncated — which backs the fallback pass that catches
//! joins like `"oldman"` for the query `"old man"`.
//!
//! Tag names are regex-escaped before the marker alternation is compiled, so
//! a tag that looks like regex syntax is still matched literally; a `tag:`
//! whose tag was never declared stays plain query text.
//!
//! The query owns all per-search scratch (`fused_score` and every group's
//! slots), so one engine instance per thread is the only sharing rule.

use std::collections::HashMap;

use regex::Regex;

use crate::config::Options;
use crate::lcs::Alphabet;
use crate::normalize::normalize;
use crate::pack::{pack_tokens, TokenGroup};

/// Maps declared tags to key slots and finds `tag:` markers in raw queries.
#[derive(Debug, Clone, Default)]
pub(crate) struct TagMap {
    marker: Option<Regex>,
    slots: HashMap<String, usize>,
}

impl TagMap {
    /// Build from `(tag, path)` pairs; untagged keys contribute nothing.
    pub fn build(keys: &[(String, String)]) -> TagMap {
        let tags: Vec<&str> = keys
            .iter()
            .filter(|(tag, _)| !tag.is_empty())
            .map(|(tag, _)| tag.as_str())
            .collect();
        if tags.is_empty() {
            return TagMap::default();
        }
        let alternation = tags
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        // Tag names are escaped, so compilation cannot fail at runtime.
        let marker = Regex::new(&format!("(?i)({alternation}):")).ok();
        let slots = keys
            .iter()
            .enumerate()
            .filter(|(_, (tag, _))| !tag.is_empty())
            .map(|(slot, (tag, _))| (tag.to_lowercase(), slot))
            .collect();
        TagMap { marker, slots }
    }

    /// Split a raw query into the root text and `(key slot, text)` segments.
    fn split<'a>(&self, raw: &'a str) -> (String, Vec<(usize, &'a str)>) {
        let Some(marker) = &self.marker else {
            return (raw.to_string(), Vec::new());
        };
        let mut root = String::new();
        let mut segments: Vec<(usize, &str)> = Vec::new();
        let mut cursor = 0usize;
        let mut open: Option<usize> = None;

        for found in marker.find_iter(raw) {
            let before = &raw[cursor..found.start()];
            match open {
                None => root.push_str(before),
                Some(slot) => segments.push((slot, before)),
            }
            let tag = raw[found.start()..found.end() - 1].to_lowercase();
            open = self.slots.get(&tag).copied();
            cursor = found.end();
        }
        let rest = &raw[cursor..];
        match open {
            None => root.push_str(rest),
            Some(slot) => segments.push((slot, rest)),
        }
        (root, segments)
    }
}

/// A parsed query: root tokens, packed groups, fused string, and one child
/// slot per declared key (filled when the query carried that tag).
#[derive(Debug, Clone)]
pub struct Query {
    /// Full normalised text of this segment.
    pub normalized: String,
    /// Tokens after size discipline, in order.
    pub tokens: Vec<String>,
    pub(crate) groups: Vec<TokenGroup>,
    pub(crate) fused: Vec<char>,
    pub(crate) fused_alpha: Alphabet,
    pub(crate) fused_score: f64,
    pub(crate) children: Vec<Option<Box<Query>>>,
}

impl Query {
    /// Parse a raw query against the declared keys.
    pub(crate) fn parse(raw: &str, opts: &Options, tags: &TagMap, nb_keys: usize) -> Query {
        let (root_text, segments) = tags.split(raw);
        let mut root = Query::segment(&root_text, opts, nb_keys);
        for (slot, text) in segments {
            if text.trim().is_empty() {
                continue;
            }
            let child = Query::segment(text, opts, 0);
            match &mut root.children[slot] {
                Some(existing) => existing.merge(child, opts),
                empty => *empty = Some(Box::new(child)),
            }
        }
        root
    }

    /// Build one segment: normalise, tokenise, pack, fuse.
    fn segment(text: &str, opts: &Options, nb_children: usize) -> Query {
        let normalized = normalize(text, &opts.token_sep);
        let tokens = query_tokens(&normalized, opts);
        let groups = pack_tokens(&tokens);
        let fused: Vec<char> = normalized
            .chars()
            .take(opts.token_fused_max_length)
            .collect();
        let fused_alpha = Alphabet::of(&fused);
        Query {
            normalized,
            tokens,
            groups,
            fused,
            fused_alpha,
            fused_score: 0.0,
            children: (0..nb_children).map(|_| None).collect(),
        }
    }

    /// Fold a later same-tag segment into this one.
    fn merge(&mut self, other: Query, opts: &Options) {
        if other.tokens.is_empty() {
            return;
        }
        if !self.normalized.is_empty() {
            self.normalized.push(' ');
        }
        self.normalized.push_str(&other.normalized);
        self.tokens.extend(other.tokens);
        self.groups = pack_tokens(&self.tokens);
        self.fused = self
            .normalized
            .chars()
            .take(opts.token_fused_max_length)
            .collect();
        self.fused_alpha = Alphabet::of(&self.fused);
    }

    /// No tokens anywhere: searching would be a no-op.
    pub(crate) fn is_empty(&self) -> bool {
        self.tokens.is_empty()
            && self
                .children
                .iter()
                .all(|child| child.as_ref().map_or(true, |c| c.tokens.is_empty()))
    }

    /// Zero the per-record scratch, recursively.
    pub(crate) fn reset_scratch(&mut self) {
        self.fused_score = 0.0;
        for group in &mut self.groups {
            group.reset_item_scratch();
        }
        for child in self.children.iter_mut().flatten() {
            child.reset_scratch();
        }
    }

    /// Aggregate per-token best over the current record: the larger of the
    /// token-slot sum and the fused score, plus every child's aggregate.
    pub(crate) fn score_item_total(&self) -> f64 {
        let mut sum = 0.0;
        for group in &self.groups {
            for slot in &group.score_item {
                sum += slot;
            }
        }
        if self.fused_score > sum {
            sum = self.fused_score;
        }
        for child in self.children.iter().flatten() {
            sum += child.score_item_total();
        }
        sum
    }
}

/// Query-side token discipline: drop below the minimum, truncate above the
/// maximum. No short-string exception on this side.
fn query_tokens(normalized: &str, opts: &Options) -> Vec<String> {
    normalized
        .split(' ')
        .filter(|w| !w.is_empty() && w.chars().count() >= opts.token_query_min_length)
        .map(|w| {
            if w.chars().count() > opts.token_query_max_length {
                w.chars().take(opts.token_query_max_length).collect()
            } else {
                w.to_string()
            }
        })
        .collect()
}
