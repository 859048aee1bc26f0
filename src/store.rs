// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Optional n-gram inverted store for candidate narrowing.
//!
//! Every word of every leaf emits a small key set: its first character,
//! every ordered 2-combination drawn from its first 4 characters (at most
//! 6), and every ordered 3-combination from its first 6 (at most 20).
//! Keys are de-duplicated per record, and the store maps each key to the
//! ascending list of record slots carrying it.
//!
//! At search time the query words emit the same key set; slots are counted
//! by how many query keys they carry, and only slots reaching
//! `store_thresh` of the best count survive, capped at `store_max_results`.
//! The filter is lossy in one direction only: it can drop weak candidates,
//! never invent matches — with the store disabled, the candidate list is
//! simply the whole index.
//!
//! Upserts append the new content's keys without retiring stale ones;
//! stale keys cost extra candidates but can never lose a record.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::config::Options;
use crate::index::IndexedRecord;
use crate::query::Query;

/// Inverted key → slots map.
#[derive(Debug, Clone, Default)]
pub(crate) struct NgramStore {
    keys: HashMap<String, Vec<u32>>,
}

/// Emit the key set of one word into `out`.
fn emit_keys(word: &str, out: &mut HashSet<String>) {
    let chars: Vec<char> = word.chars().collect();
    if chars.is_empty() {
        return;
    }
    out.insert(chars[0].to_string());

    let pair_end = chars.len().min(4);
    for i in 0..pair_end {
        for j in (i + 1)..pair_end {
            out.insert([chars[i], chars[j]].iter().collect());
        }
    }

    let triple_end = chars.len().min(6);
    for i in 0..triple_end {
        for j in (i + 1)..triple_end {
            for k in (j + 1)..triple_end {
                out.insert([chars[i], chars[j], chars[k]].iter().collect());
            }
        }
    }
}

/// Key set of one prepared record: every word token of every leaf.
fn record_keys(record: &IndexedRecord) -> HashSet<String> {
    let mut keys = HashSet::new();
    for field in &record.fields {
        for leaf in field {
            for word in leaf.word_tokens() {
                emit_keys(word, &mut keys);
            }
        }
    }
    keys
}

/// Key set of a query: root words plus every child's words.
fn query_keys(query: &Query, out: &mut HashSet<String>) {
    for token in &query.tokens {
        emit_keys(token, out);
    }
    for child in query.children.iter().flatten() {
        query_keys(child, out);
    }
}

impl NgramStore {
    /// Build from every record of a fresh index.
    pub fn build(records: &[IndexedRecord]) -> NgramStore {
        let mut store = NgramStore::default();
        for (slot, record) in records.iter().enumerate() {
            store.add_record(slot, record);
        }
        debug!(keys = store.keys.len(), records = records.len(), "ngram store built");
        store
    }

    /// Register one record's keys under its slot.
    pub fn add_record(&mut self, slot: usize, record: &IndexedRecord) {
        let slot = slot as u32;
        for key in record_keys(record) {
            let slots = self.keys.entry(key).or_default();
            if slots.last() != Some(&slot) {
                slots.push(slot);
            }
        }
    }

    /// Candidate slots for a query, best-covered first.
    pub fn candidates(&self, query: &Query, opts: &Options) -> Vec<u32> {
        let mut keys = HashSet::new();
        query_keys(query, &mut keys);
        if keys.is_empty() {
            return Vec::new();
        }

        let mut counts: HashMap<u32, u32> = HashMap::new();
        for key in &keys {
            if let Some(slots) = self.keys.get(key) {
                for &slot in slots {
                    *counts.entry(slot).or_insert(0) += 1;
                }
            }
        }
        let Some(&best) = counts.values().max() else {
            return Vec::new();
        };

        let floor = (opts.store_thresh * best as f64).ceil() as u32;
        let mut kept: Vec<(u32, u32)> = counts
            .into_iter()
            .filter(|&(_, count)| count >= floor.max(1))
            .collect();
        // Descending by coverage, ascending slot for determinism.
        kept.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        kept.truncate(opts.store_max_results);

        trace!(candidates = kept.len(), best_count = best, "store narrowed");
        kept.into_iter().map(|(slot, _)| slot).collect()
    }
}
