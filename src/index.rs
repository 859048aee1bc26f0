// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The indexed record list.
//!
//! Each source record is prepared once into an [`IndexedRecord`]: its leaf
//! token lists per declared key, the id extracted by `identify_item` (when
//! configured), and the sort key used for alphabetical tie-breaks. The
//! index is append-only except for id-based upsert, which replaces the
//! record in place so slot order — and therefore result tie-break order —
//! stays stable.
//!
//! Invariant: for every id in the map, `records[map[id]].id == Some(id)`;
//! mapped slots are always live.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::config::Options;
use crate::extract::{tokenize_leaf, KeyPath, Leaf};

/// One record prepared for scoring.
#[derive(Debug, Clone)]
pub struct IndexedRecord {
    /// The host record, as supplied.
    pub item: Value,
    /// Per declared key, the leaves visited along its path.
    pub fields: Vec<Vec<Leaf>>,
    /// First field's flattened text; alphabetical tie-break key.
    pub sort_key: String,
    /// Id extracted by `identify_item`, when configured.
    pub id: Option<String>,
}

/// Prepare one record against the declared key paths.
pub(crate) fn build_record(record: &Value, paths: &[KeyPath], opts: &Options) -> IndexedRecord {
    let fields: Vec<Vec<Leaf>> = paths
        .iter()
        .map(|path| {
            path.leaf_strings(record)
                .iter()
                .map(|leaf| tokenize_leaf(leaf, opts))
                .collect()
        })
        .collect();
    let sort_key = paths
        .first()
        .map(|path| path.flat_text(record, &opts.token_sep))
        .unwrap_or_default();
    let id = opts.identify_item.as_ref().and_then(|f| f(record));
    IndexedRecord {
        item: record.clone(),
        fields,
        sort_key,
        id,
    }
}

/// Outcome of an [`Index::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Upsert {
    Appended(usize),
    Replaced(usize),
}

/// Ordered collection of prepared records with an optional id → slot map.
#[derive(Debug, Clone, Default)]
pub(crate) struct Index {
    records: Vec<IndexedRecord>,
    ids: HashMap<String, usize>,
}

impl Index {
    /// Rebuild from a source collection.
    pub fn build(source: &[Value], paths: &[KeyPath], opts: &Options) -> Index {
        let mut index = Index::default();
        for record in source {
            index.upsert(build_record(record, paths, opts));
        }
        debug!(
            records = index.records.len(),
            keys = paths.len(),
            "index built"
        );
        index
    }

    /// Append, or replace in place when the record's id is already mapped.
    pub fn upsert(&mut self, record: IndexedRecord) -> Upsert {
        if let Some(id) = &record.id {
            if let Some(&slot) = self.ids.get(id) {
                self.records[slot] = record;
                return Upsert::Replaced(slot);
            }
            self.ids.insert(id.clone(), self.records.len());
        }
        self.records.push(record);
        Upsert::Appended(self.records.len() - 1)
    }

    /// Count of live entries.
    #[inline]
    pub fn nb_indexed(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn records(&self) -> &[IndexedRecord] {
        &self.records
    }

    #[inline]
    pub fn get(&self, slot: usize) -> Option<&IndexedRecord> {
        self.records.get(slot)
    }
}
