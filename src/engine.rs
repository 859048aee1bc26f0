// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The search engine façade.
//!
//! [`Suggester`] owns the configuration, the declared key paths, the source
//! records, the prepared index, and (optionally) the n-gram pre-filter.
//! A search parses the query, narrows candidates, scores each candidate
//! record, and selects results under the evolving inclusion threshold.
//!
//! The threshold only rises during a search (`thresh_relative_to_best`
//! tightens it as better records appear), so results admitted early can
//! trail the final floor; callers wanting a strict post-hoc cut should
//! re-filter on the returned scores.
//!
//! One engine instance per thread: the per-search query scratch is owned by
//! the search call, but `add`/`set_source`/rebuild must not overlap a
//! search.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::config::{ConfigError, Options, OutputMapping};
use crate::extract::KeyPath;
use crate::highlight::highlight;
use crate::index::{build_record, Index, Upsert};
use crate::query::{Query, TagMap};
use crate::score::score_item;
use crate::store::NgramStore;
use crate::types::SearchResult;

/// Approximate-matching suggest engine over an in-memory record collection.
pub struct Suggester {
    options: Options,
    paths: Vec<KeyPath>,
    key_pairs: Vec<(String, String)>,
    tags: TagMap,
    output_path: Option<KeyPath>,
    source: Vec<Value>,
    index: Index,
    store: Option<NgramStore>,
    dirty: bool,
    last_query: Option<Query>,
}

impl Suggester {
    /// Build an engine with an empty source.
    pub fn new(options: Options) -> Result<Suggester, ConfigError> {
        options.validate()?;
        let key_pairs = options.key_pairs();
        let paths = key_pairs
            .iter()
            .map(|(_, path)| KeyPath::parse(path))
            .collect::<Result<Vec<_>, _>>()?;
        let tags = TagMap::build(&key_pairs);
        let output_path = match &options.output_map {
            OutputMapping::Path(path) => Some(KeyPath::parse(path)?),
            _ => None,
        };
        Ok(Suggester {
            options,
            paths,
            key_pairs,
            tags,
            output_path,
            source: Vec::new(),
            index: Index::default(),
            store: None,
            dirty: true,
            last_query: None,
        })
    }

    /// Build an engine over an initial record collection.
    pub fn with_source(options: Options, source: Vec<Value>) -> Result<Suggester, ConfigError> {
        let mut engine = Suggester::new(options)?;
        engine.set_source(source);
        Ok(engine)
    }

    /// Replace the source collection. Indexing happens now, or at the next
    /// search when `lazy` is set.
    pub fn set_source(&mut self, source: Vec<Value>) {
        self.source = source;
        self.dirty = true;
        if !self.options.lazy {
            self.rebuild();
        }
    }

    /// Rebuild the index (and the n-gram store) from the current source.
    pub fn rebuild(&mut self) {
        self.index = Index::build(&self.source, &self.paths, &self.options);
        self.store = self
            .options
            .use_index_store
            .then(|| NgramStore::build(self.index.records()));
        self.dirty = false;
    }

    /// Add one record: appends, or replaces in place when `identify_item`
    /// maps it to a known id.
    pub fn add(&mut self, record: Value) {
        if self.dirty {
            // Not indexed yet; the pending rebuild will pick it up.
            self.source.push(record);
            return;
        }
        let prepared = build_record(&record, &self.paths, &self.options);
        match self.index.upsert(prepared) {
            Upsert::Appended(slot) => {
                self.source.push(record);
                if let (Some(store), Some(rec)) = (&mut self.store, self.index.get(slot)) {
                    store.add_record(slot, rec);
                }
            }
            Upsert::Replaced(slot) => {
                if let Some(entry) = self.source.get_mut(slot) {
                    *entry = record;
                }
                if let (Some(store), Some(rec)) = (&mut self.store, self.index.get(slot)) {
                    store.add_record(slot, rec);
                }
            }
        }
    }

    /// Number of indexed records.
    pub fn nb_indexed(&self) -> usize {
        self.index.nb_indexed()
    }

    /// True when nothing is indexed (pending lazy rebuilds included).
    pub fn is_empty(&self) -> bool {
        self.index.nb_indexed() == 0 && self.source.is_empty()
    }

    /// The active configuration.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Rank the indexed records against a free-form query.
    pub fn search(&mut self, raw_query: &str) -> Vec<SearchResult> {
        if self.dirty {
            self.rebuild();
        }
        let mut query = Query::parse(raw_query, &self.options, &self.tags, self.paths.len());
        if query.is_empty() {
            self.last_query = Some(query);
            return Vec::new();
        }

        struct Hit {
            slot: usize,
            score: f64,
            field: usize,
            leaf: usize,
        }

        let opts = &self.options;
        let index = &self.index;
        let mut thresh = opts.thresh_include;
        let mut best_score = 0.0f64;
        let mut hits: Vec<Hit> = Vec::new();

        let mut consider = |slot: usize, query: &mut Query, thresh: &mut f64| {
            let Some(record) = index.get(slot) else {
                return;
            };
            let item = score_item(&record.fields, query, opts);
            if item.score <= 0.0 {
                return;
            }
            if item.score > best_score {
                best_score = item.score;
            }
            // The floor only rises within a search.
            *thresh = thresh.max(item.score * opts.thresh_relative_to_best);
            if item.score > *thresh {
                hits.push(Hit {
                    slot,
                    score: (item.score / opts.score_round).round() * opts.score_round,
                    field: item.field,
                    leaf: item.leaf,
                });
            }
        };

        match &self.store {
            Some(store) => {
                let candidates = store.candidates(&query, opts);
                trace!(candidates = candidates.len(), "store pre-filter applied");
                for slot in candidates {
                    consider(slot as usize, &mut query, &mut thresh);
                }
            }
            None => {
                for slot in 0..index.nb_indexed() {
                    consider(slot, &mut query, &mut thresh);
                }
            }
        }

        // Descending rounded score, alphabetical tie-break on the first
        // field's text.
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    let ka = index.get(a.slot).map(|r| r.sort_key.as_str()).unwrap_or("");
                    let kb = index.get(b.slot).map(|r| r.sort_key.as_str()).unwrap_or("");
                    ka.cmp(kb)
                })
        });
        if self.options.output_limit > 0 {
            hits.truncate(self.options.output_limit);
        }

        let results: Vec<SearchResult> = hits
            .into_iter()
            .filter_map(|hit| {
                let record = index.get(hit.slot)?;
                Some(SearchResult {
                    item: self.project(&record.item),
                    score: hit.score,
                    match_index: hit.field,
                    sub_index: hit.leaf,
                    sort_key: record.sort_key.clone(),
                })
            })
            .collect();

        debug!(
            query = raw_query,
            results = results.len(),
            best = best_score,
            "search complete"
        );
        self.last_query = Some(query);
        results
    }

    /// Apply the configured output projection to one record.
    fn project(&self, item: &Value) -> Value {
        match &self.options.output_map {
            OutputMapping::Identity => item.clone(),
            OutputMapping::AliasObject => {
                let mut object = Map::new();
                for ((tag, path_text), path) in self.key_pairs.iter().zip(&self.paths) {
                    let alias = if tag.is_empty() { path_text } else { tag };
                    let key = if alias.is_empty() { "item" } else { alias };
                    object.insert(
                        key.to_string(),
                        Value::String(path.flat_text(item, &self.options.token_sep)),
                    );
                }
                Value::Object(object)
            }
            OutputMapping::Path(_) => {
                let leaves = self
                    .output_path
                    .as_ref()
                    .map(|path| path.leaf_strings(item))
                    .unwrap_or_default();
                // One value per input item, even when the path is missing.
                match leaves.len() {
                    0 => Value::Null,
                    1 => Value::String(leaves.into_iter().next().unwrap_or_default()),
                    _ => Value::Array(leaves.into_iter().map(Value::String).collect()),
                }
            }
            OutputMapping::Custom(map) => map(item),
        }
    }

    /// Highlight a raw field string against the most recent query.
    /// Before any search, the text comes back unmarked.
    pub fn highlight(&self, raw: &str) -> String {
        match &self.last_query {
            Some(query) => highlight(raw, query, &self.options),
            None => raw.to_string(),
        }
    }

    /// Highlight against a one-shot query without touching search state.
    pub fn highlight_with(&self, raw: &str, raw_query: &str) -> String {
        let query = Query::parse(raw_query, &self.options, &self.tags, self.paths.len());
        highlight(raw, &query, &self.options)
    }
}

impl std::fmt::Debug for Suggester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suggester")
            .field("nb_indexed", &self.index.nb_indexed())
            .field("keys", &self.key_pairs)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}
