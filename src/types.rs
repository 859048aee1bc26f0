// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Public result types.

use serde::Serialize;
use serde_json::Value;

/// One ranked search hit.
///
/// `item` is the record after output projection; `match_index` /
/// `sub_index` locate the winning field and the leaf inside it, so hosts
/// can fetch the matched text for highlighting.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    /// The (possibly projected) record.
    pub item: Value,
    /// Rounded relevance score.
    pub score: f64,
    /// Index of the best-matching declared key.
    pub match_index: usize,
    /// Index of the best-matching leaf inside that key.
    pub sub_index: usize,
    /// Alphabetical tie-break key (first field's flattened text).
    #[serde(skip)]
    pub sort_key: String,
}
