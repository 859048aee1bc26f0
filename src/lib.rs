//! Approximate string matching for suggest-as-you-type autocomplete.
//!
//! Records (any [`serde_json::Value`]) are indexed along declared dotted
//! key paths, and queries are ranked against them with a bit-parallel
//! Longest-Common-Subsequence kernel — tolerant of typos, partial words,
//! and token reordering, which is exactly what a suggestion dropdown needs.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐    ┌────────────┐    ┌─────────────┐
//! │ extract.rs │───▶│  index.rs  │───▶│  engine.rs  │
//! │ (KeyPath,  │    │ (Index,    │    │ (Suggester, │
//! │  Leaf)     │    │  upsert)   │    │  search)    │
//! └────────────┘    └────────────┘    └─────────────┘
//!       │                 │                  │
//!       ▼                 ▼                  ▼
//! ┌──────────────────────────────────────────────────┐
//! │ lcs/ (kernels) · pack.rs (word groups) · score.rs│
//! │ query.rs (tags) · assign.rs · align.rs · store.rs│
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use serde_json::json;
//! use suggero::{Options, Suggester};
//!
//! let options = Options {
//!     keys: "title".into(),
//!     ..Options::default()
//! };
//! let source = vec![
//!     json!({"title": "The Fellowship of the Ring"}),
//!     json!({"title": "The Two Towers"}),
//! ];
//! let mut engine = Suggester::with_source(options, source).unwrap();
//!
//! let results = engine.search("felowship");
//! assert_eq!(results[0].item["title"], json!("The Fellowship of the Ring"));
//! ```
//!
//! # Scoring
//!
//! Token pairs are scored `sz · llcs² + bonus_match_start · prefix` with
//! `sz = (m+n)/(2mn)`; fields add an in-order token bonus and a per-field
//! position boost; records blend their best field with a per-token
//! aggregate. See `score.rs` for the composition rules and `lcs/` for the
//! kernels.

// Module declarations
mod align;
mod assign;
mod config;
mod engine;
mod extract;
mod highlight;
mod index;
mod lcs;
mod normalize;
mod pack;
mod query;
mod score;
mod store;
mod types;

// Re-exports for public API
pub use config::{ConfigError, IdentifyItem, Keys, Options, OutputMapping};
pub use engine::Suggester;
pub use extract::{KeyPath, Leaf};
pub use index::IndexedRecord;
pub use normalize::{common_prefix_len, fold_char, normalize};
pub use query::Query;
pub use types::SearchResult;
