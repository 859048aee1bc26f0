//! Basic search correctness: recall, emptiness, size discipline.

use super::common::{string_engine, titled_engine};
use serde_json::json;
use suggero::{Options, Suggester};

#[test]
fn empty_query_returns_nothing() {
    let mut engine = string_engine(&["alpha", "beta"]);
    assert!(engine.search("").is_empty());
    assert!(engine.search(" \t ").is_empty());
}

#[test]
fn empty_source_returns_nothing() {
    let mut engine = Suggester::new(Options::default()).unwrap();
    assert!(engine.search("anything").is_empty());
    assert!(engine.is_empty());
}

#[test]
fn exact_word_is_found() {
    let mut engine = string_engine(&["carrot cake", "beetroot soup"]);
    let results = engine.search("carrot");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].item, json!("carrot cake"));
}

#[test]
fn typo_tolerant_recall() {
    let mut engine = string_engine(&["photography basics"]);
    for q in ["phtography", "photograpy", "fotography"] {
        assert!(!engine.search(q).is_empty(), "query {q} found nothing");
    }
}

#[test]
fn garbage_query_returns_nothing() {
    let mut engine = string_engine(&["carrot cake"]);
    assert!(engine.search("zzzzqqq").is_empty());
}

#[test]
fn single_char_query_token_is_dropped() {
    // Below token_query_min_length = 2 the token never scores.
    let mut engine = string_engine(&["carrot"]);
    assert!(engine.search("c").is_empty());
}

#[test]
fn match_location_points_at_the_winning_field() {
    let mut engine = titled_engine(&[("cooking", "gardening tips"), ("gardening", "cooking tips")]);
    let results = engine.search("gardening");
    assert!(!results.is_empty());
    // Best result matches on its title (field 0).
    assert_eq!(results[0].item["title"], json!("gardening"));
    assert_eq!(results[0].match_index, 0);
    assert_eq!(results[0].sub_index, 0);
}

#[test]
fn diacritics_fold_both_ways() {
    let mut engine = string_engine(&["Crème brûlée recipe"]);
    assert!(!engine.search("creme brulee").is_empty());
    assert!(!engine.search("crème").is_empty());
}

#[test]
fn wildcard_key_searches_array_elements() {
    let options = Options {
        keys: vec!["tags.*"].into(),
        ..Options::default()
    };
    let mut engine = Suggester::with_source(
        options,
        vec![
            json!({"tags": ["rust", "search"]}),
            json!({"tags": ["python", "parsing"]}),
        ],
    )
    .unwrap();
    let results = engine.search("search");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].item["tags"][0], json!("rust"));
}

#[test]
fn missing_key_records_never_panic_or_match() {
    let options = Options {
        keys: "title".into(),
        ..Options::default()
    };
    let mut engine = Suggester::with_source(
        options,
        vec![json!({"title": "real entry"}), json!({"other": "shape"}), json!(null)],
    )
    .unwrap();
    let results = engine.search("real");
    assert_eq!(results.len(), 1);
}

#[test]
fn short_title_exception_keeps_tiny_fields_searchable() {
    let mut engine = string_engine(&["Up", "It", "long unrelated title"]);
    // "up" is 2 chars, below token_field_min_length 3, but the whole leaf
    // is short enough to be exempt.
    let results = engine.search("up");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].item, json!("Up"));
}

#[test]
fn numbers_and_booleans_are_searchable_text() {
    let options = Options {
        keys: vec!["version"].into(),
        ..Options::default()
    };
    let mut engine = Suggester::with_source(
        options,
        vec![json!({"version": 1024}), json!({"version": 2048})],
    )
    .unwrap();
    let results = engine.search("1024");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].item["version"], json!(1024));
}
