//! Tagged queries: field routing, upsert, projections.

use super::common::{catalogue, titles};
use serde_json::{json, Value};
use std::sync::Arc;
use suggero::{Options, OutputMapping, Suggester};

#[test]
fn tag_scopes_the_subquery_to_its_field() {
    let mut engine = catalogue();
    let results = engine.search("author:tolkien");
    assert_eq!(results.len(), 2);
    for title in titles(&results) {
        assert!(title.contains("Ring") || title.contains("Towers"), "{title}");
    }
}

#[test]
fn root_and_tag_combine() {
    // A good-enough title would stop the scan before the author field;
    // raise the cutoff so both contribute.
    let options = Options {
        field_good_enough: 1000.0,
        ..catalogue_options()
    };
    let mut engine = Suggester::with_source(
        options,
        vec![
            json!({"title": "The Fellowship of the Ring", "author": {"name": "Tolkien"}}),
            json!({"title": "The Two Towers", "author": {"name": "Tolkien"}}),
            json!({"title": "Dune Messiah", "author": {"name": "Herbert"}}),
        ],
    )
    .unwrap();
    let results = engine.search("towers author:tolkien");
    assert!(!results.is_empty());
    assert_eq!(titles(&results)[0], "The Two Towers");
}

#[test]
fn unknown_tag_is_searched_literally() {
    let mut engine = catalogue();
    // "publisher" is not declared; text still reaches the title index.
    let results = engine.search("publisher:earthsea");
    assert!(titles(&results).contains(&"A Wizard of Earthsea".to_string()));
}

#[test]
fn tag_case_is_insensitive() {
    let mut engine = catalogue();
    let results = engine.search("AUTHOR:herbert");
    assert_eq!(titles(&results), vec!["Dune Messiah"]);
}

fn upsert_options() -> Options {
    Options {
        keys: vec![("title", "title"), ("domain", "domain")].into(),
        identify_item: Some(Arc::new(|record: &Value| {
            record.get("_id").map(|id| id.to_string())
        })),
        ..Options::default()
    }
}

#[test]
fn added_record_is_reachable_through_its_tag() {
    let mut engine = Suggester::with_source(
        upsert_options(),
        vec![
            json!({"_id": 1, "title": "Item 1", "domain": "item1.com"}),
            json!({"_id": 2, "title": "Item 2", "domain": "item2.com"}),
        ],
    )
    .unwrap();
    engine.add(json!({"_id": 3, "title": "Item 3", "domain": "item3.com"}));

    let results = engine.search("title:Item");
    assert!(results.iter().any(|r| r.item["_id"] == json!(3)));
}

#[test]
fn upsert_replaces_not_duplicates() {
    let mut engine = Suggester::with_source(
        upsert_options(),
        vec![json!({"_id": 1, "title": "Original Name", "domain": "one.com"})],
    )
    .unwrap();
    engine.add(json!({"_id": 1, "title": "Renamed Entry", "domain": "one.com"}));

    assert_eq!(engine.nb_indexed(), 1);
    assert!(engine.search("original").is_empty());
    assert_eq!(engine.search("renamed").len(), 1);
}

#[test]
fn alias_projection_exposes_tagged_fields() {
    let options = Options {
        output_map: OutputMapping::AliasObject,
        ..catalogue_options()
    };
    let mut engine = Suggester::with_source(
        options,
        vec![json!({"title": "Dune Messiah", "author": {"name": "Herbert"}})],
    )
    .unwrap();
    let results = engine.search("dune");
    assert_eq!(results[0].item["title"], json!("dune messiah"));
    assert_eq!(results[0].item["author"], json!("herbert"));
}

fn catalogue_options() -> Options {
    Options {
        keys: vec![("title", "title"), ("author", "author.name")].into(),
        ..Options::default()
    }
}

#[test]
fn custom_projection_runs_per_result() {
    let options = Options {
        keys: "title".into(),
        output_map: OutputMapping::Custom(Arc::new(|record: &Value| {
            json!({ "shouty": record["title"].as_str().unwrap_or("").to_uppercase() })
        })),
        ..Options::default()
    };
    let mut engine =
        Suggester::with_source(options, vec![json!({"title": "quiet words"})]).unwrap();
    let results = engine.search("quiet");
    assert_eq!(results[0].item["shouty"], json!("QUIET WORDS"));
}
