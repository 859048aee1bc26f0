//! Ranking order: score dominance, field position, token order, ties.

use super::common::{string_engine, titled_engine, titles};
use serde_json::json;
use suggero::{Options, Suggester};

#[test]
fn closer_match_ranks_first() {
    let mut engine = string_engine(&["survey", "surgery", "insurgence"]);
    let results = engine.search("surgeo");
    assert_eq!(results[0].item, json!("surgery"));
}

#[test]
fn scores_descend() {
    let mut engine = string_engine(&["surgery", "survey", "insurgence", "surge protector"]);
    let results = engine.search("surge");
    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn title_match_beats_body_match() {
    let mut engine = titled_engine(&[
        ("About Photography", "all about cameras and lenses"),
        ("About Mountains", "photography in the mountains is great"),
    ]);
    let results = engine.search("photography");
    assert_eq!(results.len(), 2);
    assert_eq!(
        titles(&results),
        vec!["About Photography", "About Mountains"]
    );
}

#[test]
fn in_order_phrase_beats_scrambled_phrase() {
    let mut engine = string_engine(&["green bottle house", "house green bottle"]);
    let results = engine.search("green bottle house");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].item, json!("green bottle house"));
}

#[test]
fn equal_scores_tie_break_alphabetically() {
    let mut engine = string_engine(&["zebra pattern", "apple pattern", "mango pattern"]);
    let results = engine.search("pattern");
    assert_eq!(results.len(), 3);
    let items: Vec<&str> = results.iter().map(|r| r.item.as_str().unwrap()).collect();
    assert_eq!(items, vec!["apple pattern", "mango pattern", "zebra pattern"]);
}

#[test]
fn relative_threshold_drops_distant_runners_up() {
    let options = Options {
        thresh_relative_to_best: 0.9,
        ..Options::default()
    };
    let mut engine = Suggester::with_source(
        options,
        vec![json!("target phrase"), json!("tangentially related")],
    )
    .unwrap();
    let results = engine.search("target");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].item, json!("target phrase"));
}

#[test]
fn absolute_threshold_applies_to_all() {
    let options = Options {
        thresh_include: 1000.0,
        ..Options::default()
    };
    let mut engine =
        Suggester::with_source(options, vec![json!("target phrase")]).unwrap();
    assert!(engine.search("target").is_empty());
}

#[test]
fn rounding_collapses_close_scores() {
    let options = Options {
        score_round: 100.0,
        ..Options::default()
    };
    let mut engine = Suggester::with_source(
        options,
        vec![json!("beta target"), json!("alpha target x")],
    )
    .unwrap();
    // Coarse rounding flattens both scores to the same bucket, so the
    // alphabetical tie-break decides.
    let results = engine.search("target");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].item, json!("alpha target x"));
}

#[test]
fn scrambled_queries_still_rank_full_coverage_higher() {
    let mut engine = string_engine(&["lord of the rings", "lord of war"]);
    let results = engine.search("rings lord");
    assert_eq!(results[0].item, json!("lord of the rings"));
}
