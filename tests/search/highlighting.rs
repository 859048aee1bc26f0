//! Highlight rendering against searched queries.

use super::common::string_engine;
use suggero::{Options, Suggester};
use serde_json::json;

fn marked() -> Options {
    Options {
        highlight_before: "[".to_string(),
        highlight_after: "]".to_string(),
        ..Options::default()
    }
}

#[test]
fn marks_each_matched_token() {
    let mut engine =
        Suggester::with_source(marked(), vec![json!("John Ronald Doe")]).unwrap();
    engine.search("john doe");
    assert_eq!(engine.highlight("John Ronald Doe"), "[John] Ronald [Doe]");
}

#[test]
fn highlight_before_any_search_is_verbatim() {
    let engine = Suggester::with_source(marked(), vec![json!("text")]).unwrap();
    assert_eq!(engine.highlight("Untouched Text"), "Untouched Text");
}

#[test]
fn one_shot_highlight_does_not_disturb_search_state() {
    let mut engine =
        Suggester::with_source(marked(), vec![json!("alpha beta")]).unwrap();
    engine.search("alpha");
    let one_shot = engine.highlight_with("gamma delta", "delta");
    assert_eq!(one_shot, "gamma [delta]");
    // The stored query is still "alpha".
    assert_eq!(engine.highlight("alpha beta"), "[alpha] beta");
}

#[test]
fn whitespace_and_punctuation_survive() {
    let mut engine =
        Suggester::with_source(marked(), vec![json!("strange spacing")]).unwrap();
    engine.search("strange spacing");
    assert_eq!(
        engine.highlight("Strange,   spacing!"),
        "[Strange],   [spacing]!"
    );
}

#[test]
fn fused_highlight_wraps_the_joined_word() {
    let options = Options {
        score_test_fused: true,
        ..marked()
    };
    let mut engine = Suggester::with_source(options, vec![json!("oldman")]).unwrap();
    engine.search("old man");
    assert_eq!(engine.highlight("oldman"), "[oldman]");
}

#[test]
fn partial_match_marks_the_prefix_slice() {
    let mut engine = string_engine(&["Surgery"]);
    engine.search("surg");
    let marked = engine.highlight("Surgery");
    assert!(
        marked.starts_with("<strong class=\"highlight\">Surg"),
        "{marked}"
    );
}

#[test]
fn unmatched_text_comes_back_verbatim() {
    let mut engine = Suggester::with_source(marked(), vec![json!("match me")]).unwrap();
    engine.search("match");
    assert_eq!(engine.highlight("entirely different"), "entirely different");
}
