//! End-to-end engine properties.

use proptest::prelude::*;
use proptest::string::string_regex;
use serde_json::{json, Value};
use std::sync::Arc;
use suggero::{Options, Suggester};

fn word() -> impl Strategy<Value = String> {
    string_regex("[a-z]{4,8}").unwrap()
}

proptest! {
    #[test]
    fn indexed_word_is_always_recalled(
        words in prop::collection::vec(word(), 1..5),
        pick in any::<prop::sample::Index>(),
    ) {
        let text = words.join(" ");
        let target = pick.get(&words).clone();
        let options = Options {
            thresh_relative_to_best: 0.0,
            ..Options::default()
        };
        let mut engine = Suggester::with_source(options, vec![json!(text.clone())]).unwrap();
        let results = engine.search(&target);
        prop_assert!(!results.is_empty(), "{target:?} missed in {text:?}");
    }

    #[test]
    fn word_prefix_is_recalled(
        words in prop::collection::vec(word(), 1..4),
        pick in any::<prop::sample::Index>(),
        len in 3usize..5,
    ) {
        let text = words.join(" ");
        let target: String = pick.get(&words).chars().take(len).collect();
        let options = Options {
            thresh_relative_to_best: 0.0,
            ..Options::default()
        };
        let mut engine = Suggester::with_source(options, vec![json!(text.clone())]).unwrap();
        prop_assert!(
            !engine.search(&target).is_empty(),
            "{target:?} missed in {text:?}"
        );
    }

    #[test]
    fn results_are_sorted_descending(
        sources in prop::collection::vec(
            prop::collection::vec(word(), 1..4).prop_map(|w| w.join(" ")),
            1..8,
        ),
        query in word(),
    ) {
        let records: Vec<Value> = sources.iter().map(|s| json!(s)).collect();
        let mut engine = Suggester::with_source(Options::default(), records).unwrap();
        let results = engine.search(&query);
        for pair in results.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn upsert_preserves_count_and_content(
        first in word(),
        second in word(),
    ) {
        prop_assume!(first != second);
        let options = Options {
            keys: "name".into(),
            identify_item: Some(Arc::new(|record: &Value| {
                record.get("id").map(|id| id.to_string())
            })),
            thresh_relative_to_best: 0.0,
            ..Options::default()
        };
        let mut engine = Suggester::with_source(
            options,
            vec![json!({"id": 7, "name": first.clone()})],
        )
        .unwrap();
        engine.add(json!({"id": 7, "name": second.clone()}));

        prop_assert_eq!(engine.nb_indexed(), 1);
        let results = engine.search(&second);
        prop_assert!(!results.is_empty());
        prop_assert_eq!(&results[0].item["name"], &json!(second.clone()));
    }

    #[test]
    fn store_never_invents_results(
        sources in prop::collection::vec(
            prop::collection::vec(word(), 1..3).prop_map(|w| w.join(" ")),
            1..10,
        ),
        query in word(),
    ) {
        let records: Vec<Value> = sources.iter().map(|s| json!(s)).collect();
        let mut plain =
            Suggester::with_source(Options::default(), records.clone()).unwrap();
        let with_store = Options {
            use_index_store: true,
            store_thresh: 0.0,
            store_max_results: usize::MAX,
            thresh_relative_to_best: 0.0,
            ..Options::default()
        };
        let mut filtered = Suggester::with_source(with_store, records).unwrap();

        let full: Vec<String> = plain.search(&query).iter().map(|r| r.item.to_string()).collect();
        for result in filtered.search(&query) {
            prop_assert!(
                full.contains(&result.item.to_string()),
                "store invented {} for {query:?}",
                result.item
            );
        }
    }

    #[test]
    fn search_never_panics_on_arbitrary_input(
        query in "\\PC{0,30}",
        source in prop::collection::vec("\\PC{0,30}", 0..5),
    ) {
        let records: Vec<Value> = source.iter().map(|s| json!(s)).collect();
        let mut engine = Suggester::with_source(Options::default(), records).unwrap();
        let _ = engine.search(&query);
        let _ = engine.highlight(&query);
    }
}
