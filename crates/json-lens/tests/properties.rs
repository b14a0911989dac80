//! Property tests over generated documents.

use json_lens::search::leaf_paths;
use json_lens::{aggregate, get, pretty::minify};
use proptest::prelude::*;
use serde_json::Value;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1_000_000i64..1_000_000).prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "[a-zA-Z0-9 _\\-\"\\\\é]{0,8}".prop_map(Value::String),
    ]
}

fn document() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-z_]{1,6}", inner), 0..6)
                .prop_map(|members| Value::Object(members.into_iter().collect())),
        ]
    })
}

/// Compact or indented text for the same document.
fn text() -> impl Strategy<Value = String> {
    (document(), any::<bool>()).prop_map(|(doc, indented)| {
        if indented {
            serde_json::to_string_pretty(&doc).unwrap()
        } else {
            serde_json::to_string(&doc).unwrap()
        }
    })
}

proptest! {
    /// Property: every resolving path yields a contiguous slice of the input.
    #[test]
    fn results_are_slices_of_the_input(json in text()) {
        for path in leaf_paths(&json) {
            let ctx = get(&json, &path);
            prop_assert!(ctx.exists(), "{path} did not resolve");
            prop_assert!(ctx.is_borrowed());
            let start = ctx.index().unwrap();
            prop_assert_eq!(&json[start..start + ctx.raw().len()], ctx.raw());
        }
    }

    /// Property: minifying is a fixed point.
    #[test]
    fn minify_is_idempotent(json in text()) {
        let once = get(&json, "@minify").raw().to_owned();
        let again = get(&once, "@minify");
        prop_assert_eq!(again.raw(), once.as_str());
        prop_assert_eq!(minify(&once), once.clone());
    }

    /// Property: pretty-printing then minifying recovers the compact form.
    #[test]
    fn pretty_then_minify_round_trips(json in text()) {
        let round = get(&json, "@pretty|@minify");
        let compact = get(&json, "@minify");
        prop_assert_eq!(round.raw(), compact.raw());
    }

    /// Property: minified text decodes to the same document.
    #[test]
    fn minify_preserves_the_document(json in text()) {
        let original: Value = serde_json::from_str(&json).unwrap();
        let compact = get(&json, "@minify");
        let decoded: Value = serde_json::from_str(compact.raw()).unwrap();
        prop_assert_eq!(decoded, original);
    }

    /// Property: distinct never grows the input and is stable on its own output.
    #[test]
    fn distinct_is_idempotent(items in prop::collection::vec(scalar(), 0..20)) {
        let json = serde_json::to_string(&items).unwrap();
        let once: Vec<String> = aggregate::distinct(&json, "").iter().map(|c| c.raw().to_owned()).collect();
        prop_assert!(once.len() <= items.len());
        let again_json = format!("[{}]", once.join(","));
        let twice: Vec<String> = aggregate::distinct(&again_json, "").iter().map(|c| c.raw().to_owned()).collect();
        prop_assert_eq!(twice, once);
    }

    /// Property: count matches the element count of the resolved value.
    #[test]
    fn count_matches_array_length(items in prop::collection::vec(scalar(), 0..20)) {
        let json = serde_json::json!({ "items": items.clone(), "one": 1 }).to_string();
        prop_assert_eq!(aggregate::count(&json, "items"), items.len());
        prop_assert_eq!(aggregate::count(&json, "items"), get(&json, "items").array().len());
        prop_assert_eq!(aggregate::count(&json, "one"), 1);
        prop_assert_eq!(aggregate::count(&json, "missing"), 0);
    }
}
