use fieldcheck::primitives::{expand_pattern, has_path, resolve_value};
use proptest::prelude::*;
use serde_json::{Value, json};

/// Strategy for arbitrary JSON values nested up to `depth` levels.
fn arb_json(depth: u32) -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|i| json!(i)),
        "[a-z]{1,8}".prop_map(Value::String),
    ];

    leaf.prop_recursive(depth, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-z][a-z0-9_]{0,5}", inner), 1..5).prop_map(|pairs| {
                let map: serde_json::Map<String, Value> = pairs.into_iter().collect();
                Value::Object(map)
            }),
        ]
    })
}

/// Sequence of records, each optionally carrying an `x` key.
fn arb_items() -> impl Strategy<Value = Value> {
    prop::collection::vec(prop::option::of(any::<i64>()), 0..8).prop_map(|xs| {
        let items = xs
            .into_iter()
            .map(|x| match x {
                Some(x) => json!({"x": x}),
                None => json!({"other": true}),
            })
            .collect();
        json!({"items": Value::Array(items)})
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn literal_patterns_are_returned_unchanged(
        pattern in "[a-z]{1,6}(\\.[a-z0-9]{1,6}){0,3}",
        data in arb_json(3),
    ) {
        prop_assert_eq!(expand_pattern(&pattern, &data), vec![pattern.clone()]);
    }

    #[test]
    fn one_path_per_element_in_index_order(data in arb_items()) {
        let len = data["items"].as_array().map_or(0, Vec::len);
        let expected: Vec<String> = (0..len).map(|i| format!("items.{}.x", i)).collect();
        prop_assert_eq!(expand_pattern("items.*.x", &data), expected);
    }

    #[test]
    fn expanded_paths_never_contain_wildcards(data in arb_json(4)) {
        for pattern in ["*", "*.*", "*.a", "a.*.b", "*.*.*"] {
            for path in expand_pattern(pattern, &data) {
                prop_assert!(!path.split('.').any(|s| s == "*"), "{} -> {}", pattern, path);
                prop_assert_eq!(path.split('.').count(), pattern.split('.').count());
            }
        }
    }

    #[test]
    fn only_the_last_segment_may_be_missing(data in arb_json(4)) {
        for pattern in ["*.a", "*.*", "a.*.b", "*.*.c"] {
            for path in expand_pattern(pattern, &data) {
                let parent = path.rsplit_once('.').map(|(p, _)| p.to_string());
                if let Some(parent) = parent
                    && pattern.rsplit_once('.').is_some_and(|(p, _)| p.ends_with('*'))
                {
                    prop_assert!(has_path(&data, &parent), "{} -> {} (parent missing)", pattern, path);
                }
            }
        }
    }

    #[test]
    fn trailing_wildcard_paths_resolve(data in arb_json(4)) {
        for path in expand_pattern("*", &data) {
            prop_assert!(resolve_value(&data, &path).is_some(), "{} does not resolve", path);
        }
    }
}
