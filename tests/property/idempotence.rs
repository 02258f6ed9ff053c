use fieldcheck::{RuleRegistry, RuleSpec, Validator};
use proptest::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-50i64..50).prop_map(|i| json!(i)),
        "[a-z0-9 ]{0,12}".prop_map(Value::String),
    ]
}

fn arb_pipeline() -> impl Strategy<Value = String> {
    let rule = prop_oneof![
        Just("required"),
        Just("nullable"),
        Just("bail"),
        Just("sometimes"),
        Just("string"),
        Just("integer"),
        Just("numeric"),
        Just("min:3"),
        Just("max:10"),
        Just("between:1,5"),
        Just("alpha_num"),
        Just("in:a,b,1"),
    ];
    prop::collection::vec(rule, 1..5).prop_map(|rules| rules.join("|"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn validate_is_memoized(
        fields in prop::collection::vec(("[a-e]", arb_scalar(), arb_pipeline()), 1..5),
    ) {
        let mut data = serde_json::Map::new();
        let mut rules = RuleSpec::new();
        for (name, value, pipeline) in fields {
            data.insert(name.clone(), value);
            rules.insert(name, pipeline);
        }

        let registry = Arc::new(RuleRegistry::with_defaults());
        let mut validator = Validator::with_registry(registry, Value::Object(data), rules);

        let first = validator.validate().unwrap();
        let count = validator.errors().unwrap().count();
        let second = validator.validate().unwrap();

        prop_assert_eq!(first, second);
        prop_assert_eq!(validator.errors().unwrap().count(), count);
        prop_assert_eq!(first, count == 0);
    }
}
