use fieldcheck::parse::{coerce_parameter, parse_rule, split_pipeline};
use proptest::prelude::*;
use serde_json::{Value, json};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn integer_parameters_are_numbers(name in "[a-z_]{1,12}", a in any::<i64>(), b in any::<i64>()) {
        prop_assume!(name != "regex");
        let parsed = parse_rule(&format!("{}:{},{}", name, a, b));
        prop_assert_eq!(parsed.name, name);
        prop_assert_eq!(parsed.params, vec![json!(a), json!(b)]);
    }

    #[test]
    fn regex_remainder_is_verbatim(pattern in "[ -~]{0,40}") {
        let parsed = parse_rule(&format!("regex:{}", pattern));
        prop_assert_eq!(parsed.name.as_str(), "regex");
        prop_assert_eq!(parsed.params, vec![Value::String(pattern)]);
    }

    #[test]
    fn name_is_everything_before_the_first_colon(name in "[a-z_]{1,12}", rest in "[a-z0-9:,]{0,20}") {
        prop_assume!(name != "regex");
        let parsed = parse_rule(&format!("{}:{}", name, rest));
        prop_assert_eq!(parsed.name, name);
        prop_assert_eq!(parsed.params.len(), rest.split(',').count());
    }

    #[test]
    fn words_stay_strings(word in "[a-z]{1,10}") {
        prop_assume!(!["true", "false", "null"].contains(&word.as_str()));
        prop_assert_eq!(coerce_parameter(&word), Value::String(word.clone()));
    }

    #[test]
    fn pipelines_drop_empty_segments(tokens in prop::collection::vec("[a-z]{1,8}", 0..6)) {
        let joined = format!("|{}||", tokens.join(" | "));
        prop_assert_eq!(split_pipeline(&joined), tokens);
    }
}
