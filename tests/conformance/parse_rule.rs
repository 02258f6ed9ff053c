use super::common::{load_suite, values_equal};
use fieldcheck::parse::parse_rule;
use serde_json::Value;

#[derive(Debug, serde::Deserialize)]
struct ParseRuleCase {
    name: String,
    id: String,
    token: String,
    expected: ExpectedRule,
}

#[derive(Debug, serde::Deserialize)]
struct ExpectedRule {
    name: String,
    params: Vec<Value>,
}

#[test]
fn parse_rule_suite() {
    let cases: Vec<ParseRuleCase> = load_suite("parse_rule.yaml");

    let mut passed = 0;
    let mut failed = 0;

    for case in &cases {
        let parsed = parse_rule(&case.token);
        let params_match = parsed.params.len() == case.expected.params.len()
            && parsed
                .params
                .iter()
                .zip(&case.expected.params)
                .all(|(a, b)| values_equal(a, b));

        if parsed.name == case.expected.name && params_match {
            passed += 1;
        } else {
            eprintln!(
                "  FAIL [{}] {}: expected {} {:?}, got {} {:?}",
                case.id, case.name, case.expected.name, case.expected.params, parsed.name, parsed.params
            );
            failed += 1;
        }
    }

    eprintln!("parse_rule: {} passed, {} failed", passed, failed);
    assert_eq!(failed, 0, "{} parse_rule case(s) failed", failed);
}
