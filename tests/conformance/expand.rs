use super::common::load_suite;
use fieldcheck::primitives::expand_pattern;
use serde_json::Value;

#[derive(Debug, serde::Deserialize)]
struct ExpandCase {
    name: String,
    id: String,
    pattern: String,
    data: Value,
    expected: Vec<String>,
}

#[test]
fn expand_pattern_suite() {
    let cases: Vec<ExpandCase> = load_suite("expand.yaml");

    let mut passed = 0;
    let mut failed = 0;

    for case in &cases {
        let actual = expand_pattern(&case.pattern, &case.data);
        if actual == case.expected {
            passed += 1;
        } else {
            eprintln!(
                "  FAIL [{}] {}: expected {:?}, got {:?}",
                case.id, case.name, case.expected, actual
            );
            failed += 1;
        }
    }

    eprintln!("expand_pattern: {} passed, {} failed", passed, failed);
    assert_eq!(failed, 0, "{} expand_pattern case(s) failed", failed);
}
