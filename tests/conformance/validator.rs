use super::common::{load_suite, registry, values_equal};
use fieldcheck::{RuleSpec, Validator};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A single end-to-end validation case.
#[derive(Debug, serde::Deserialize)]
struct TestCase {
    name: String,
    id: String,
    data: Value,
    rules: RuleSpec,
    #[serde(default)]
    messages: HashMap<String, String>,
    #[serde(default)]
    attributes: HashMap<String, String>,
    expected: Expected,
}

#[derive(Debug, serde::Deserialize)]
struct Expected {
    passes: bool,
    #[serde(default)]
    errors: Option<Map<String, Value>>,
    #[serde(default)]
    failed: Option<HashMap<String, Vec<String>>>,
    #[serde(default)]
    validated: Option<Value>,
}

fn check(case: &TestCase) -> Result<(), String> {
    let mut validator = Validator::with_registry(registry(), case.data.clone(), case.rules.clone());
    validator
        .messages(case.messages.clone())
        .attributes(case.attributes.clone());

    let passes = validator.passes().map_err(|e| format!("config error: {}", e))?;
    if passes != case.expected.passes {
        return Err(format!(
            "expected passes={}, got {} with errors {:?}",
            case.expected.passes,
            passes,
            validator.get_errors()
        ));
    }

    if let Some(expected) = &case.expected.errors {
        let actual = validator.get_errors().map_err(|e| e.to_string())?;
        if !values_equal(&Value::Object(actual.clone()), &Value::Object(expected.clone())) {
            return Err(format!("errors: expected {:?}, got {:?}", expected, actual));
        }
    }

    if let Some(expected) = &case.expected.failed {
        let actual = validator.failed().map_err(|e| e.to_string())?;
        if actual != expected {
            return Err(format!("failed rules: expected {:?}, got {:?}", expected, actual));
        }
    }

    if let Some(expected) = &case.expected.validated {
        let actual = Value::Object(validator.safe());
        if !values_equal(&actual, expected) {
            return Err(format!("validated: expected {}, got {}", expected, actual));
        }
    }

    Ok(())
}

#[test]
fn validator_conformance_suite() {
    let cases: Vec<TestCase> = load_suite("validator.yaml");

    let mut passed = 0;
    let mut failed = 0;

    for case in &cases {
        match check(case) {
            Ok(()) => passed += 1,
            Err(reason) => {
                eprintln!("  FAIL [{}] {}: {}", case.id, case.name, reason);
                failed += 1;
            }
        }
    }

    eprintln!("validator: {} passed, {} failed", passed, failed);
    assert_eq!(failed, 0, "{} validator case(s) failed", failed);
}
