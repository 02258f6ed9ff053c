use fieldcheck::RuleRegistry;
use std::path::PathBuf;
use std::sync::Arc;

/// Directory holding the YAML suites; overridable for out-of-tree suites.
pub fn fixtures_dir() -> PathBuf {
    std::env::var("FIELDCHECK_CONFORMANCE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"))
}

/// Reads and deserializes one suite file.
pub fn load_suite<T: serde::de::DeserializeOwned>(name: &str) -> Vec<T> {
    let path = fixtures_dir().join(name);
    assert!(path.exists(), "Conformance fixture not found: {:?}", path);
    let content = std::fs::read_to_string(&path).unwrap();
    serde_saphyr::from_str(&content).unwrap()
}

/// A private registry so suites never observe each other's registrations.
pub fn registry() -> Arc<RuleRegistry> {
    Arc::new(RuleRegistry::with_defaults())
}

/// Deep equality that compares numbers by value (`1000` == `1000.0`).
pub fn values_equal(a: &serde_json::Value, b: &serde_json::Value) -> bool {
    use serde_json::Value;
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON,
            _ => a == b,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, val_a)| b.get(key).is_some_and(|val_b| values_equal(val_a, val_b)))
        }
        _ => a == b,
    }
}
