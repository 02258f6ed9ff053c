#![no_main]

use arbitrary::Arbitrary;
use fieldcheck::{RuleRegistry, RuleSpec, Validator};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

#[derive(Debug, Arbitrary)]
struct Input {
    data: String,
    fields: Vec<(String, String)>,
    stop_on_first_failure: bool,
}

fuzz_target!(|input: Input| {
    let Ok(data) = serde_json::from_str::<serde_json::Value>(&input.data) else {
        return;
    };

    let rules: RuleSpec = input.fields.into_iter().collect();
    let registry = Arc::new(RuleRegistry::with_defaults());
    let mut validator = Validator::with_registry(registry, data, rules);
    validator.stop_on_first_failure(input.stop_on_first_failure);

    // Configuration errors are expected for arbitrary rule text.
    if let Ok(first) = validator.validate() {
        assert_eq!(validator.validate(), Ok(first));
    }
    let _ = validator.safe();
});
