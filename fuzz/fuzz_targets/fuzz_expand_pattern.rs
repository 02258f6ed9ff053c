#![no_main]

use fieldcheck::primitives::{expand_pattern, resolve_value, set_path};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte picks the split between pattern and JSON input.
    let split = data[0] as usize % data.len().max(1);
    let (pattern_bytes, value_bytes) = data.split_at(split.min(data.len()));

    let pattern = String::from_utf8_lossy(pattern_bytes);

    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(value_bytes) {
        let mut projection = serde_json::Value::Object(serde_json::Map::new());
        for path in expand_pattern(&pattern, &value) {
            if let Some(found) = resolve_value(&value, &path) {
                set_path(&mut projection, &value, &path, found.clone());
            }
        }
    }
});
