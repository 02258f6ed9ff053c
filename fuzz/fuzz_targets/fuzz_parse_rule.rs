#![no_main]

use fieldcheck::parse::{parse_rule, split_pipeline};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    for token in split_pipeline(data) {
        let _ = parse_rule(&token);
    }
});
