#![no_main]

use fieldcheck::RuleSet;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    if let Ok(set) = RuleSet::from_yaml(&s) {
        for (_, pipeline) in set.rules.iter() {
            let _ = pipeline.tokens();
        }
    }
    let _ = RuleSet::from_json(&s);
});
