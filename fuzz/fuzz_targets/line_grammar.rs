#![no_main]

use gamelog_events::classify;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let line = String::from_utf8_lossy(data);
    if let Ok(event) = classify(&line) {
        // raw는 항상 trim된 입력 전체
        assert_eq!(event.raw(), line.trim());
    }
});
