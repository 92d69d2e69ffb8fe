#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use gamelog_events::classify;
use libfuzzer_sys::fuzz_target;

/// 시각 토큰 + 임의 본문으로 구성된 라인
#[derive(Debug, Arbitrary)]
struct TimestampedLine {
    hours: Option<u16>,
    minutes: u16,
    seconds: u16,
    body: String,
}

fuzz_target!(|input: TimestampedLine| {
    let body = input.body.trim();
    if body.is_empty() {
        return;
    }

    let (token, expected) = match input.hours {
        Some(h) => (
            format!("{}:{}:{}", h, input.minutes, input.seconds),
            u64::from(h) * 3600 + u64::from(input.minutes) * 60 + u64::from(input.seconds),
        ),
        None => (
            format!("{}:{}", input.minutes, input.seconds),
            u64::from(input.minutes) * 60 + u64::from(input.seconds),
        ),
    };

    let line = format!("{token} {body}");
    if let Ok(event) = classify(&line) {
        assert_eq!(event.timestamp(), Some(Duration::from_secs(expected)));
    }
});
