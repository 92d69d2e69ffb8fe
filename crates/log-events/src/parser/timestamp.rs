//! 라인 선두 시각 토큰 파싱

use std::time::Duration;

/// `M:S` 또는 `H:M:S` 토큰을 경과 시간으로 변환합니다.
///
/// 각 구성요소는 10진 숫자만 허용하며 범위 검사는 하지 않습니다
/// (`0:75`는 75초). 형식이 맞지 않거나 오버플로우되면 `None`을 반환합니다.
///
/// ```
/// use std::time::Duration;
/// use gamelog_events::parser::parse_timestamp;
///
/// assert_eq!(parse_timestamp("12:34"), Some(Duration::from_secs(754)));
/// assert_eq!(parse_timestamp("1:02:03"), Some(Duration::from_secs(3723)));
/// assert_eq!(parse_timestamp("12"), None);
/// ```
pub fn parse_timestamp(token: &str) -> Option<Duration> {
    let parts: Vec<&str> = token.split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return None;
    }

    let mut total: u64 = 0;
    for part in parts {
        let value = parse_component(part)?;
        total = total.checked_mul(60)?.checked_add(value)?;
    }

    Some(Duration::from_secs(total))
}

fn parse_component(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}
