//! 도메인 타입 — 플레이어 식별 정보

use std::fmt;

use serde::{Deserialize, Serialize};

/// 접속 중인 플레이어
///
/// 외부 상태 소스가 반환하는 한 행입니다. 슬롯 유일성은 소스의 속성이며
/// 여기서 강제하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// 클라이언트 슬롯 번호
    pub client_slot: u32,
    /// 표시 이름 (색상 코드 포함 가능)
    pub name: String,
    /// 전역 고유 ID
    pub guid: String,
}

impl Player {
    /// 새 플레이어 레코드를 생성합니다.
    pub fn new(client_slot: u32, name: impl Into<String>, guid: impl Into<String>) -> Self {
        Self {
            client_slot,
            name: name.into(),
            guid: guid.into(),
        }
    }

    /// 색상 코드를 제거한 이름을 반환합니다.
    pub fn clean_name(&self) -> String {
        strip_color_codes(&self.name)
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} ({})", self.client_slot, self.clean_name(), self.guid)
    }
}

/// 색상 코드 마커를 제거합니다.
///
/// 마커는 `^` 뒤의 한 문자이며 두 문자가 함께 제거됩니다.
/// 문자열 끝에 홀로 남은 `^`도 제거됩니다.
pub fn strip_color_codes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        if c == '^' {
            chars.next();
            continue;
        }
        out.push(c);
    }

    out
}
