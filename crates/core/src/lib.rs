//! gamelog 공통 크레이트
//!
//! 게임 서버 로그 수집기의 모든 크레이트가 공유하는 도메인 타입,
//! 확장 포인트 trait, 에러 분류, 설정, 메트릭 이름을 정의합니다.

pub mod config;
pub mod error;
pub mod event;
pub mod metrics;
pub mod pipeline;
pub mod types;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{ConfigError, GamelogError, ParseError, SourceError, TailError};

// 설정
pub use config::GamelogConfig;

// 이벤트
pub use event::{BaseEvent, Combatant, Event, EventKind, KillEvent, PlayerEvent, ServerEvent};

// 확장 포인트 trait
pub use pipeline::{PlayerSource, StaticPlayerSource};

// 도메인 타입
pub use types::{Player, strip_color_codes};
