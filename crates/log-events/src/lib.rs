//! gamelog 이벤트 크레이트
//!
//! 게임 서버 로그 파일을 따라가며 라인을 타입이 있는 이벤트로 분류하고,
//! 외부 상태 소스 위에 TTL 캐시 플레이어 디렉토리를 제공합니다.
//!
//! # 모듈 구성
//!
//! - [`tailer`]: 로테이션을 인식하는 파일 테일러 (bounded 채널로 이벤트 전달)
//! - [`parser`]: 라인 문법 ([`LineGrammar`], [`classify`])
//! - [`directory`]: TTL 캐시 플레이어 디렉토리
//! - [`config`]: 테일러 설정 (core 설정 변환)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! games_mp.log -> Tailer -> LineGrammar -> mpsc::Sender<Event> -> consumer
//!
//! PlayerSource -> PlayerDirectory (TTL cache) -> find_by_name / slot / guid
//! ```

pub mod config;
pub mod directory;
pub mod error;
pub mod parser;
pub mod tailer;

// --- 주요 타입 re-export ---

// 테일러
pub use tailer::{Tailer, TailerStats, TailerStatus, tail};

// 라인 문법
pub use parser::{LineGrammar, classify};

// 플레이어 디렉토리
pub use directory::PlayerDirectory;

// 설정
pub use config::{TailerConfig, TailerConfigBuilder};

// 에러
pub use error::EventsError;
