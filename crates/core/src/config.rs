//! 설정 관리 — gamelog.toml 파싱 및 런타임 설정
//!
//! [`GamelogConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`GAMELOG_TAILER_PATH=/srv/games_mp.log` 형식)
//! 3. 설정 파일 (`gamelog.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), gamelog_core::error::GamelogError> {
//! use gamelog_core::config::GamelogConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = GamelogConfig::load("gamelog.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = GamelogConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, GamelogError};

/// 폴링 간격/재시도 간격의 상한 (밀리초)
const MAX_INTERVAL_MS: u64 = 60_000;

/// 출력 채널 용량 상한
const MAX_CHANNEL_CAPACITY: usize = 1_000_000;

/// 한 라인 최대 길이 상한 (바이트)
const MAX_LINE_BYTES: usize = 16 * 1024 * 1024;

/// gamelog 통합 설정
///
/// `gamelog.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GamelogConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 로그 테일러 설정
    #[serde(default)]
    pub tailer: TailerSection,
    /// 플레이어 디렉토리 설정
    #[serde(default)]
    pub players: PlayersSection,
}

impl GamelogConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, GamelogError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, GamelogError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GamelogError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                GamelogError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, GamelogError> {
        toml::from_str(toml_str).map_err(|e| {
            GamelogError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `GAMELOG_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "GAMELOG_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "GAMELOG_GENERAL_LOG_FORMAT");

        // Tailer
        override_string(&mut self.tailer.path, "GAMELOG_TAILER_PATH");
        override_bool(&mut self.tailer.start_at_end, "GAMELOG_TAILER_START_AT_END");
        override_u64(
            &mut self.tailer.poll_interval_ms,
            "GAMELOG_TAILER_POLL_INTERVAL_MS",
        );
        override_u64(
            &mut self.tailer.reopen_retry_ms,
            "GAMELOG_TAILER_REOPEN_RETRY_MS",
        );
        override_usize(
            &mut self.tailer.channel_capacity,
            "GAMELOG_TAILER_CHANNEL_CAPACITY",
        );
        override_usize(
            &mut self.tailer.max_line_bytes,
            "GAMELOG_TAILER_MAX_LINE_BYTES",
        );

        // Players
        override_u64(
            &mut self.players.cache_ttl_ms,
            "GAMELOG_PLAYERS_CACHE_TTL_MS",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), GamelogError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.tailer.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "tailer.path".to_owned(),
                reason: "path must not be empty".to_owned(),
            }
            .into());
        }

        if self.tailer.poll_interval_ms == 0 || self.tailer.poll_interval_ms > MAX_INTERVAL_MS {
            return Err(ConfigError::InvalidValue {
                field: "tailer.poll_interval_ms".to_owned(),
                reason: format!("must be 1-{}", MAX_INTERVAL_MS),
            }
            .into());
        }

        if self.tailer.reopen_retry_ms == 0 || self.tailer.reopen_retry_ms > MAX_INTERVAL_MS {
            return Err(ConfigError::InvalidValue {
                field: "tailer.reopen_retry_ms".to_owned(),
                reason: format!("must be 1-{}", MAX_INTERVAL_MS),
            }
            .into());
        }

        if self.tailer.channel_capacity == 0
            || self.tailer.channel_capacity > MAX_CHANNEL_CAPACITY
        {
            return Err(ConfigError::InvalidValue {
                field: "tailer.channel_capacity".to_owned(),
                reason: format!("must be 1-{}", MAX_CHANNEL_CAPACITY),
            }
            .into());
        }

        if self.tailer.max_line_bytes == 0 || self.tailer.max_line_bytes > MAX_LINE_BYTES {
            return Err(ConfigError::InvalidValue {
                field: "tailer.max_line_bytes".to_owned(),
                reason: format!("must be 1-{}", MAX_LINE_BYTES),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 로그 테일러 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TailerSection {
    /// 감시할 게임 서버 로그 파일
    pub path: String,
    /// true면 파일 끝에서부터 읽기 시작
    pub start_at_end: bool,
    /// 새 데이터가 없을 때의 폴링 간격 (밀리초)
    pub poll_interval_ms: u64,
    /// 로테이션 후 재열기 재시도 간격 (밀리초)
    pub reopen_retry_ms: u64,
    /// 출력 이벤트 채널 용량
    pub channel_capacity: usize,
    /// 한 라인의 최대 바이트 수. 넘는 라인은 버림
    pub max_line_bytes: usize,
}

impl Default for TailerSection {
    fn default() -> Self {
        Self {
            path: "games_mp.log".to_owned(),
            start_at_end: true,
            poll_interval_ms: 150,
            reopen_retry_ms: 200,
            channel_capacity: 256,
            max_line_bytes: 64 * 1024,
        }
    }
}

/// 플레이어 디렉토리 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayersSection {
    /// 플레이어 목록 캐시 TTL (밀리초). 0이면 기본값 사용
    pub cache_ttl_ms: u64,
}

impl Default for PlayersSection {
    fn default() -> Self {
        Self { cache_ttl_ms: 2000 }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
