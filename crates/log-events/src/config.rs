//! 테일러 설정
//!
//! [`TailerConfig`]는 core의 [`TailerSection`](gamelog_core::config::TailerSection)을
//! 런타임에서 바로 쓰기 좋은 형태(`PathBuf`, `Duration`)로 변환한 설정입니다.
//!
//! # 사용 예시
//! ```
//! use gamelog_core::config::GamelogConfig;
//! use gamelog_events::config::TailerConfig;
//!
//! let core_config = GamelogConfig::default();
//! let config = TailerConfig::from_core(&core_config.tailer);
//! assert!(config.start_at_end);
//! ```

use std::path::PathBuf;
use std::time::Duration;

use gamelog_core::config::TailerSection;

use crate::error::EventsError;

/// 폴링/재열기 간격 상한
const MAX_INTERVAL: Duration = Duration::from_secs(60);

/// 출력 채널 용량 상한
const MAX_CHANNEL_CAPACITY: usize = 1_000_000;

/// 라인 길이 제한의 상한
const MAX_LINE_BYTES: usize = 16 * 1024 * 1024;

/// 로그 테일러 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailerConfig {
    /// 감시할 로그 파일 경로
    pub path: PathBuf,
    /// true면 시작 시 파일 끝으로 이동
    pub start_at_end: bool,
    /// 새 데이터가 없을 때 대기 간격
    pub poll_interval: Duration,
    /// 로테이션 후 재열기 실패 시 재시도 간격
    pub reopen_retry: Duration,
    /// 출력 채널 용량 (채널은 호출자가 생성)
    pub channel_capacity: usize,
    /// 한 라인의 최대 바이트 수 (종결자 제외)
    pub max_line_bytes: usize,
}

impl Default for TailerConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("games_mp.log"),
            start_at_end: true,
            poll_interval: Duration::from_millis(150),
            reopen_retry: Duration::from_millis(200),
            channel_capacity: 256,
            max_line_bytes: 64 * 1024,
        }
    }
}

impl TailerConfig {
    /// core의 `TailerSection`에서 테일러 설정을 생성합니다.
    pub fn from_core(core: &TailerSection) -> Self {
        Self {
            path: PathBuf::from(&core.path),
            start_at_end: core.start_at_end,
            poll_interval: Duration::from_millis(core.poll_interval_ms),
            reopen_retry: Duration::from_millis(core.reopen_retry_ms),
            channel_capacity: core.channel_capacity,
            max_line_bytes: core.max_line_bytes,
        }
    }

    /// 경로만 지정하고 나머지는 기본값인 설정을 생성합니다.
    pub fn for_path(path: impl Into<PathBuf>, start_at_end: bool) -> Self {
        Self {
            path: path.into(),
            start_at_end,
            ..Self::default()
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), EventsError> {
        if self.path.as_os_str().is_empty() {
            return Err(EventsError::Config {
                field: "path".to_owned(),
                reason: "path must not be empty".to_owned(),
            });
        }

        validate_interval("poll_interval", self.poll_interval)?;
        validate_interval("reopen_retry", self.reopen_retry)?;

        if self.channel_capacity == 0 || self.channel_capacity > MAX_CHANNEL_CAPACITY {
            return Err(EventsError::Config {
                field: "channel_capacity".to_owned(),
                reason: format!("must be 1-{}", MAX_CHANNEL_CAPACITY),
            });
        }

        if self.max_line_bytes == 0 || self.max_line_bytes > MAX_LINE_BYTES {
            return Err(EventsError::Config {
                field: "max_line_bytes".to_owned(),
                reason: format!("must be 1-{}", MAX_LINE_BYTES),
            });
        }

        Ok(())
    }
}

fn validate_interval(field: &str, value: Duration) -> Result<(), EventsError> {
    if value < Duration::from_millis(1) || value > MAX_INTERVAL {
        return Err(EventsError::Config {
            field: field.to_owned(),
            reason: format!("must be 1ms-{}s", MAX_INTERVAL.as_secs()),
        });
    }
    Ok(())
}

/// 테일러 설정 빌더
#[derive(Default)]
pub struct TailerConfigBuilder {
    config: TailerConfig,
}

impl TailerConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 감시할 파일 경로를 설정합니다.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// 파일 끝에서 시작할지 설정합니다.
    pub fn start_at_end(mut self, start_at_end: bool) -> Self {
        self.config.start_at_end = start_at_end;
        self
    }

    /// 폴링 간격을 설정합니다.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// 재열기 재시도 간격을 설정합니다.
    pub fn reopen_retry(mut self, interval: Duration) -> Self {
        self.config.reopen_retry = interval;
        self
    }

    /// 출력 채널 용량을 설정합니다.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.config.channel_capacity = capacity;
        self
    }

    /// 한 라인의 최대 바이트 수를 설정합니다.
    pub fn max_line_bytes(mut self, max: usize) -> Self {
        self.config.max_line_bytes = max;
        self
    }

    /// 설정을 검증하고 `TailerConfig`를 생성합니다.
    pub fn build(self) -> Result<TailerConfig, EventsError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
