//! 로테이션을 인식하는 로그 파일 테일러
//!
//! 게임 서버 로그 파일을 `tail -F`처럼 따라가며 완전한 라인마다
//! [`LineGrammar`]로 분류한 [`Event`]를 bounded mpsc 채널로 보냅니다.
//!
//! # 로테이션 감지
//! 읽을 데이터가 없을 때마다 경로를 stat 하여 다음 중 하나면 로테이션으로 봅니다.
//! - 경로의 파일 식별자(device, inode)가 열린 핸들과 다름 (교체)
//! - 경로의 크기가 현재 읽기 오프셋보다 작음 (truncation)
//!
//! 로테이션이면 핸들을 닫고 `reopen_retry` 간격으로 다시 열기를 시도한 뒤
//! 새 파일의 처음부터 읽습니다. 로테이션 자체에 대한 이벤트는 만들지 않습니다.
//!
//! # 취소와 배압
//! 루프 선두, 폴링 대기, 재열기 대기, 채널 전송 대기에서 취소 토큰을 확인합니다.
//! 채널이 가득 차면 테일러는 소비자가 비울 때까지 멈춥니다.
//!
//! # 라인 길이 제한
//! 한 번에 버퍼에 담는 양은 `max_line_bytes`(+ CR/LF)로 제한됩니다. 이를 넘는
//! 라인은 경고 후 다음 종결자까지 버립니다.

use std::io::SeekFrom;
use std::path::PathBuf;
use std::time::Duration;

use gamelog_core::event::Event;
use gamelog_core::metrics as m;
use metrics::counter;
use serde::Serialize;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncSeekExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::config::TailerConfig;
use crate::error::EventsError;
use crate::parser::LineGrammar;

/// 테일러 상태
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TailerStatus {
    /// 실행 대기 중
    Idle,
    /// 실행 중
    Running,
    /// 에러로 중단됨
    Error(String),
    /// 취소로 정상 종료됨
    Stopped,
}

/// 테일러 누적 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TailerStats {
    /// 읽은 완전한 (비어있지 않은) 라인 수
    pub lines_read: u64,
    /// 채널로 전달한 이벤트 수
    pub events_published: u64,
    /// 분류 실패로 건너뛴 라인 수
    pub parse_errors: u64,
    /// 감지한 로테이션 수
    pub rotations: u64,
    /// 길이 제한을 넘어 버린 라인 수
    pub oversized_lines: u64,
}

/// 현재 열려 있는 파일과 읽기 위치
struct OpenFile {
    reader: BufReader<File>,
    /// 소비한 바이트 기준 오프셋
    offset: u64,
}

/// 로그 파일 테일러
///
/// `tokio::spawn`으로 별도 태스크에서 [`run`](Self::run)을 호출하고,
/// 생성 시 넘긴 채널의 수신측에서 이벤트를 소비하세요.
pub struct Tailer {
    config: TailerConfig,
    tx: mpsc::Sender<Event>,
    cancel: CancellationToken,
    status: TailerStatus,
    stats: TailerStats,
}

impl Tailer {
    /// 새 테일러를 생성합니다.
    pub fn new(config: TailerConfig, tx: mpsc::Sender<Event>, cancel: CancellationToken) -> Self {
        Self {
            config,
            tx,
            cancel,
            status: TailerStatus::Idle,
            stats: TailerStats::default(),
        }
    }

    /// 테일링 루프를 실행합니다.
    ///
    /// 취소되거나 치명적 에러가 날 때까지 반환하지 않습니다.
    ///
    /// # Errors
    ///
    /// - [`EventsError::Cancelled`]: 취소 토큰에 의한 정상 종료
    /// - [`EventsError::Io`]: 최초 열기 실패 또는 EOF 외 읽기 실패
    /// - [`EventsError::Channel`]: 이벤트 수신측이 닫힘
    /// - [`EventsError::Config`]: 설정 검증 실패
    pub async fn run(&mut self) -> Result<(), EventsError> {
        self.status = TailerStatus::Running;
        info!(
            path = %self.config.path.display(),
            start_at_end = self.config.start_at_end,
            "tailer started"
        );
        let result = self.tail_loop().await;

        self.status = match &result {
            Ok(()) => TailerStatus::Stopped,
            Err(e) if e.is_cancelled() => {
                debug!(path = %self.config.path.display(), "tailer cancelled");
                TailerStatus::Stopped
            }
            Err(e) => {
                error!(path = %self.config.path.display(), error = %e, "tailer stopped");
                TailerStatus::Error(e.to_string())
            }
        };
        result
    }

    /// 현재 상태를 반환합니다.
    pub fn status(&self) -> &TailerStatus {
        &self.status
    }

    /// 누적 통계를 반환합니다.
    pub fn stats(&self) -> TailerStats {
        self.stats
    }

    /// 감시 중인 경로를 반환합니다.
    pub fn path(&self) -> &std::path::Path {
        &self.config.path
    }

    async fn tail_loop(&mut self) -> Result<(), EventsError> {
        self.config.validate()?;
        let grammar = LineGrammar::new()?;
        let mut file = self.open_initial().await?;
        let mut pending: Vec<u8> = Vec::new();
        // CR/LF 종결자 포함 한도
        let cap = self.config.max_line_bytes + 2;
        // 길이 초과 라인의 나머지를 버리는 중
        let mut discarding = false;

        loop {
            if self.cancel.is_cancelled() {
                return Err(EventsError::Cancelled);
            }

            let limit = cap.saturating_sub(pending.len()) as u64;
            let n = (&mut file.reader)
                .take(limit)
                .read_until(b'\n', &mut pending)
                .await?;
            file.offset += n as u64;
            let complete = pending.last() == Some(&b'\n');

            if discarding {
                pending.clear();
                if complete {
                    discarding = false;
                    continue;
                }
                if n > 0 {
                    continue;
                }
            } else if complete {
                let len = content_len(&pending);
                if len > self.config.max_line_bytes {
                    pending.clear();
                    self.skip_oversized(len);
                    continue;
                }
                let line = take_line(&mut pending);
                if !line.is_empty() {
                    self.handle_line(&grammar, &line).await?;
                }
                continue;
            } else if pending.len() >= cap {
                self.skip_oversized(pending.len());
                pending.clear();
                discarding = true;
                continue;
            }

            // 종결자 없음: 새 데이터를 기다려야 함
            if self.detect_rotation(&file).await {
                self.stats.rotations += 1;
                counter!(m::TAILER_ROTATIONS_TOTAL).increment(1);
                info!(
                    path = %self.config.path.display(),
                    offset = file.offset,
                    discarded_bytes = pending.len(),
                    "log rotation detected, reopening"
                );
                drop(file);
                pending.clear();
                discarding = false;
                file = self.reopen().await?;
                continue;
            }

            self.pause(self.config.poll_interval).await?;
        }
    }

    /// 최초 열기. 실패하면 재시도 없이 에러를 반환합니다.
    async fn open_initial(&self) -> Result<OpenFile, EventsError> {
        let mut handle = File::open(&self.config.path).await?;
        let offset = if self.config.start_at_end {
            handle.seek(SeekFrom::End(0)).await?
        } else {
            0
        };
        debug!(
            path = %self.config.path.display(),
            offset,
            start_at_end = self.config.start_at_end,
            "log file opened"
        );
        Ok(OpenFile {
            reader: BufReader::new(handle),
            offset,
        })
    }

    /// 경로를 다시 열 때까지 재시도합니다 (취소 가능).
    async fn reopen(&self) -> Result<OpenFile, EventsError> {
        loop {
            if self.cancel.is_cancelled() {
                return Err(EventsError::Cancelled);
            }
            match File::open(&self.config.path).await {
                Ok(handle) => {
                    debug!(path = %self.config.path.display(), "log file reopened");
                    return Ok(OpenFile {
                        reader: BufReader::new(handle),
                        offset: 0,
                    });
                }
                Err(e) => {
                    debug!(path = %self.config.path.display(), error = %e, "reopen failed, retrying");
                    self.pause(self.config.reopen_retry).await?;
                }
            }
        }
    }

    /// 경로가 현재 핸들과 다른 파일이 되었거나 잘렸는지 확인합니다.
    ///
    /// 경로 stat 실패(잠시 파일이 없음)는 로테이션이 아닌 것으로 봅니다.
    async fn detect_rotation(&self, file: &OpenFile) -> bool {
        let on_disk = match tokio::fs::metadata(&self.config.path).await {
            Ok(meta) => meta,
            Err(e) => {
                trace!(path = %self.config.path.display(), error = %e, "stat failed, will re-check");
                return false;
            }
        };

        if on_disk.len() < file.offset {
            return true;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;

            if let Ok(current) = file.reader.get_ref().metadata().await {
                if (current.dev(), current.ino()) != (on_disk.dev(), on_disk.ino()) {
                    return true;
                }
            }
        }

        false
    }

    fn skip_oversized(&mut self, bytes_seen: usize) {
        self.stats.oversized_lines += 1;
        counter!(m::TAILER_OVERSIZED_LINES_TOTAL).increment(1);
        warn!(
            path = %self.config.path.display(),
            bytes_seen,
            max_line_bytes = self.config.max_line_bytes,
            "dropping oversized line"
        );
    }

    async fn handle_line(&mut self, grammar: &LineGrammar, line: &str) -> Result<(), EventsError> {
        self.stats.lines_read += 1;
        counter!(m::TAILER_LINES_READ_TOTAL).increment(1);

        match grammar.classify(line) {
            Ok(event) => {
                trace!(kind = %event.kind(), command = event.command(), "line classified");
                self.publish(event).await
            }
            Err(EventsError::EmptyLine) => Ok(()),
            Err(e) if e.is_recoverable() => {
                self.stats.parse_errors += 1;
                counter!(m::TAILER_PARSE_ERRORS_TOTAL, m::LABEL_GRAMMAR => e.grammar().to_owned())
                    .increment(1);
                warn!(error = %e, line, "skipping unclassifiable line");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// 채널로 이벤트를 보냅니다. 가득 차면 취소 가능한 상태로 대기합니다.
    async fn publish(&mut self, event: Event) -> Result<(), EventsError> {
        let sent = tokio::select! {
            _ = self.cancel.cancelled() => return Err(EventsError::Cancelled),
            sent = self.tx.send(event) => sent,
        };
        sent.map_err(|_| EventsError::Channel("event receiver dropped".to_owned()))?;

        self.stats.events_published += 1;
        counter!(m::TAILER_EVENTS_PUBLISHED_TOTAL).increment(1);
        Ok(())
    }

    /// 취소 가능한 대기
    async fn pause(&self, duration: Duration) -> Result<(), EventsError> {
        tokio::select! {
            _ = self.cancel.cancelled() => Err(EventsError::Cancelled),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }
}

/// 기본 설정으로 `path`를 테일링합니다.
///
/// [`Tailer`]를 직접 만드는 것과 같으며, 취소되거나 치명적 에러가 날 때까지
/// 반환하지 않습니다.
///
/// # Errors
///
/// [`Tailer::run`]과 동일합니다.
pub async fn tail(
    path: impl Into<PathBuf>,
    start_at_end: bool,
    tx: mpsc::Sender<Event>,
    cancel: CancellationToken,
) -> Result<(), EventsError> {
    let config = TailerConfig::for_path(path, start_at_end);
    Tailer::new(config, tx, cancel).run().await
}

/// 끝의 CR/LF를 제외한 라인 바이트 수
fn content_len(pending: &[u8]) -> usize {
    pending
        .iter()
        .rev()
        .position(|b| !matches!(b, b'\n' | b'\r'))
        .map_or(0, |trailing| pending.len() - trailing)
}

/// 버퍼에서 라인 하나를 꺼내고 끝의 CR/LF를 제거합니다.
fn take_line(pending: &mut Vec<u8>) -> String {
    let mut end = pending.len();
    while end > 0 && matches!(pending[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    let line = String::from_utf8_lossy(&pending[..end]).into_owned();
    pending.clear();
    line
}
