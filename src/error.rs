//! 소스 어댑터 내부 에러
//!
//! 어댑터 밖으로는 전파되지 않습니다. `PolicySource::fetch_candidates`가
//! 경고 로그를 남기고 빈 결과로 바꿉니다.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("API key not configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("unparseable payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl SourceError {
    /// 타임아웃 여부 (로그 구분용)
    pub fn is_timeout(&self) -> bool {
        matches!(self, SourceError::Http(e) if e.is_timeout())
    }
}

pub type SourceResult<T> = Result<T, SourceError>;
