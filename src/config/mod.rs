//! 설정 모듈 - 환경변수 기반
//!
//! API 키, 엔드포인트, 소스별 타임아웃을 읽습니다. 키가 없는 소스는
//! 호출하지 않고 "결과 없음"으로 처리됩니다.

use std::time::Duration;

/// 한 번에 요청할 수 있는 최대 아이템 수
pub const MAX_PAGE_SIZE: usize = 100;

pub const YOUTH_API_URL: &str = "https://www.youthcenter.go.kr/go/ythip/getPlcy";
pub const BIZINFO_API_URL: &str = "https://www.bizinfo.go.kr/uss/rss/bizinfoApi.do";
pub const ALIOPLUS_API_URL: &str = "http://openapi.alioplus.go.kr/api/business";

/// 대화 폴백 기본 모델
pub const DEFAULT_LLM_MODEL: &str = "nlpai-lab/KULLM-Polyglot-5.8B-v2";

// ============================================================================
// Types
// ============================================================================

/// 소스 하나의 접속 설정
#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl SourceSettings {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            timeout,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// 대화 폴백 설정
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub model: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

/// 전체 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub youth: SourceSettings,
    pub bizinfo: SourceSettings,
    pub alioplus: SourceSettings,
    pub llm: LlmSettings,
}

impl AppConfig {
    /// 환경변수에서 설정 로드
    ///
    /// - `YOUTH_API_KEY`, `BIZINFO_API_KEY`, `ALIOPLUS_API_KEY`
    /// - `YOUTH_API_URL`, `BIZINFO_API_URL`, `ALIOPLUS_API_URL` (선택)
    /// - `HF_TOKEN`, `POLICY_LLM_MODEL` (선택)
    pub fn from_env() -> Self {
        Self {
            youth: SourceSettings::new(
                env_or("YOUTH_API_URL", YOUTH_API_URL),
                env_var("YOUTH_API_KEY"),
                Duration::from_secs(10),
            ),
            bizinfo: SourceSettings::new(
                env_or("BIZINFO_API_URL", BIZINFO_API_URL),
                env_var("BIZINFO_API_KEY"),
                Duration::from_secs(20),
            ),
            alioplus: SourceSettings::new(
                env_or("ALIOPLUS_API_URL", ALIOPLUS_API_URL),
                env_var("ALIOPLUS_API_KEY"),
                Duration::from_secs(20),
            ),
            llm: LlmSettings {
                model: env_or("POLICY_LLM_MODEL", DEFAULT_LLM_MODEL),
                token: env_var("HF_TOKEN"),
                timeout: Duration::from_secs(60),
            },
        }
    }

    /// 키가 설정된 소스 이름 목록
    pub fn configured_sources(&self) -> Vec<&'static str> {
        [
            ("youth", &self.youth),
            ("bizinfo", &self.bizinfo),
            ("alioplus", &self.alioplus),
        ]
        .into_iter()
        .filter(|(_, s)| s.has_api_key())
        .map(|(name, _)| name)
        .collect()
    }
}

/// 비어 있지 않은 환경변수
fn env_var(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            tracing::debug!("Using {} from environment", name);
            Some(value)
        }
        _ => None,
    }
}

fn env_or(name: &str, default: &str) -> String {
    env_var(name).unwrap_or_else(|| default.to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed(endpoint: &str, key: &str, secs: u64) -> SourceSettings {
        SourceSettings::new(endpoint, Some(key.to_string()), Duration::from_secs(secs))
    }

    #[test]
    fn test_blank_key_is_treated_as_missing() {
        assert!(!keyed(YOUTH_API_URL, "   ", 1).has_api_key());
        assert!(keyed(YOUTH_API_URL, "key", 1).has_api_key());
    }

    #[test]
    fn test_observed_timeouts() {
        let config = AppConfig::from_env();
        assert_eq!(config.youth.timeout, Duration::from_secs(10));
        assert_eq!(config.bizinfo.timeout, Duration::from_secs(20));
        assert_eq!(config.alioplus.timeout, Duration::from_secs(20));
        assert_eq!(config.llm.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_configured_sources_lists_only_keyed() {
        let config = AppConfig {
            youth: keyed(YOUTH_API_URL, "k", 10),
            bizinfo: SourceSettings::new(BIZINFO_API_URL, None, Duration::from_secs(20)),
            alioplus: keyed(ALIOPLUS_API_URL, "k", 20),
            llm: LlmSettings {
                model: DEFAULT_LLM_MODEL.to_string(),
                token: None,
                timeout: Duration::from_secs(60),
            },
        };
        assert_eq!(config.configured_sources(), vec!["youth", "alioplus"]);
    }
}
