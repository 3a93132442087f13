//! Policy 모듈 - 정규화된 정책 레코드
//!
//! 세 개의 정책 카탈로그(온통청년, 기업마당, 알리오플러스)는 서로 다른
//! 스키마를 쓰므로, 어댑터는 원본 응답을 `RawItem`으로 풀어낸 뒤
//! 공통 `PolicyRecord`로 변환합니다.

mod payload;

use serde::Serialize;
use serde_json::{Map, Value};

pub use payload::{
    AlioPlusBody, AlioPlusResponse, BizInfoArray, BizInfoResponse, OneOrMany, YouthResponse,
    YouthResult, ALIOPLUS_TITLE_KEY,
};

/// 업스트림 원본 아이템 (JSON 객체)
pub type RawItem = Map<String, Value>;

/// 필수 표시 필드가 비었을 때 쓰는 값
pub const NOT_AVAILABLE: &str = "N/A";

/// 유효한 나이 상한
pub const MAX_VALID_AGE: u8 = 120;

// ============================================================================
// SourceKind
// ============================================================================

/// 정책 출처
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    /// 온통청년 (청년 정책)
    Youth,
    /// 기업마당 (기업 지원사업)
    BizInfo,
    /// 알리오플러스 (공공기관 사업)
    AlioPlus,
}

impl SourceKind {
    /// 사용자 표시용 이름
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Youth => "온통청년",
            SourceKind::BizInfo => "기업마당",
            SourceKind::AlioPlus => "알리오플러스",
        }
    }

    /// 로그/식별자용 코드
    pub fn code(&self) -> &'static str {
        match self {
            SourceKind::Youth => "youth",
            SourceKind::BizInfo => "bizinfo",
            SourceKind::AlioPlus => "alioplus",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// PolicyRecord
// ============================================================================

/// 정규화된 정책 레코드
///
/// 검색 호출마다 새로 만들어지고, 요청이 끝나면 버려집니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRecord {
    /// 안정적인 식별자 (URL, 없으면 출처+제목+기관)
    pub id: String,
    pub title: String,
    pub agency: String,
    pub source: SourceKind,
    /// 지원 대상 최소 나이 (온통청년만)
    pub min_age: Option<u8>,
    /// 지원 대상 최대 나이 (온통청년만)
    pub max_age: Option<u8>,
    /// 지역 매칭용 등록 기관명 (온통청년만)
    pub region_text: Option<String>,
    pub category: Option<String>,
    pub summary: Option<String>,
    pub url: Option<String>,
    /// 신청 기간 (온통청년만)
    pub apply_period: Option<String>,
}

impl PolicyRecord {
    /// 새 레코드 생성
    ///
    /// 제목/기관이 비어 있으면 `N/A`로 채웁니다. 빈 URL은 `None`으로 취급합니다.
    pub fn new(
        source: SourceKind,
        title: Option<String>,
        agency: Option<String>,
        url: Option<String>,
    ) -> Self {
        let title = title.unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let agency = agency.unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let url = url.filter(|u| !u.trim().is_empty());

        let id = match url {
            Some(ref u) => u.clone(),
            None => format!("{}:{}:{}", source.code(), title, agency),
        };

        Self {
            id,
            title,
            agency,
            source,
            min_age: None,
            max_age: None,
            region_text: None,
            category: None,
            summary: None,
            url,
            apply_period: None,
        }
    }

    /// 중복 제거 키 (URL이 있을 때만)
    pub fn dedup_key(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// 나이 범위 폭 (두 경계가 모두 있을 때)
    pub fn age_span(&self) -> Option<u8> {
        match (self.min_age, self.max_age) {
            (Some(min), Some(max)) => Some(max.saturating_sub(min)),
            _ => None,
        }
    }
}

/// 나이 경계 검증
///
/// 범위 [0, 120]을 벗어나거나 `min > max`이면 `None` (레코드 폐기 대상).
/// 경계 자체가 없으면 그대로 `None` 필드로 통과합니다.
pub fn checked_age_bounds(
    min: Option<i64>,
    max: Option<i64>,
) -> Option<(Option<u8>, Option<u8>)> {
    let to_age = |v: i64| -> Option<u8> {
        if (0..=MAX_VALID_AGE as i64).contains(&v) {
            Some(v as u8)
        } else {
            None
        }
    };

    let min = match min {
        Some(v) => Some(to_age(v)?),
        None => None,
    };
    let max = match max {
        Some(v) => Some(to_age(v)?),
        None => None,
    };

    if let (Some(lo), Some(hi)) = (min, max) {
        if lo > hi {
            return None;
        }
    }

    Some((min, max))
}

// ============================================================================
// RawItem field helpers
// ============================================================================

/// 문자열 필드 추출 (숫자도 문자열로, 공백뿐인 값은 제외)
pub fn text_field(item: &RawItem, key: &str) -> Option<String> {
    match item.get(key)? {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 정수 필드 추출 (숫자 또는 숫자 문자열)
pub fn int_field(item: &RawItem, key: &str) -> Option<i64> {
    match item.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: Value) -> RawItem {
        match value {
            Value::Object(map) => map,
            _ => panic!("test item must be an object"),
        }
    }

    #[test]
    fn test_record_defaults_missing_fields() {
        let record = PolicyRecord::new(SourceKind::BizInfo, None, None, Some("  ".to_string()));
        assert_eq!(record.title, NOT_AVAILABLE);
        assert_eq!(record.agency, NOT_AVAILABLE);
        assert!(record.url.is_none());
        assert!(record.dedup_key().is_none());
    }

    #[test]
    fn test_record_id_prefers_url() {
        let with_url = PolicyRecord::new(
            SourceKind::Youth,
            Some("청년 월세 지원".to_string()),
            Some("국토교통부".to_string()),
            Some("https://example.go.kr/p/1".to_string()),
        );
        assert_eq!(with_url.id, "https://example.go.kr/p/1");

        let without_url = PolicyRecord::new(
            SourceKind::Youth,
            Some("청년 월세 지원".to_string()),
            Some("국토교통부".to_string()),
            None,
        );
        assert_eq!(without_url.id, "youth:청년 월세 지원:국토교통부");
    }

    #[test]
    fn test_checked_age_bounds() {
        assert_eq!(checked_age_bounds(Some(19), Some(39)), Some((Some(19), Some(39))));
        assert_eq!(checked_age_bounds(None, None), Some((None, None)));
        assert_eq!(checked_age_bounds(Some(40), Some(19)), None);
        assert_eq!(checked_age_bounds(Some(-1), Some(39)), None);
        assert_eq!(checked_age_bounds(Some(0), Some(999)), None);
        assert_eq!(checked_age_bounds(Some(0), Some(120)), Some((Some(0), Some(120))));
    }

    #[test]
    fn test_field_helpers() {
        let raw = item(json!({
            "plcyNm": " 청년 도약 계좌 ",
            "sprtTrgtMinAge": "19",
            "sprtTrgtMaxAge": 34,
            "empty": "",
            "bad": "abc"
        }));

        assert_eq!(text_field(&raw, "plcyNm").as_deref(), Some("청년 도약 계좌"));
        assert_eq!(text_field(&raw, "empty"), None);
        assert_eq!(text_field(&raw, "missing"), None);
        assert_eq!(int_field(&raw, "sprtTrgtMinAge"), Some(19));
        assert_eq!(int_field(&raw, "sprtTrgtMaxAge"), Some(34));
        assert_eq!(int_field(&raw, "bad"), None);
    }

    #[test]
    fn test_source_labels() {
        assert_eq!(SourceKind::Youth.label(), "온통청년");
        assert_eq!(SourceKind::BizInfo.to_string(), "bizinfo");
        assert_ne!(SourceKind::AlioPlus, SourceKind::BizInfo);
    }
}
