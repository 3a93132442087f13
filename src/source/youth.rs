//! 온통청년 어댑터
//!
//! ref: https://www.youthcenter.go.kr (청년정책 Open API)

use anyhow::Result;
use async_trait::async_trait;

use crate::config::SourceSettings;
use crate::error::{SourceError, SourceResult};
use crate::intent::rules::REGION_SYNONYMS;
use crate::intent::QueryIntent;
use crate::policy::{
    checked_age_bounds, int_field, text_field, PolicyRecord, RawItem, SourceKind, YouthResponse,
};

use super::{build_client, PolicySource};

/// 연령 무관 요청에서 요구하는 최소 나이 범위 폭
pub const ALL_AGES_MIN_SPAN: u8 = 50;

/// 온통청년 정책 어댑터
pub struct YouthSource {
    client: reqwest::Client,
    settings: SourceSettings,
}

impl YouthSource {
    pub fn new(settings: SourceSettings) -> Result<Self> {
        let client = build_client(settings.timeout)?;
        Ok(Self { client, settings })
    }

    /// 응답 본문 파싱
    pub fn parse(body: &str) -> SourceResult<Vec<RawItem>> {
        let response: YouthResponse = serde_json::from_str(body)?;
        Ok(response.into_items())
    }

    /// 원본 아이템 -> 레코드 (나이 경계가 잘못되면 None)
    pub fn to_record(item: &RawItem) -> Option<PolicyRecord> {
        let Some((min_age, max_age)) = checked_age_bounds(
            int_field(item, "sprtTrgtMinAge"),
            int_field(item, "sprtTrgtMaxAge"),
        ) else {
            tracing::debug!(
                "Dropping youth policy with malformed ages: {:?}",
                text_field(item, "plcyNm")
            );
            return None;
        };

        let mut record = PolicyRecord::new(
            SourceKind::Youth,
            text_field(item, "plcyNm"),
            text_field(item, "sprvsnInstCdNm"),
            text_field(item, "refUrlAddr1"),
        );
        record.min_age = min_age;
        record.max_age = max_age;
        record.region_text = text_field(item, "rgtrInstCdNm");
        record.summary = text_field(item, "plcyExplnCn");
        record.category = text_field(item, "lclsfNm");
        record.apply_period = text_field(item, "aplyYmd");

        Some(record)
    }

    /// 조건 검사
    pub fn matches(record: &PolicyRecord, intent: &QueryIntent) -> bool {
        if intent.all_ages {
            // 경계가 둘 다 있어야 폭을 알 수 있음
            match record.age_span() {
                Some(span) if span >= ALL_AGES_MIN_SPAN => {}
                _ => return false,
            }
        } else if let Some(age) = intent.age {
            match (record.min_age, record.max_age) {
                (Some(min), Some(max)) if min <= age && age <= max => {}
                _ => return false,
            }
        }

        if let Some(ref region) = intent.region {
            let inst_name = record.region_text.as_deref().unwrap_or("");
            if !region_matches(region, inst_name) {
                return false;
            }
        }

        // 한글 키워드는 대소문자 구분 없이 그대로 비교
        if let Some(ref keyword) = intent.keyword {
            let in_title = record.title.contains(keyword.as_str());
            let in_summary = record
                .summary
                .as_deref()
                .is_some_and(|s| s.contains(keyword.as_str()));
            if !in_title && !in_summary {
                return false;
            }
        }

        if let Some(ref category) = intent.category {
            let in_category = record
                .category
                .as_deref()
                .is_some_and(|c| c.contains(category.as_str()));
            if !in_category {
                return false;
            }
        }

        true
    }
}

/// 지역 키워드를 기관명 표기와 대조 (표에 없으면 키워드 자체로)
fn region_matches(region: &str, inst_name: &str) -> bool {
    match REGION_SYNONYMS.iter().find(|(key, _)| *key == region) {
        Some((_, aliases)) => aliases.iter().any(|alias| inst_name.contains(alias)),
        None => inst_name.contains(region),
    }
}

#[async_trait]
impl PolicySource for YouthSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Youth
    }

    fn overfetch_factor(&self) -> usize {
        2
    }

    async fn fetch_raw(&self, max_count: usize) -> SourceResult<Vec<RawItem>> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(SourceError::MissingApiKey)?;

        let page_size = max_count.to_string();
        let response = self
            .client
            .get(&self.settings.endpoint)
            .query(&[
                ("apiKeyNm", api_key),
                ("pageNum", "1"),
                ("pageSize", page_size.as_str()),
                ("rtnType", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Self::parse(&body)
    }

    fn filter(&self, items: Vec<RawItem>, intent: &QueryIntent) -> Vec<PolicyRecord> {
        let total = items.len();
        let records: Vec<PolicyRecord> = items
            .iter()
            .filter_map(Self::to_record)
            .filter(|record| Self::matches(record, intent))
            .collect();

        tracing::debug!("youth: {}/{} policies passed filters", records.len(), total);
        records
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::YOUTH_API_URL;
    use crate::intent::extract;
    use std::time::Duration;

    const FIXTURE: &str = r#"{
        "resultCode": 200,
        "result": {
            "youthPolicyList": [
                {
                    "plcyNm": "창원 청년 취업 지원금",
                    "sprvsnInstCdNm": "창원시",
                    "rgtrInstCdNm": "경상남도 창원시",
                    "plcyExplnCn": "지역 청년의 취업을 돕습니다",
                    "lclsfNm": "일자리",
                    "sprtTrgtMinAge": "19",
                    "sprtTrgtMaxAge": "34",
                    "refUrlAddr1": "https://youth.example/1"
                },
                {
                    "plcyNm": "서울 청년 월세 지원",
                    "sprvsnInstCdNm": "서울특별시",
                    "rgtrInstCdNm": "서울특별시",
                    "plcyExplnCn": "주거비 부담 완화",
                    "lclsfNm": "주거",
                    "sprtTrgtMinAge": "19",
                    "sprtTrgtMaxAge": "39",
                    "refUrlAddr1": "https://youth.example/2"
                },
                {
                    "plcyNm": "평생 교육 바우처",
                    "sprvsnInstCdNm": "교육부",
                    "rgtrInstCdNm": "경남 교육청",
                    "plcyExplnCn": "전 연령 대상",
                    "lclsfNm": "교육",
                    "sprtTrgtMinAge": "0",
                    "sprtTrgtMaxAge": "99"
                },
                {
                    "plcyNm": "잘못된 나이",
                    "sprtTrgtMinAge": "40",
                    "sprtTrgtMaxAge": "20"
                },
                {
                    "plcyNm": "상한 초과",
                    "sprtTrgtMinAge": "0",
                    "sprtTrgtMaxAge": "999"
                },
                {
                    "plcyNm": "나이 정보 없는 창업 정책",
                    "rgtrInstCdNm": "창원시",
                    "plcyExplnCn": "창업 지원"
                }
            ]
        }
    }"#;

    fn source() -> YouthSource {
        YouthSource::new(SourceSettings::new(YOUTH_API_URL, None, Duration::from_secs(10)))
            .expect("source creation failed")
    }

    fn titles(records: &[PolicyRecord]) -> Vec<&str> {
        records.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_parse_drops_malformed_ages() {
        let items = YouthSource::parse(FIXTURE).unwrap();
        assert_eq!(items.len(), 6);

        let records: Vec<_> = items.iter().filter_map(YouthSource::to_record).collect();
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| r.source == SourceKind::Youth));
        assert_eq!(records[0].region_text.as_deref(), Some("경상남도 창원시"));
        assert_eq!(records[0].min_age, Some(19));
        assert_eq!(records[0].max_age, Some(34));
        assert_eq!(records[2].url, None);
    }

    #[test]
    fn test_age_region_keyword_filter() {
        let items = YouthSource::parse(FIXTURE).unwrap();
        let records = source().filter(items, &extract("25살 창원 취업 정책 찾아줘"));
        assert_eq!(titles(&records), vec!["창원 청년 취업 지원금"]);
    }

    #[test]
    fn test_age_filter_requires_known_bounds() {
        let items = YouthSource::parse(FIXTURE).unwrap();
        let intent = QueryIntent {
            age: Some(36),
            ..Default::default()
        };
        let records = source().filter(items, &intent);
        assert_eq!(titles(&records), vec!["서울 청년 월세 지원", "평생 교육 바우처"]);
        assert!(records
            .iter()
            .all(|r| r.min_age.unwrap() <= 36 && 36 <= r.max_age.unwrap()));
    }

    #[test]
    fn test_all_ages_uses_span() {
        let items = YouthSource::parse(FIXTURE).unwrap();
        let intent = QueryIntent {
            all_ages: true,
            age: Some(25),
            ..Default::default()
        };
        let records = source().filter(items, &intent);
        assert_eq!(titles(&records), vec!["평생 교육 바우처"]);
        assert!(records.iter().all(|r| r.age_span().unwrap() >= ALL_AGES_MIN_SPAN));
    }

    #[test]
    fn test_region_synonyms() {
        assert!(region_matches("경남", "경상남도 창원시"));
        assert!(region_matches("경남", "경남 교육청"));
        assert!(!region_matches("경남", "경상북도"));
        assert!(region_matches("김해", "김해시청"));
    }

    #[test]
    fn test_common_word_ending_in_si_keeps_records() {
        let items = YouthSource::parse(FIXTURE).unwrap();
        let records = source().filter(items, &extract("신도시에 사는 청년 주거 정책"));
        assert_eq!(titles(&records), vec!["서울 청년 월세 지원"]);
    }

    #[test]
    fn test_no_criteria_keeps_all_valid_records() {
        let items = YouthSource::parse(FIXTURE).unwrap();
        let records = source().filter(items, &QueryIntent::default());
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn test_keyword_matches_description_and_category_filter() {
        let items = YouthSource::parse(FIXTURE).unwrap();
        let intent = QueryIntent {
            keyword: Some("창업".to_string()),
            ..Default::default()
        };
        let records = source().filter(items.clone(), &intent);
        assert_eq!(titles(&records), vec!["나이 정보 없는 창업 정책"]);

        let intent = QueryIntent {
            category: Some("주거".to_string()),
            ..Default::default()
        };
        let records = source().filter(items, &intent);
        assert_eq!(titles(&records), vec!["서울 청년 월세 지원"]);
    }

    #[tokio::test]
    async fn test_missing_key_yields_no_candidates() {
        let source = source();
        assert!(matches!(
            source.fetch_raw(10).await,
            Err(SourceError::MissingApiKey)
        ));
        assert!(source.fetch_candidates(10).await.is_empty());
    }
}
