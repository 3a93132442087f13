//! 기업마당 어댑터
//!
//! ref: https://www.bizinfo.go.kr (지원사업 공고 API)

use anyhow::Result;
use async_trait::async_trait;
use url::Url;

use crate::config::SourceSettings;
use crate::error::{SourceError, SourceResult};
use crate::intent::QueryIntent;
use crate::policy::{text_field, BizInfoResponse, PolicyRecord, RawItem, SourceKind};

use super::{build_client, keyword_matches_ignore_case, PolicySource};

/// 공고 상세 경로의 기준 주소
const BIZINFO_BASE_URL: &str = "https://www.bizinfo.go.kr";

/// 기업마당 지원사업 어댑터
pub struct BizInfoSource {
    client: reqwest::Client,
    settings: SourceSettings,
}

impl BizInfoSource {
    pub fn new(settings: SourceSettings) -> Result<Self> {
        let client = build_client(settings.timeout)?;
        Ok(Self { client, settings })
    }

    pub fn parse(body: &str) -> SourceResult<Vec<RawItem>> {
        let response: BizInfoResponse = serde_json::from_str(body)?;
        Ok(response.into_items())
    }

    pub fn to_record(item: &RawItem) -> PolicyRecord {
        let url = text_field(item, "pblancUrl").and_then(|path| detail_url(&path));

        let mut record = PolicyRecord::new(
            SourceKind::BizInfo,
            text_field(item, "pblancNm"),
            text_field(item, "jrsdInsttNm"),
            url,
        );
        record.summary = text_field(item, "bsnsSumryCn");
        record.category = text_field(item, "pldirSportRealmLclasCodeNm");
        record
    }
}

/// 상대 경로를 절대 URL로 (이미 절대 경로면 그대로)
fn detail_url(path: &str) -> Option<String> {
    let base = Url::parse(BIZINFO_BASE_URL).ok()?;
    match base.join(path) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            tracing::debug!("Ignoring invalid bizinfo url '{}': {}", path, e);
            None
        }
    }
}

#[async_trait]
impl PolicySource for BizInfoSource {
    fn kind(&self) -> SourceKind {
        SourceKind::BizInfo
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

        let page_unit = max_count.to_string();
        let response = self
            .client
            .get(&self.settings.endpoint)
            .query(&[
                ("crtfcKey", api_key),
                ("dataType", "json"),
                ("pageUnit", page_unit.as_str()),
                ("pageIndex", "1"),
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
        items
            .iter()
            .map(Self::to_record)
            .filter(|record| match intent.keyword {
                Some(ref keyword) => keyword_matches_ignore_case(record, keyword),
                None => true,
            })
            .collect()
    }
}
