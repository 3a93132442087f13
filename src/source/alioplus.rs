//! 알리오플러스 어댑터
//!
//! ref: https://www.alioplus.go.kr (공공기관 사업 정보 API)

use anyhow::Result;
use async_trait::async_trait;

use crate::config::SourceSettings;
use crate::error::{SourceError, SourceResult};
use crate::intent::QueryIntent;
use crate::policy::{
    text_field, AlioPlusResponse, PolicyRecord, RawItem, SourceKind, ALIOPLUS_TITLE_KEY,
};

use super::{build_client, keyword_matches_ignore_case, PolicySource};

/// 알리오플러스 공공기관 사업 어댑터
pub struct AlioPlusSource {
    client: reqwest::Client,
    settings: SourceSettings,
}

impl AlioPlusSource {
    pub fn new(settings: SourceSettings) -> Result<Self> {
        let client = build_client(settings.timeout)?;
        Ok(Self { client, settings })
    }

    pub fn parse(body: &str) -> SourceResult<Vec<RawItem>> {
        let response: AlioPlusResponse = serde_json::from_str(body)?;
        Ok(response.into_items())
    }

    pub fn to_record(item: &RawItem) -> PolicyRecord {
        PolicyRecord::new(
            SourceKind::AlioPlus,
            text_field(item, ALIOPLUS_TITLE_KEY),
            text_field(item, "apbaNa"),
            text_field(item, "siteUrl"),
        )
    }
}

/// 업스트림은 '+'가 미리 이스케이프된 키를 기대함
fn escape_auth_key(key: &str) -> String {
    key.replace('+', "%2B")
}

#[async_trait]
impl PolicySource for AlioPlusSource {
    fn kind(&self) -> SourceKind {
        SourceKind::AlioPlus
    }

    fn overfetch_factor(&self) -> usize {
        1
    }

    async fn fetch_raw(&self, max_count: usize) -> SourceResult<Vec<RawItem>> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .map(escape_auth_key)
            .ok_or(SourceError::MissingApiKey)?;

        let page_size = max_count.to_string();
        let response = self
            .client
            .post(&self.settings.endpoint)
            .form(&[
                ("X-API-AUTH-KEY", api_key.as_str()),
                ("pageSize", page_size.as_str()),
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
