//! 업스트림 응답 형태
//!
//! 같은 API라도 결과가 하나면 배열 대신 객체를 돌려주거나, 키 자체가
//! 빠지는 경우가 있습니다. 관측된 형태를 untagged enum으로 모델링하고
//! `into_items()`에서 명시적으로 정규화합니다.

use serde::Deserialize;
use serde_json::Value;

use super::RawItem;

/// 배열 / 단일 객체 / 그 밖의 값
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    Many(Vec<Value>),
    One(RawItem),
    Other(Value),
}

impl OneOrMany {
    /// 객체 아이템만 남겨서 리스트로 변환
    pub fn into_items(self) -> Vec<RawItem> {
        match self {
            OneOrMany::Many(values) => objects_only(values),
            OneOrMany::One(item) => vec![item],
            OneOrMany::Other(_) => Vec::new(),
        }
    }
}

fn objects_only(values: Vec<Value>) -> Vec<RawItem> {
    values
        .into_iter()
        .filter_map(|v| match v {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect()
}

// ============================================================================
// 온통청년: result.youthPolicyList
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct YouthResponse {
    #[serde(default)]
    pub result: Option<YouthResult>,
}

#[derive(Debug, Deserialize)]
pub struct YouthResult {
    #[serde(rename = "youthPolicyList", default)]
    pub youth_policy_list: Option<OneOrMany>,
}

impl YouthResponse {
    pub fn into_items(self) -> Vec<RawItem> {
        match self.result {
            Some(YouthResult {
                youth_policy_list: Some(list),
            }) => list.into_items(),
            _ => Vec::new(),
        }
    }
}

// ============================================================================
// 기업마당: jsonArray.item 또는 jsonArray 자체가 배열
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct BizInfoResponse {
    #[serde(rename = "jsonArray", default)]
    pub json_array: Option<BizInfoArray>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum BizInfoArray {
    Bare(Vec<Value>),
    Wrapped {
        #[serde(default)]
        item: Option<OneOrMany>,
    },
    Other(Value),
}

impl BizInfoResponse {
    pub fn into_items(self) -> Vec<RawItem> {
        match self.json_array {
            Some(BizInfoArray::Bare(values)) => objects_only(values),
            Some(BizInfoArray::Wrapped { item: Some(item) }) => item.into_items(),
            Some(BizInfoArray::Wrapped { item: None }) | Some(BizInfoArray::Other(_)) | None => {
                Vec::new()
            }
        }
    }
}

// ============================================================================
// 알리오플러스: 최상위 list 또는 data (data 아래 list가 한 번 더 올 수 있음)
// ============================================================================

/// 알리오플러스 사업명 필드 (단일 객체를 정책으로 볼지 판단)
pub const ALIOPLUS_TITLE_KEY: &str = "bsnNa";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AlioPlusResponse {
    Bare(Vec<Value>),
    Keyed {
        #[serde(default)]
        list: Option<AlioPlusBody>,
        #[serde(default)]
        data: Option<AlioPlusBody>,
    },
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AlioPlusBody {
    Listed(Vec<Value>),
    Nested { list: OneOrMany },
    Single(RawItem),
    Other(Value),
}

impl AlioPlusBody {
    fn into_items(self) -> Vec<RawItem> {
        match self {
            AlioPlusBody::Listed(values) => objects_only(values),
            AlioPlusBody::Nested { list } => list.into_items(),
            // 상태 응답 객체 ({"resultCode": ...})는 정책이 아님
            AlioPlusBody::Single(item) if item.contains_key(ALIOPLUS_TITLE_KEY) => vec![item],
            AlioPlusBody::Single(_) => Vec::new(),
            AlioPlusBody::Other(_) => Vec::new(),
        }
    }
}

impl AlioPlusResponse {
    pub fn into_items(self) -> Vec<RawItem> {
        match self {
            AlioPlusResponse::Bare(values) => objects_only(values),
            AlioPlusResponse::Keyed { list, data } => {
                let from_list = list.map(AlioPlusBody::into_items).unwrap_or_default();
                if !from_list.is_empty() {
                    return from_list;
                }
                data.map(AlioPlusBody::into_items).unwrap_or_default()
            }
            AlioPlusResponse::Other(_) => Vec::new(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
