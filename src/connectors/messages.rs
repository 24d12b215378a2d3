// src/connectors/messages.rs
use crate::utils::numeric::decimal_from_json;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

/// Body of polling.finance.naver.com/api/realtime?query=SERVICE_ITEM:<code>
/// Only the fields needed to find the last price are mapped.
#[derive(Debug, Deserialize)]
pub struct NaverRealtimeResponse {
    #[serde(default)]
    pub result: Option<NaverResult>,
}

#[derive(Debug, Deserialize)]
pub struct NaverResult {
    #[serde(default)]
    pub areas: Vec<NaverArea>,
}

#[derive(Debug, Deserialize)]
pub struct NaverArea {
    #[serde(default)]
    pub datas: Vec<NaverItem>,
}

#[derive(Debug, Deserialize)]
pub struct NaverItem {
    #[serde(rename = "cd", default)]
    pub code: Option<String>,

    /// Current price.
    #[serde(rename = "nv", default)]
    pub now_value: Option<Value>,

    /// Older payloads carry the price here instead.
    #[serde(default)]
    pub now: Option<Value>,
}

impl NaverItem {
    /// `nv` if present and non-zero, else `now`.
    pub fn price(&self) -> Option<Decimal> {
        let nv = self.now_value.as_ref().and_then(decimal_from_json);
        match nv {
            Some(p) if !p.is_zero() => Some(p),
            _ => self.now.as_ref().and_then(decimal_from_json).or(nv),
        }
    }
}

impl NaverRealtimeResponse {
    pub fn first_item(&self) -> Option<&NaverItem> {
        self.result.as_ref()?.areas.first()?.datas.first()
    }
}
