// src/connectors/naver.rs
use crate::config::QuoteConfig;
use crate::connectors::messages::NaverRealtimeResponse;
use crate::connectors::traits::QuoteSource;
use crate::errors::QuoteError;
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::debug;

pub struct NaverQuoteClient {
    http_client: Client,
    url_template: String,
}

impl NaverQuoteClient {
    pub fn new(config: &QuoteConfig) -> Result<Self, QuoteError> {
        let http_client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            url_template: config.url_template.clone(),
        })
    }

    fn url_for(&self, symbol: &str) -> String {
        self.url_template.replace("{symbol}", symbol)
    }
}

/// Turns a response body into a price. The body is parsed as JSON no matter
/// what content-type the server claimed.
fn parse_price(symbol: &str, body: &str) -> Result<Decimal, QuoteError> {
    let resp: NaverRealtimeResponse =
        serde_json::from_str(body).map_err(|e| QuoteError::Malformed {
            symbol: symbol.to_string(),
            detail: e.to_string(),
        })?;

    let item = resp
        .first_item()
        .ok_or_else(|| QuoteError::NotFound(symbol.to_string()))?;
    if let Some(code) = item.code.as_deref() {
        if code != symbol {
            return Err(QuoteError::Malformed {
                symbol: symbol.to_string(),
                detail: format!("response is for {}", code),
            });
        }
    }
    let price = item.price().ok_or_else(|| QuoteError::Malformed {
        symbol: symbol.to_string(),
        detail: "no price field".to_string(),
    })?;

    if price <= Decimal::ZERO {
        return Err(QuoteError::Malformed {
            symbol: symbol.to_string(),
            detail: format!("non-positive price {}", price),
        });
    }
    Ok(price)
}

#[async_trait]
impl QuoteSource for NaverQuoteClient {
    fn name(&self) -> &str {
        "naver"
    }

    async fn fetch(&self, symbol: &str) -> Result<Decimal, QuoteError> {
        let url = self.url_for(symbol);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| QuoteError::from_request(symbol, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Status {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }

        // text() honours the charset in content-type, which is not always utf-8 here
        let body = response
            .text()
            .await
            .map_err(|e| QuoteError::from_request(symbol, e))?;

        let price = parse_price(symbol, &body)?;
        debug!("{} @ {}", symbol, price);
        Ok(price)
    }
}
