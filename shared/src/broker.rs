//! Brokerage REST client: session auth and option order placement

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("broker request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("broker rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerSession {
    pub access_token: String,
    pub account_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Idempotency key; the broker returns the original fill when it sees it twice
    pub client_order_id: String,
    pub underlying: String,
    pub option_type: String,
    pub side: String,
    pub strike: String,
    pub days_to_expiry: String,
    pub quantity: u32,
    pub limit_price: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderFill {
    pub broker_order_id: String,
    pub status: String,
    pub fill_price: Decimal,
    /// Present when the order closed an earlier position
    #[serde(default)]
    pub realized_profit: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "message")]
    error: String,
}

#[derive(Debug, Clone)]
pub struct BrokerApiClient {
    pub base_url: String,
    client: reqwest::Client,
}

impl BrokerApiClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, BrokerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub async fn authenticate(&self, api_key: &str, api_secret: &str) -> Result<BrokerSession, BrokerError> {
        let response = self
            .client
            .post(format!("{}/v1/session", self.base_url))
            .json(&serde_json::json!({
                "api_key": api_key,
                "api_secret": api_secret,
            }))
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    pub async fn place_order(&self, session: &BrokerSession, order: &OrderRequest) -> Result<OrderFill, BrokerError> {
        let response = self
            .client
            .post(format!("{}/v1/accounts/{}/orders", self.base_url, session.account_id))
            .bearer_auth(&session.access_token)
            .json(order)
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BrokerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.error)
        .unwrap_or(text);
    Err(BrokerError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_without_profit() {
        let fill: OrderFill = serde_json::from_str(
            r#"{"broker_order_id":"B-1","status":"filled","fill_price":"1.25"}"#,
        )
        .unwrap();
        assert_eq!(fill.realized_profit, None);
        assert_eq!(fill.fill_price, Decimal::new(125, 2));
    }

    #[test]
    fn test_base_url_trimmed() {
        let client = BrokerApiClient::new("https://broker.test/", 5).unwrap();
        assert_eq!(client.base_url, "https://broker.test");
    }
}
