//! Market-data vendor REST client. Payloads are passed through unmodified.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuoteSnapshot {
    pub symbol: String,
    pub fetched_at: chrono::DateTime<chrono::Utc>,
    pub payload: Value,
}

#[derive(Debug, Clone)]
pub struct MarketDataClient {
    pub base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl MarketDataClient {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    pub async fn snapshot(&self, symbol: &str) -> Result<QuoteSnapshot> {
        let symbol = normalize_symbol(symbol)?;
        let payload = self
            .get_json(&format!("{}/v1/quotes/{}", self.base_url, symbol), &[])
            .await?;
        Ok(QuoteSnapshot {
            symbol,
            fetched_at: chrono::Utc::now(),
            payload,
        })
    }

    pub async fn option_chain(&self, symbol: &str, expiration: Option<&str>) -> Result<Value> {
        let symbol = normalize_symbol(symbol)?;
        let mut query = Vec::new();
        if let Some(expiration) = expiration {
            query.push(("expiration", expiration));
        }
        self.get_json(&format!("{}/v1/options/{}", self.base_url, symbol), &query)
            .await
    }

    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .query(&[("apiKey", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .context("market data request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("market data vendor returned {}: {}", status, body);
        }
        response
            .json()
            .await
            .context("failed to parse market data response")
    }
}

/// Upper-case and check a ticker, e.g. `spy` → `SPY`, `brk.b` → `BRK.B`
pub fn normalize_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim().to_uppercase();
    let valid = !symbol.is_empty()
        && symbol.len() <= 12
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '^');
    if !valid {
        anyhow::bail!("invalid symbol: {:?}", symbol);
    }
    Ok(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol(" spy ").unwrap(), "SPY");
        assert_eq!(normalize_symbol("brk.b").unwrap(), "BRK.B");
        assert!(normalize_symbol("").is_err());
        assert!(normalize_symbol("SPY/../admin").is_err());
        assert!(normalize_symbol("AVERYLONGSYMBOLNAME").is_err());
    }
}
