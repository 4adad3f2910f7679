use redis::AsyncCommands;
use serde_json::Value;
use shared::market_data::normalize_symbol;
use shared::redis::snapshot_key;
use shared::{MarketDataClient, QuoteSnapshot, Redis};

use crate::error::{AppError, AppResult};

pub struct MarketDataService {
    client: MarketDataClient,
    redis: Option<Redis>,
    cache_secs: u64,
}

impl MarketDataService {
    pub fn new(client: MarketDataClient, redis: Option<Redis>, cache_secs: u64) -> Self {
        Self {
            client,
            redis,
            cache_secs,
        }
    }

    /// Latest quote, served from redis when a fresh copy is cached
    pub async fn snapshot(&self, symbol: &str) -> AppResult<QuoteSnapshot> {
        let symbol = normalize_symbol(symbol).map_err(|e| AppError::bad_request(e.to_string()))?;
        if let Some(cached) = self.cached(&symbol).await {
            return Ok(cached);
        }
        let snapshot = self.client.snapshot(&symbol).await?;
        self.store(&snapshot).await;
        Ok(snapshot)
    }

    pub async fn option_chain(&self, symbol: &str, expiration: Option<&str>) -> AppResult<Value> {
        let symbol = normalize_symbol(symbol).map_err(|e| AppError::bad_request(e.to_string()))?;
        let expiration = expiration.map(str::trim).filter(|e| !e.is_empty());
        Ok(self.client.option_chain(&symbol, expiration).await?)
    }

    async fn cached(&self, symbol: &str) -> Option<QuoteSnapshot> {
        let redis = self.redis.as_ref()?;
        let result: redis::RedisResult<Option<String>> = async {
            let mut conn = redis.get_multiplexed_async_connection().await?;
            conn.get(snapshot_key(symbol)).await
        }
        .await;
        match result {
            Ok(Some(raw)) => serde_json::from_str(&raw).ok(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, symbol, "snapshot cache read failed");
                None
            }
        }
    }

    async fn store(&self, snapshot: &QuoteSnapshot) {
        let Some(redis) = self.redis.as_ref() else {
            return;
        };
        if self.cache_secs == 0 {
            return;
        }
        let raw = match serde_json::to_string(snapshot) {
            Ok(raw) => raw,
            Err(_) => return,
        };
        let result: redis::RedisResult<()> = async {
            let mut conn = redis.get_multiplexed_async_connection().await?;
            conn.set_ex(snapshot_key(&snapshot.symbol), raw, self.cache_secs).await
        }
        .await;
        if let Err(e) = result {
            tracing::warn!(error = %e, symbol = %snapshot.symbol, "snapshot cache write failed");
        }
    }
}
