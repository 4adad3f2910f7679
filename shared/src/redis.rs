use anyhow::Result;
use redis::Client;

pub type Redis = Client;

pub fn get_redis_client(redis_url: &str) -> Result<Redis> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Cache key for a market-data snapshot
pub fn snapshot_key(symbol: &str) -> String {
    format!("market:snapshot:{}", symbol.trim().to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_key_normalizes_symbol() {
        assert_eq!(snapshot_key(" spy "), "market:snapshot:SPY");
    }
}
