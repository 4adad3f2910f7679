pub mod broker;
pub mod config;
pub mod database;
pub mod entity;
pub mod market_data;
pub mod models;
pub mod redis;
pub mod vault;

pub use broker::{BrokerApiClient, BrokerError, BrokerSession, OrderFill, OrderRequest};
pub use config::Config;
pub use database::get_db_connection;
pub use market_data::{MarketDataClient, QuoteSnapshot};
pub use models::*;
pub use redis::{get_redis_client, Redis};
pub use vault::{CredentialVault, VaultError};
