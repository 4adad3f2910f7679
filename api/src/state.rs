use sea_orm::DatabaseConnection;
use shared::{BrokerApiClient, Config, CredentialVault, MarketDataClient, Redis};
use std::sync::Arc;
use strategy_core::condition::AlwaysTrue;

use crate::services::broker_connection_service::BrokerConnectionService;
use crate::services::copy_trading::{BrokerGateway, CopyTradingEngine, DbCopyTradingStore};
use crate::services::market_data_service::MarketDataService;
use crate::services::notification_service::NotificationService;
use crate::services::profile_service::ProfileService;
use crate::services::royalty_service::RoyaltyService;
use crate::services::strategy_service::StrategyService;
use crate::services::subscription_service::SubscriptionService;

pub struct AppState {
    pub profiles: Arc<ProfileService>,
    pub strategies: Arc<StrategyService>,
    pub subscriptions: Arc<SubscriptionService>,
    pub copy_trading: Arc<CopyTradingEngine>,
    pub royalties: Arc<RoyaltyService>,
    pub broker_connections: Arc<BrokerConnectionService>,
    pub notifications: Arc<NotificationService>,
    pub market_data: Arc<MarketDataService>,
}

impl AppState {
    pub fn build(config: &Config, db: DatabaseConnection, redis: Option<Redis>) -> Result<Self, anyhow::Error> {
        let db = Arc::new(db);
        let vault = CredentialVault::new(&config.credentials_secret)?;
        let broker: Arc<dyn BrokerGateway> =
            Arc::new(BrokerApiClient::new(&config.broker_api_url, config.http_timeout_secs)?);
        let market_client = MarketDataClient::new(
            &config.market_data_api_url,
            &config.market_data_api_key,
            config.http_timeout_secs,
        )?;

        let notifications = Arc::new(NotificationService::new(db.clone()));
        let royalties = Arc::new(RoyaltyService::new(
            db.clone(),
            notifications.clone(),
            config.royalty_default_pct,
            config.royalty_platform_fee_pct,
        ));
        let broker_connections = Arc::new(BrokerConnectionService::new(db.clone(), vault, broker.clone()));
        let copy_trading = Arc::new(CopyTradingEngine::new(
            Arc::new(DbCopyTradingStore::new(db.clone(), broker_connections.clone())),
            broker,
            royalties.clone(),
            Arc::new(AlwaysTrue),
        ));

        Ok(AppState {
            profiles: Arc::new(ProfileService::new(db.clone())),
            strategies: Arc::new(StrategyService::new(
                db.clone(),
                notifications.clone(),
                config.royalty_platform_fee_pct,
            )),
            subscriptions: Arc::new(SubscriptionService::new(db)),
            market_data: Arc::new(MarketDataService::new(market_client, redis, config.market_data_cache_secs)),
            copy_trading,
            royalties,
            broker_connections,
            notifications,
        })
    }
}
