pub mod broker_connection_repository;
pub mod notification_repository;
pub mod profile_repository;
pub mod royalty_repository;
pub mod strategy_repository;
pub mod subscription_repository;
pub mod trade_repository;
pub mod user_strategy_repository;
pub mod wallet_repository;

pub use broker_connection_repository::BrokerConnectionRepository;
pub use notification_repository::NotificationRepository;
pub use profile_repository::ProfileRepository;
pub use royalty_repository::RoyaltyRepository;
pub use strategy_repository::StrategyRepository;
pub use subscription_repository::SubscriptionRepository;
pub use trade_repository::{RecordedTrade, TradeRepository};
pub use user_strategy_repository::UserStrategyRepository;
pub use wallet_repository::WalletRepository;
