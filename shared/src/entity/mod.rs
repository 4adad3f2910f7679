//! `SeaORM` entities for every table the platform reads or writes

pub mod broker_connections;
pub mod iron_condor_trades;
pub mod notification_recipients;
pub mod notifications;
pub mod profiles;
pub mod royalty_distributions;
pub mod strategy_subscriptions;
pub mod trading_strategies;
pub mod user_strategies;
pub mod user_wallets;
