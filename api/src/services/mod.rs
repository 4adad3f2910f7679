pub mod broker_connection_service;
pub mod copy_trading;
pub mod market_data_service;
pub mod notification_service;
pub mod profile_service;
pub mod royalty_service;
pub mod strategy_service;
pub mod subscription_service;
