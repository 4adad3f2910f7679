use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::prelude::DatabaseConnection;
use sea_orm::ActiveValue;
use shared::entity::iron_condor_trades;
use shared::{TRADE_FAILED, TRADE_FILLED};
use std::sync::Arc;

use super::{option_label, side_label, CopyTradingStore, RunContext, TradeRecord};
use crate::error::AppResult;
use crate::repositories::{RecordedTrade, StrategyRepository, TradeRepository, UserStrategyRepository};
use crate::services::broker_connection_service::{BrokerConnectionService, BrokerCredentials};

pub struct DbCopyTradingStore {
    user_strategies: UserStrategyRepository,
    strategies: StrategyRepository,
    trades: TradeRepository,
    connections: Arc<BrokerConnectionService>,
}

impl DbCopyTradingStore {
    pub fn new(db: Arc<DatabaseConnection>, connections: Arc<BrokerConnectionService>) -> Self {
        Self {
            user_strategies: UserStrategyRepository::new(db.clone()),
            strategies: StrategyRepository::new(db.clone()),
            trades: TradeRepository::new(db),
            connections,
        }
    }
}

#[async_trait]
impl CopyTradingStore for DbCopyTradingStore {
    async fn load_run(&self, user_strategy_id: u64) -> AppResult<Option<RunContext>> {
        let Some(user_strategy) = self.user_strategies.find_by_id(user_strategy_id).await? else {
            return Ok(None);
        };
        let Some(strategy) = self.strategies.find_by_id(user_strategy.strategy_id).await? else {
            return Ok(None);
        };
        Ok(Some(RunContext {
            user_strategy,
            strategy,
        }))
    }

    async fn active_credentials(&self, user_id: i64) -> AppResult<Option<BrokerCredentials>> {
        self.connections.active_credentials(user_id).await
    }

    async fn mark_connection_used(&self, connection_id: u64) -> AppResult<()> {
        self.connections.mark_used(connection_id).await
    }

    async fn record_trade(&self, record: &TradeRecord) -> AppResult<RecordedTrade> {
        let (broker_order_id, fill_price, realized_profit, status) = match &record.fill {
            Some(fill) => (
                Some(fill.broker_order_id.clone()),
                fill.fill_price,
                fill.realized_profit,
                TRADE_FILLED,
            ),
            None => (None, Decimal::ZERO, None, TRADE_FAILED),
        };
        let active_model = iron_condor_trades::ActiveModel {
            user_id: ActiveValue::Set(record.user_id),
            user_strategy_id: ActiveValue::Set(record.user_strategy_id),
            strategy_id: ActiveValue::Set(record.strategy_id),
            run_id: ActiveValue::Set(record.run_id.clone()),
            leg_index: ActiveValue::Set(record.leg_index as i32),
            client_order_id: ActiveValue::Set(record.client_order_id.clone()),
            broker_order_id: ActiveValue::Set(broker_order_id),
            option_type: ActiveValue::Set(option_label(record.leg.option_type).to_string()),
            side: ActiveValue::Set(side_label(record.leg.buy_sell).to_string()),
            strike: ActiveValue::Set(record.leg.strike.clone()),
            expiration: ActiveValue::Set(record.leg.expiration.clone()),
            size: ActiveValue::Set(record.leg.contracts() as i32),
            fill_price: ActiveValue::Set(fill_price),
            realized_profit: ActiveValue::Set(realized_profit),
            status: ActiveValue::Set(status.to_string()),
            error: ActiveValue::Set(record.error.clone()),
            created_at: ActiveValue::Set(Some(chrono::Utc::now())),
            ..Default::default()
        };
        Ok(self.trades.record(active_model, &record.client_order_id).await?)
    }
}
