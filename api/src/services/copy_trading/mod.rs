//! Copy-trading execution.
//!
//! A run places one broker order per strategy leg, in leg order, for a
//! user's copy of a published strategy. Legs are awaited one after the other;
//! the first failure ends the run and legs already filled stay filled.

mod store;

pub use store::DbCopyTradingStore;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::entity::{trading_strategies, user_strategies};
use shared::{BrokerApiClient, BrokerError, BrokerSession, OrderFill, OrderRequest};
use std::str::FromStr;
use std::sync::Arc;
use strategy_core::condition::ConditionEvaluator;
use strategy_core::config::StrategyConfig;
use strategy_core::leg::{LegSide, OptionType, TradingLeg};
use strategy_core::settlement::qualifies_for_royalty;

use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::repositories::RecordedTrade;
use crate::services::broker_connection_service::BrokerCredentials;
use crate::services::royalty_service::{RoyaltyReceipt, RoyaltyRequest};

#[async_trait]
pub trait BrokerGateway: Send + Sync {
    async fn authenticate(&self, api_key: &str, api_secret: &str) -> Result<BrokerSession, BrokerError>;
    async fn place_order(&self, session: &BrokerSession, order: &OrderRequest) -> Result<OrderFill, BrokerError>;
}

#[async_trait]
impl BrokerGateway for BrokerApiClient {
    async fn authenticate(&self, api_key: &str, api_secret: &str) -> Result<BrokerSession, BrokerError> {
        BrokerApiClient::authenticate(self, api_key, api_secret).await
    }

    async fn place_order(&self, session: &BrokerSession, order: &OrderRequest) -> Result<OrderFill, BrokerError> {
        BrokerApiClient::place_order(self, session, order).await
    }
}

/// The copy and the strategy it follows
#[derive(Debug, Clone)]
pub struct RunContext {
    pub user_strategy: user_strategies::Model,
    pub strategy: trading_strategies::Model,
}

/// One leg order as persisted in `iron_condor_trades`
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub user_id: i64,
    pub user_strategy_id: u64,
    pub strategy_id: u64,
    pub run_id: String,
    pub leg_index: usize,
    pub client_order_id: String,
    pub leg: TradingLeg,
    pub fill: Option<OrderFill>,
    pub error: Option<String>,
}

#[async_trait]
pub trait CopyTradingStore: Send + Sync {
    async fn load_run(&self, user_strategy_id: u64) -> AppResult<Option<RunContext>>;
    async fn active_credentials(&self, user_id: i64) -> AppResult<Option<BrokerCredentials>>;
    async fn mark_connection_used(&self, connection_id: u64) -> AppResult<()>;
    /// An existing row with the same client order id is reused; `fill_stored`
    /// is only set when this call persisted the fill
    async fn record_trade(&self, record: &TradeRecord) -> AppResult<RecordedTrade>;
}

#[async_trait]
pub trait RoyaltySink: Send + Sync {
    async fn distribute(&self, request: RoyaltyRequest) -> AppResult<RoyaltyReceipt>;
}

#[derive(Debug, Deserialize)]
pub struct CopyTradeRequest {
    pub user_strategy_id: u64,
    /// Reusing a run id replays the same client order ids
    #[serde(default)]
    pub run_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecutedLeg {
    pub leg_index: usize,
    pub trade_id: u64,
    pub client_order_id: String,
    pub broker_order_id: String,
    pub fill_price: Decimal,
    pub realized_profit: Option<Decimal>,
    pub royalty: Option<RoyaltyReceipt>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CopyTradeOutcome {
    Skipped {
        user_strategy_id: u64,
        reason: String,
    },
    Completed {
        user_strategy_id: u64,
        run_id: String,
        legs: Vec<ExecutedLeg>,
    },
    Partial {
        user_strategy_id: u64,
        run_id: String,
        legs: Vec<ExecutedLeg>,
        failed_leg: usize,
        error: String,
    },
}

impl CopyTradeOutcome {
    pub fn is_partial(&self) -> bool {
        matches!(self, CopyTradeOutcome::Partial { .. })
    }
}

pub fn client_order_id(user_strategy_id: u64, run_id: &str, leg_index: usize) -> String {
    format!("copy-{}-{}-{}", user_strategy_id, run_id, leg_index)
}

fn option_label(option_type: OptionType) -> &'static str {
    match option_type {
        OptionType::Call => "Call",
        OptionType::Put => "Put",
    }
}

fn side_label(side: LegSide) -> &'static str {
    match side {
        LegSide::Buy => "Buy",
        LegSide::Sell => "Sell",
    }
}

pub fn order_for_leg(client_order_id: String, underlying: &str, leg: &TradingLeg) -> OrderRequest {
    OrderRequest {
        client_order_id,
        underlying: underlying.to_string(),
        option_type: option_label(leg.option_type).to_lowercase(),
        side: side_label(leg.buy_sell).to_lowercase(),
        strike: leg.strike.trim().to_string(),
        days_to_expiry: leg.expiration.trim().to_string(),
        quantity: leg.contracts(),
        limit_price: Decimal::from_str(leg.price.trim()).ok(),
    }
}

pub struct CopyTradingEngine {
    store: Arc<dyn CopyTradingStore>,
    broker: Arc<dyn BrokerGateway>,
    royalties: Arc<dyn RoyaltySink>,
    evaluator: Arc<dyn ConditionEvaluator>,
}

impl CopyTradingEngine {
    pub fn new(
        store: Arc<dyn CopyTradingStore>,
        broker: Arc<dyn BrokerGateway>,
        royalties: Arc<dyn RoyaltySink>,
        evaluator: Arc<dyn ConditionEvaluator>,
    ) -> Self {
        Self {
            store,
            broker,
            royalties,
            evaluator,
        }
    }

    pub async fn run(&self, caller: &CurrentUser, request: CopyTradeRequest) -> AppResult<CopyTradeOutcome> {
        let user_strategy_id = request.user_strategy_id;
        let RunContext {
            user_strategy,
            strategy,
        } = self
            .store
            .load_run(user_strategy_id)
            .await?
            .ok_or_else(|| AppError::not_found("user strategy"))?;

        if !caller.can_manage(user_strategy.user_id) {
            return Err(AppError::forbidden("not your strategy copy"));
        }
        if !user_strategy.is_active {
            return Err(AppError::bad_request("strategy copy is not active"));
        }

        let config = StrategyConfig::from_json(&strategy.config)?;
        config.validate()?;
        if !self.evaluator.evaluate(&config.conditions) {
            tracing::info!(user_strategy_id, "entry conditions not met, run skipped");
            return Ok(CopyTradeOutcome::Skipped {
                user_strategy_id,
                reason: "entry conditions not met".to_string(),
            });
        }

        let credentials = self
            .store
            .active_credentials(user_strategy.user_id)
            .await?
            .ok_or_else(|| AppError::bad_request("no active broker connection"))?;
        let session = self
            .broker
            .authenticate(&credentials.api_key, &credentials.api_secret)
            .await?;
        if let Err(e) = self.store.mark_connection_used(credentials.connection_id).await {
            tracing::warn!(error = %e, connection_id = credentials.connection_id, "could not update connection timestamp");
        }

        let run_id = request
            .run_id
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());
        let underlying = config.underlying_symbol();

        tracing::info!(
            user_strategy_id,
            run_id = %run_id,
            legs = config.legs.len(),
            underlying = %underlying,
            "copy trade started"
        );

        let mut executed = Vec::with_capacity(config.legs.len());
        for (leg_index, leg) in config.legs.iter().enumerate() {
            let order_id = client_order_id(user_strategy_id, &run_id, leg_index);
            let order = order_for_leg(order_id.clone(), &underlying, leg);
            let mut record = TradeRecord {
                user_id: user_strategy.user_id,
                user_strategy_id,
                strategy_id: strategy.id,
                run_id: run_id.clone(),
                leg_index,
                client_order_id: order_id.clone(),
                leg: leg.clone(),
                fill: None,
                error: None,
            };

            let fill = match self.broker.place_order(&session, &order).await {
                Ok(fill) => fill,
                Err(e) => {
                    let error = e.to_string();
                    tracing::error!(user_strategy_id, run_id = %run_id, leg_index, error = %error, "leg order failed");
                    record.error = Some(error.clone());
                    if let Err(e) = self.store.record_trade(&record).await {
                        tracing::warn!(error = %e, leg_index, "could not record failed leg");
                    }
                    return Ok(CopyTradeOutcome::Partial {
                        user_strategy_id,
                        run_id,
                        legs: executed,
                        failed_leg: leg_index,
                        error,
                    });
                }
            };

            record.fill = Some(fill.clone());
            let recorded = self.store.record_trade(&record).await?;
            // a replayed leg whose fill was already stored has been settled before
            let royalty = if recorded.fill_stored {
                self.distribute_royalty(strategy.id, user_strategy.user_id, recorded.id, fill.realized_profit)
                    .await
            } else {
                tracing::info!(trade_id = recorded.id, leg_index, "leg already recorded, royalty skipped");
                None
            };

            executed.push(ExecutedLeg {
                leg_index,
                trade_id: recorded.id,
                client_order_id: order_id,
                broker_order_id: fill.broker_order_id,
                fill_price: fill.fill_price,
                realized_profit: fill.realized_profit,
                royalty,
            });
        }

        tracing::info!(user_strategy_id, run_id = %run_id, "copy trade completed");
        Ok(CopyTradeOutcome::Completed {
            user_strategy_id,
            run_id,
            legs: executed,
        })
    }

    /// A failed distribution does not undo the fill. It is logged and can be
    /// retried through `distribute-royalties` with the same trade id.
    async fn distribute_royalty(
        &self,
        strategy_id: u64,
        trader_id: i64,
        trade_id: u64,
        realized_profit: Option<Decimal>,
    ) -> Option<RoyaltyReceipt> {
        let profit = realized_profit.filter(|p| qualifies_for_royalty(*p))?;
        let request = RoyaltyRequest {
            strategy_id,
            trader_id,
            trade_id: Some(trade_id),
            profit,
        };
        match self.royalties.distribute(request).await {
            Ok(receipt) => Some(receipt),
            Err(e) => {
                tracing::warn!(error = %e, trade_id, "royalty distribution failed");
                None
            }
        }
    }
}
