//! Royalty distribution of realized copy-trade profit

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::prelude::DatabaseConnection;
use sea_orm::{ActiveValue, TransactionTrait};
use serde::{Deserialize, Serialize};
use shared::entity::royalty_distributions;
use shared::NotificationKind;
use std::sync::Arc;
use strategy_core::settlement::{qualifies_for_royalty, royalty_pct_from_fee, RoyaltySplit};

use crate::error::{AppError, AppResult};
use crate::repositories::{RoyaltyRepository, StrategyRepository, WalletRepository};
use crate::services::copy_trading::RoyaltySink;
use crate::services::notification_service::NotificationService;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoyaltyRequest {
    pub strategy_id: u64,
    pub trader_id: i64,
    #[serde(default)]
    pub trade_id: Option<u64>,
    pub profit: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoyaltyReceipt {
    pub distribution_id: u64,
    pub creator_id: i64,
    pub split: RoyaltySplit,
}

impl RoyaltyReceipt {
    fn from_row(row: &royalty_distributions::Model) -> Self {
        Self {
            distribution_id: row.id,
            creator_id: row.creator_id,
            split: RoyaltySplit {
                profit: row.profit,
                creator_royalty: row.creator_royalty,
                platform_fee: row.platform_fee,
                trader_net: row.profit - row.creator_royalty - row.platform_fee,
            },
        }
    }
}

pub struct RoyaltyService {
    db: Arc<DatabaseConnection>,
    strategies: StrategyRepository,
    notifications: Arc<NotificationService>,
    default_pct: Decimal,
    platform_fee_pct: Decimal,
}

impl RoyaltyService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        notifications: Arc<NotificationService>,
        default_pct: Decimal,
        platform_fee_pct: Decimal,
    ) -> Self {
        Self {
            strategies: StrategyRepository::new(db.clone()),
            db,
            notifications,
            default_pct,
            platform_fee_pct,
        }
    }

    /// Split the profit, record the distribution and credit the creator's wallet.
    /// A trade is paid at most once; asking again returns the first receipt.
    pub async fn distribute(&self, request: RoyaltyRequest) -> AppResult<RoyaltyReceipt> {
        if !qualifies_for_royalty(request.profit) {
            return Err(AppError::bad_request(format!(
                "profit {} is below the $1 royalty threshold",
                request.profit
            )));
        }

        if let Some(trade_id) = request.trade_id {
            if let Some(existing) = RoyaltyRepository::find_by_trade(self.db.as_ref(), trade_id).await? {
                tracing::info!(distribution_id = existing.id, trade_id, "royalty already distributed");
                return Ok(RoyaltyReceipt::from_row(&existing));
            }
        }

        let strategy = self
            .strategies
            .find_by_id(request.strategy_id)
            .await?
            .ok_or_else(|| AppError::not_found("strategy"))?;

        let royalty_pct = royalty_pct_from_fee(strategy.fee_percentage, self.default_pct);
        let split = RoyaltySplit::compute(request.profit, royalty_pct, self.platform_fee_pct)?;

        let txn = self.db.begin().await?;
        let distribution = RoyaltyRepository::insert(
            &txn,
            royalty_distributions::ActiveModel {
                trade_id: ActiveValue::Set(request.trade_id),
                strategy_id: ActiveValue::Set(strategy.id),
                creator_id: ActiveValue::Set(strategy.creator_id),
                trader_id: ActiveValue::Set(request.trader_id),
                profit: ActiveValue::Set(split.profit),
                creator_royalty: ActiveValue::Set(split.creator_royalty),
                platform_fee: ActiveValue::Set(split.platform_fee),
                royalty_pct: ActiveValue::Set(royalty_pct),
                platform_fee_pct: ActiveValue::Set(self.platform_fee_pct),
                created_at: ActiveValue::Set(Some(chrono::Utc::now())),
                ..Default::default()
            },
        )
        .await?;
        WalletRepository::credit(&txn, strategy.creator_id, split.creator_royalty).await?;
        txn.commit().await?;

        tracing::info!(
            distribution_id = distribution.id,
            strategy_id = strategy.id,
            creator_id = strategy.creator_id,
            royalty = %split.creator_royalty,
            "royalty distributed"
        );

        let message = format!(
            "You earned ${} from a copy trade of \"{}\".",
            split.creator_royalty, strategy.title
        );
        if let Err(e) = self
            .notifications
            .notify_user(strategy.creator_id, "Royalty earned", &message, NotificationKind::Royalty)
            .await
        {
            tracing::warn!(error = %e, creator_id = strategy.creator_id, "royalty notification failed");
        }

        Ok(RoyaltyReceipt {
            distribution_id: distribution.id,
            creator_id: strategy.creator_id,
            split,
        })
    }
}

#[async_trait]
impl RoyaltySink for RoyaltyService {
    async fn distribute(&self, request: RoyaltyRequest) -> AppResult<RoyaltyReceipt> {
        RoyaltyService::distribute(self, request).await
    }
}
