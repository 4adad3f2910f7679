use anyhow::Result;
use sea_orm::prelude::*;
use sea_orm::{ActiveValue, QueryOrder};
use shared::entity::strategy_subscriptions;
use shared::{SUBSCRIPTION_ACTIVE, SUBSCRIPTION_CANCELLED};
use std::sync::Arc;

pub struct SubscriptionRepository {
    db: Arc<DatabaseConnection>,
}

impl SubscriptionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn find(&self, subscriber_id: i64, strategy_id: u64) -> Result<Option<strategy_subscriptions::Model>> {
        let row = strategy_subscriptions::Entity::find()
            .filter(strategy_subscriptions::Column::SubscriberId.eq(subscriber_id))
            .filter(strategy_subscriptions::Column::StrategyId.eq(strategy_id))
            .order_by_desc(strategy_subscriptions::Column::Id)
            .one(self.db.as_ref())
            .await?;
        Ok(row)
    }

    pub async fn has_active(&self, subscriber_id: i64, strategy_id: u64) -> Result<bool> {
        let count = strategy_subscriptions::Entity::find()
            .filter(strategy_subscriptions::Column::SubscriberId.eq(subscriber_id))
            .filter(strategy_subscriptions::Column::StrategyId.eq(strategy_id))
            .filter(strategy_subscriptions::Column::Status.eq(SUBSCRIPTION_ACTIVE))
            .count(self.db.as_ref())
            .await?;
        Ok(count > 0)
    }

    pub async fn list_active(&self, subscriber_id: i64) -> Result<Vec<strategy_subscriptions::Model>> {
        let rows = strategy_subscriptions::Entity::find()
            .filter(strategy_subscriptions::Column::SubscriberId.eq(subscriber_id))
            .filter(strategy_subscriptions::Column::Status.eq(SUBSCRIPTION_ACTIVE))
            .order_by_desc(strategy_subscriptions::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(rows)
    }

    pub async fn create(&self, subscriber_id: i64, strategy_id: u64) -> Result<strategy_subscriptions::Model> {
        let active_model = strategy_subscriptions::ActiveModel {
            subscriber_id: ActiveValue::Set(subscriber_id),
            strategy_id: ActiveValue::Set(strategy_id),
            status: ActiveValue::Set(SUBSCRIPTION_ACTIVE.to_string()),
            created_at: ActiveValue::Set(Some(chrono::Utc::now())),
            cancelled_at: ActiveValue::Set(None),
            ..Default::default()
        };
        let row = strategy_subscriptions::Entity::insert(active_model)
            .exec_with_returning(self.db.as_ref())
            .await?;
        Ok(row)
    }

    pub async fn reactivate(&self, row: strategy_subscriptions::Model) -> Result<strategy_subscriptions::Model> {
        let mut active: strategy_subscriptions::ActiveModel = row.into();
        active.status = ActiveValue::Set(SUBSCRIPTION_ACTIVE.to_string());
        active.cancelled_at = ActiveValue::Set(None);
        let row = active.update(self.db.as_ref()).await?;
        Ok(row)
    }

    pub async fn cancel(&self, row: strategy_subscriptions::Model) -> Result<strategy_subscriptions::Model> {
        let mut active: strategy_subscriptions::ActiveModel = row.into();
        active.status = ActiveValue::Set(SUBSCRIPTION_CANCELLED.to_string());
        active.cancelled_at = ActiveValue::Set(Some(chrono::Utc::now()));
        let row = active.update(self.db.as_ref()).await?;
        Ok(row)
    }
}
