use sea_orm::prelude::DatabaseConnection;
use serde::Serialize;
use shared::entity::strategy_subscriptions;
use shared::SUBSCRIPTION_ACTIVE;
use std::sync::Arc;

use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::repositories::{StrategyRepository, SubscriptionRepository};
use crate::services::strategy_service::status_of;

#[derive(Debug, Serialize)]
pub struct UnfollowResult {
    pub strategy_id: u64,
    pub following: bool,
}

pub struct SubscriptionService {
    subscriptions: SubscriptionRepository,
    strategies: StrategyRepository,
}

impl SubscriptionService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            subscriptions: SubscriptionRepository::new(db.clone()),
            strategies: StrategyRepository::new(db),
        }
    }

    pub async fn follow(&self, caller: &CurrentUser, strategy_id: u64) -> AppResult<strategy_subscriptions::Model> {
        let strategy = self
            .strategies
            .find_by_id(strategy_id)
            .await?
            .ok_or_else(|| AppError::not_found("strategy"))?;
        if !status_of(&strategy)?.is_public() {
            return Err(AppError::not_found("strategy"));
        }
        if strategy.creator_id == caller.id() {
            return Err(AppError::bad_request("you cannot follow your own strategy"));
        }

        let subscription = match self.subscriptions.find(caller.id(), strategy_id).await? {
            Some(existing) if existing.status == SUBSCRIPTION_ACTIVE => existing,
            Some(existing) => self.subscriptions.reactivate(existing).await?,
            None => self.subscriptions.create(caller.id(), strategy_id).await?,
        };
        tracing::info!(strategy_id, subscriber_id = caller.id(), "strategy followed");
        Ok(subscription)
    }

    pub async fn unfollow(&self, caller: &CurrentUser, strategy_id: u64) -> AppResult<UnfollowResult> {
        let subscription = self
            .subscriptions
            .find(caller.id(), strategy_id)
            .await?
            .filter(|s| s.status == SUBSCRIPTION_ACTIVE)
            .ok_or_else(|| AppError::not_found("subscription"))?;
        self.subscriptions.cancel(subscription).await?;
        tracing::info!(strategy_id, subscriber_id = caller.id(), "strategy unfollowed");
        Ok(UnfollowResult {
            strategy_id,
            following: false,
        })
    }

    pub async fn list(&self, caller: &CurrentUser) -> AppResult<Vec<strategy_subscriptions::Model>> {
        Ok(self.subscriptions.list_active(caller.id()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;
    use shared::entity::{profiles, trading_strategies};

    fn caller(id: i64) -> CurrentUser {
        CurrentUser::new(profiles::Model {
            id,
            email: format!("{}@example.com", id),
            display_name: None,
            role: "user".into(),
            is_active: true,
            created_at: None,
            updated_at: None,
        })
    }

    fn strategy(status: &str) -> trading_strategies::Model {
        trading_strategies::Model {
            id: 7,
            creator_id: 20,
            title: "SPY weekly condor".into(),
            description: None,
            category: "Iron Condor".into(),
            config: json!({"legs": [], "conditions": []}),
            fee_percentage: dec!(10),
            is_premium: true,
            status: status.into(),
            review_notes: None,
            reviewed_by: Some(1),
            published_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_cannot_follow_own_strategy() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![strategy("published")]])
            .into_connection();
        let err = SubscriptionService::new(Arc::new(db))
            .follow(&caller(20), 7)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_unpublished_strategy_is_hidden() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![strategy("pending_review")]])
            .into_connection();
        let err = SubscriptionService::new(Arc::new(db))
            .follow(&caller(10), 7)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_follow_approved_strategy() {
        let subscription = strategy_subscriptions::Model {
            id: 3,
            subscriber_id: 10,
            strategy_id: 7,
            status: SUBSCRIPTION_ACTIVE.into(),
            created_at: None,
            cancelled_at: None,
        };
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![strategy("approved")]])
            .append_query_results([Vec::<strategy_subscriptions::Model>::new(), vec![subscription.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 3,
                rows_affected: 1,
            }])
            .into_connection();
        let followed = SubscriptionService::new(Arc::new(db))
            .follow(&caller(10), 7)
            .await
            .unwrap();
        assert_eq!(followed, subscription);
    }
}
