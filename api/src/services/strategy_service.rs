//! Strategy authoring, review and marketplace

use rust_decimal::Decimal;
use sea_orm::prelude::DatabaseConnection;
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::entity::{trading_strategies, user_strategies};
use shared::NotificationKind;
use std::sync::Arc;
use strategy_core::config::StrategyConfig;
use strategy_core::leg::TradingLeg;
use strategy_core::risk::{NetPremium, RiskCalculator, RiskMetrics};
use strategy_core::settlement::max_fee_percentage;
use strategy_core::status::StrategyStatus;

use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::repositories::{StrategyRepository, SubscriptionRepository, UserStrategyRepository};
use crate::services::notification_service::NotificationService;

#[derive(Debug, Deserialize)]
pub struct CreateStrategy {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub config: Value,
    #[serde(default)]
    pub fee_percentage: Option<Decimal>,
    #[serde(default)]
    pub is_premium: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateStrategy {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub config: Option<Value>,
    pub fee_percentage: Option<Decimal>,
    pub is_premium: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewDecision {
    pub approve: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskPreview {
    pub legs: usize,
    pub total_credit: f64,
    pub total_debit: f64,
    pub net_credit: f64,
    pub metrics: RiskMetrics,
    pub max_profit_display: String,
    pub max_loss_display: String,
    pub risk_reward_display: String,
}

impl RiskPreview {
    pub fn for_legs(legs: &[TradingLeg]) -> Self {
        let premium = NetPremium::from_legs(legs);
        let metrics = RiskCalculator::from_net_premium(&premium);
        Self {
            legs: legs.len(),
            total_credit: premium.total_credit,
            total_debit: premium.total_debit,
            net_credit: premium.net_credit(),
            metrics,
            max_profit_display: metrics.display_max_profit(),
            max_loss_display: metrics.display_max_loss(),
            risk_reward_display: metrics.display_ratio(),
        }
    }
}

pub fn status_of(strategy: &trading_strategies::Model) -> AppResult<StrategyStatus> {
    Ok(strategy.status.parse::<StrategyStatus>()?)
}

/// Royalty and platform fee together may not exceed the profit
fn check_fee(fee: Decimal, max_fee: Decimal) -> AppResult<Decimal> {
    if fee < Decimal::ZERO || fee > max_fee {
        return Err(AppError::bad_request(format!(
            "fee_percentage must be between 0 and {}",
            max_fee.normalize()
        )));
    }
    Ok(fee)
}

fn required(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::bad_request(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

/// Stored config normalized through the typed model
fn normalize_config(config: &Value) -> AppResult<Value> {
    Ok(StrategyConfig::from_json(config)?.to_json())
}

pub struct StrategyService {
    strategies: StrategyRepository,
    user_strategies: UserStrategyRepository,
    subscriptions: SubscriptionRepository,
    notifications: Arc<NotificationService>,
    max_fee: Decimal,
}

impl StrategyService {
    pub fn new(db: Arc<DatabaseConnection>, notifications: Arc<NotificationService>, platform_fee_pct: Decimal) -> Self {
        Self {
            strategies: StrategyRepository::new(db.clone()),
            user_strategies: UserStrategyRepository::new(db.clone()),
            subscriptions: SubscriptionRepository::new(db),
            notifications,
            max_fee: max_fee_percentage(platform_fee_pct),
        }
    }

    pub async fn create(&self, caller: &CurrentUser, request: CreateStrategy) -> AppResult<trading_strategies::Model> {
        if !caller.role.can_create_strategies() {
            return Err(AppError::forbidden("creator role required"));
        }
        let now = chrono::Utc::now();
        let active_model = trading_strategies::ActiveModel {
            creator_id: ActiveValue::Set(caller.id()),
            title: ActiveValue::Set(required("title", &request.title)?),
            description: ActiveValue::Set(request.description),
            category: ActiveValue::Set(required("category", &request.category)?),
            config: ActiveValue::Set(normalize_config(&request.config)?),
            fee_percentage: ActiveValue::Set(check_fee(request.fee_percentage.unwrap_or(Decimal::ZERO), self.max_fee)?),
            is_premium: ActiveValue::Set(request.is_premium),
            status: ActiveValue::Set(StrategyStatus::Draft.as_str().to_string()),
            review_notes: ActiveValue::Set(None),
            reviewed_by: ActiveValue::Set(None),
            published_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Some(now)),
            updated_at: ActiveValue::Set(Some(now)),
            ..Default::default()
        };
        let strategy = self.strategies.create(active_model).await?;
        tracing::info!(strategy_id = strategy.id, creator_id = caller.id(), "strategy drafted");
        Ok(strategy)
    }

    pub async fn list_published(&self, category: Option<&str>) -> AppResult<Vec<trading_strategies::Model>> {
        let category = category.map(str::trim).filter(|c| !c.is_empty());
        Ok(self.strategies.list_published(category).await?)
    }

    pub async fn list_mine(&self, caller: &CurrentUser) -> AppResult<Vec<trading_strategies::Model>> {
        Ok(self.strategies.list_by_creator(caller.id()).await?)
    }

    /// Unpublished strategies are only visible to their creator and admins
    pub async fn get(&self, caller: &CurrentUser, id: u64) -> AppResult<trading_strategies::Model> {
        let strategy = self.find(id).await?;
        if status_of(&strategy)?.is_public() || caller.can_manage(strategy.creator_id) {
            Ok(strategy)
        } else {
            Err(AppError::not_found("strategy"))
        }
    }

    pub async fn preview(&self, caller: &CurrentUser, id: u64) -> AppResult<RiskPreview> {
        let strategy = self.get(caller, id).await?;
        let config = StrategyConfig::from_json(&strategy.config)?;
        Ok(RiskPreview::for_legs(&config.legs))
    }

    pub async fn update(
        &self,
        caller: &CurrentUser,
        id: u64,
        patch: UpdateStrategy,
    ) -> AppResult<trading_strategies::Model> {
        let strategy = self.owned(caller, id).await?;
        if !status_of(&strategy)?.is_editable() {
            return Err(AppError::bad_request(format!(
                "strategy is {} and can no longer be edited",
                strategy.status
            )));
        }

        let mut active: trading_strategies::ActiveModel = strategy.into();
        if let Some(title) = patch.title {
            active.title = ActiveValue::Set(required("title", &title)?);
        }
        if let Some(description) = patch.description {
            active.description = ActiveValue::Set(Some(description));
        }
        if let Some(category) = patch.category {
            active.category = ActiveValue::Set(required("category", &category)?);
        }
        if let Some(config) = patch.config {
            active.config = ActiveValue::Set(normalize_config(&config)?);
        }
        if let Some(fee) = patch.fee_percentage {
            active.fee_percentage = ActiveValue::Set(check_fee(fee, self.max_fee)?);
        }
        if let Some(is_premium) = patch.is_premium {
            active.is_premium = ActiveValue::Set(is_premium);
        }
        active.updated_at = ActiveValue::Set(Some(chrono::Utc::now()));
        Ok(self.strategies.update(active).await?)
    }

    pub async fn submit(&self, caller: &CurrentUser, id: u64) -> AppResult<trading_strategies::Model> {
        let strategy = self.owned(caller, id).await?;
        StrategyConfig::from_json(&strategy.config)?.validate()?;
        let next = status_of(&strategy)?.transition(StrategyStatus::PendingReview)?;

        let mut active: trading_strategies::ActiveModel = strategy.into();
        active.status = ActiveValue::Set(next.as_str().to_string());
        active.updated_at = ActiveValue::Set(Some(chrono::Utc::now()));
        let strategy = self.strategies.update(active).await?;
        tracing::info!(strategy_id = strategy.id, "strategy submitted for review");
        Ok(strategy)
    }

    pub async fn review(
        &self,
        caller: &CurrentUser,
        id: u64,
        decision: ReviewDecision,
    ) -> AppResult<trading_strategies::Model> {
        caller.require_admin()?;
        let strategy = self.find(id).await?;
        let target = if decision.approve {
            StrategyStatus::Published
        } else {
            StrategyStatus::Rejected
        };
        let next = status_of(&strategy)?.transition(target)?;
        let notes = decision.notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        if next == StrategyStatus::Rejected && notes.is_none() {
            return Err(AppError::bad_request("rejection requires review notes"));
        }

        let now = chrono::Utc::now();
        let mut active: trading_strategies::ActiveModel = strategy.into();
        active.status = ActiveValue::Set(next.as_str().to_string());
        active.review_notes = ActiveValue::Set(notes.clone());
        active.reviewed_by = ActiveValue::Set(Some(caller.id()));
        if next == StrategyStatus::Published {
            active.published_at = ActiveValue::Set(Some(now));
        }
        active.updated_at = ActiveValue::Set(Some(now));
        let strategy = self.strategies.update(active).await?;
        tracing::info!(strategy_id = strategy.id, status = %next, reviewer = caller.id(), "strategy reviewed");

        let (title, message) = match next {
            StrategyStatus::Published => (
                "Strategy approved",
                format!("\"{}\" is now published in the marketplace.", strategy.title),
            ),
            _ => (
                "Strategy rejected",
                format!(
                    "\"{}\" was rejected: {}",
                    strategy.title,
                    notes.as_deref().unwrap_or_default()
                ),
            ),
        };
        if let Err(e) = self
            .notifications
            .notify_user(strategy.creator_id, title, &message, NotificationKind::Strategy)
            .await
        {
            tracing::warn!(error = %e, strategy_id = strategy.id, "review notification failed");
        }
        Ok(strategy)
    }

    pub async fn archive(&self, caller: &CurrentUser, id: u64) -> AppResult<trading_strategies::Model> {
        let strategy = self.managed(caller, id).await?;
        let next = status_of(&strategy)?.transition(StrategyStatus::Archived)?;
        let mut active: trading_strategies::ActiveModel = strategy.into();
        active.status = ActiveValue::Set(next.as_str().to_string());
        active.updated_at = ActiveValue::Set(Some(chrono::Utc::now()));
        Ok(self.strategies.update(active).await?)
    }

    /// Published strategies must be archived first
    pub async fn delete(&self, caller: &CurrentUser, id: u64) -> AppResult<u64> {
        let strategy = self.managed(caller, id).await?;
        if status_of(&strategy)?.is_public() {
            return Err(AppError::bad_request("published strategies must be archived before deletion"));
        }
        self.strategies.delete(strategy.id).await?;
        tracing::info!(strategy_id = id, deleted_by = caller.id(), "strategy deleted");
        Ok(id)
    }

    /// Copy a published strategy into the caller's strategies; repeated calls return the same copy
    pub async fn copy(&self, caller: &CurrentUser, id: u64) -> AppResult<user_strategies::Model> {
        let strategy = self.find(id).await?;
        if !status_of(&strategy)?.is_public() {
            return Err(AppError::bad_request("only published strategies can be copied"));
        }
        if strategy.is_premium
            && strategy.creator_id != caller.id()
            && !self.subscriptions.has_active(caller.id(), strategy.id).await?
        {
            return Err(AppError::forbidden("premium strategy requires an active subscription"));
        }

        let copy = match self.user_strategies.find_for_user(caller.id(), strategy.id).await? {
            Some(existing) if existing.is_active => existing,
            Some(existing) => self.user_strategies.set_active(existing, true).await?,
            None => self.user_strategies.create(caller.id(), strategy.id).await?,
        };
        tracing::info!(user_strategy_id = copy.id, strategy_id = strategy.id, user_id = caller.id(), "strategy copied");
        Ok(copy)
    }

    pub async fn find(&self, id: u64) -> AppResult<trading_strategies::Model> {
        self.strategies
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("strategy"))
    }

    async fn owned(&self, caller: &CurrentUser, id: u64) -> AppResult<trading_strategies::Model> {
        let strategy = self.find(id).await?;
        if strategy.creator_id != caller.id() {
            return Err(AppError::forbidden("only the creator can change this strategy"));
        }
        Ok(strategy)
    }

    async fn managed(&self, caller: &CurrentUser, id: u64) -> AppResult<trading_strategies::Model> {
        let strategy = self.find(id).await?;
        if !caller.can_manage(strategy.creator_id) {
            return Err(AppError::forbidden("only the creator or an admin can do this"));
        }
        Ok(strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;
    use shared::entity::profiles;
    use std::collections::BTreeMap;
    use strategy_core::leg::{LegSide, OptionType};

    const CREATOR: i64 = 20;
    const TRADER: i64 = 10;
    const ADMIN: i64 = 1;

    fn caller(id: i64, role: &str) -> CurrentUser {
        CurrentUser::new(profiles::Model {
            id,
            email: format!("{}@example.com", id),
            display_name: None,
            role: role.into(),
            is_active: true,
            created_at: None,
            updated_at: None,
        })
    }

    fn service_on(db: Arc<DatabaseConnection>) -> StrategyService {
        let notifications = Arc::new(NotificationService::new(db.clone()));
        StrategyService::new(db, notifications, dec!(0.05))
    }

    fn mock(db: MockDatabase) -> Arc<DatabaseConnection> {
        Arc::new(db.into_connection())
    }

    fn strategy(status: &str) -> trading_strategies::Model {
        trading_strategies::Model {
            id: 7,
            creator_id: CREATOR,
            title: "SPY weekly condor".into(),
            description: None,
            category: "Iron Condor".into(),
            config: json!({
                "underlying": "SPY",
                "legs": [
                    {"strike": "95", "type": "Put", "expiration": "30", "buySell": "Sell", "size": 1, "price": "1.50"},
                    {"strike": "90", "type": "Put", "expiration": "30", "buySell": "Buy", "size": 1, "price": "0.50"}
                ],
                "conditions": []
            }),
            fee_percentage: dec!(10),
            is_premium: false,
            status: status.into(),
            review_notes: None,
            reviewed_by: None,
            published_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn updated() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    fn statement_sql(db: Arc<DatabaseConnection>, prefix: &str) -> String {
        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        log.iter()
            .flat_map(|t| t.statements().iter().map(|s| s.sql.clone()).collect::<Vec<_>>())
            .find(|sql| sql.starts_with(prefix))
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_plain_users_cannot_create_strategies() {
        let service = service_on(mock(MockDatabase::new(DatabaseBackend::MySql)));
        let request = CreateStrategy {
            title: "Condor".into(),
            description: None,
            category: "Iron Condor".into(),
            config: json!({"legs": []}),
            fee_percentage: None,
            is_premium: false,
        };
        let err = service.create(&caller(TRADER, "user"), request).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_creator_drafts_a_strategy() {
        let db = mock(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_exec_results([MockExecResult {
                    last_insert_id: 7,
                    rows_affected: 1,
                }])
                .append_query_results([vec![strategy("draft")]]),
        );
        let service = service_on(db.clone());
        let request = CreateStrategy {
            title: "  SPY weekly condor ".into(),
            description: None,
            category: "Iron Condor".into(),
            config: strategy("draft").config,
            fee_percentage: Some(dec!(10)),
            is_premium: false,
        };
        let created = service.create(&caller(CREATOR, "creator"), request).await.unwrap();
        assert_eq!(created.id, 7);
        assert_eq!(created.status, "draft");

        drop(service);
        let insert = statement_sql(db, "INSERT INTO `trading_strategies`");
        assert!(insert.contains("`creator_id`"), "{}", insert);
    }

    #[tokio::test]
    async fn test_submit_requires_legs() {
        let mut empty = strategy("draft");
        empty.config = json!({"underlying": "SPY", "legs": [], "conditions": []});
        let db = mock(MockDatabase::new(DatabaseBackend::MySql).append_query_results([vec![empty]]));
        let err = service_on(db)
            .submit(&caller(CREATOR, "creator"), 7)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m.contains("invalid strategy config")));
    }

    #[tokio::test]
    async fn test_submit_moves_draft_to_pending_review() {
        let db = mock(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([vec![strategy("draft")], vec![strategy("pending_review")]])
                .append_exec_results([updated()]),
        );
        let service = service_on(db.clone());
        let submitted = service.submit(&caller(CREATOR, "creator"), 7).await.unwrap();
        assert_eq!(submitted.status, "pending_review");

        drop(service);
        let update = statement_sql(db, "UPDATE `trading_strategies`");
        assert!(update.contains("`status` = ?"), "{}", update);
    }

    #[tokio::test]
    async fn test_only_the_creator_submits() {
        let db = mock(MockDatabase::new(DatabaseBackend::MySql).append_query_results([vec![strategy("draft")]]));
        let err = service_on(db).submit(&caller(TRADER, "creator"), 7).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_rejection_requires_notes() {
        let db = mock(
            MockDatabase::new(DatabaseBackend::MySql).append_query_results([vec![strategy("pending_review")]]),
        );
        let decision = ReviewDecision {
            approve: false,
            notes: Some("   ".into()),
        };
        let err = service_on(db)
            .review(&caller(ADMIN, "admin"), 7, decision)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m.contains("review notes")));
    }

    #[tokio::test]
    async fn test_approval_stamps_published_at() {
        let mut published = strategy("published");
        published.reviewed_by = Some(ADMIN);
        published.published_at = Some(chrono::Utc::now());
        let db = mock(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([vec![strategy("pending_review")], vec![published]])
                .append_exec_results([updated()]),
        );
        let service = service_on(db.clone());
        let decision = ReviewDecision {
            approve: true,
            notes: None,
        };
        let reviewed = service.review(&caller(ADMIN, "admin"), 7, decision).await.unwrap();
        assert_eq!(reviewed.status, "published");
        assert!(reviewed.published_at.is_some());

        drop(service);
        let update = statement_sql(db, "UPDATE `trading_strategies`");
        assert!(update.contains("`published_at` = ?"), "{}", update);
        assert!(update.contains("`reviewed_by` = ?"), "{}", update);
    }

    #[tokio::test]
    async fn test_review_is_admin_only() {
        let service = service_on(mock(MockDatabase::new(DatabaseBackend::MySql)));
        let decision = ReviewDecision {
            approve: true,
            notes: None,
        };
        let err = service
            .review(&caller(CREATOR, "creator"), 7, decision)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_premium_copy_requires_subscription() {
        let mut premium = strategy("published");
        premium.is_premium = true;
        let db = mock(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([vec![premium]])
                .append_query_results([vec![BTreeMap::from([("num_items", sea_orm::Value::Int(Some(0)))])]]),
        );
        let err = service_on(db).copy(&caller(TRADER, "user"), 7).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_copy_reuses_active_copy() {
        let existing = user_strategies::Model {
            id: 5,
            user_id: TRADER,
            strategy_id: 7,
            is_active: true,
            created_at: None,
        };
        let db = mock(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([vec![strategy("approved")]])
                .append_query_results([vec![existing.clone()]]),
        );
        let service = service_on(db.clone());
        let copy = service.copy(&caller(TRADER, "user"), 7).await.unwrap();
        assert_eq!(copy, existing);

        drop(service);
        assert!(statement_sql(db, "INSERT").is_empty());
    }

    #[test]
    fn test_preview_for_credit_spread() {
        let legs = [
            TradingLeg::new(OptionType::Put, LegSide::Sell, "95", "30", 1, "1.50"),
            TradingLeg::new(OptionType::Put, LegSide::Buy, "90", "30", 1, "0.50"),
        ];
        let preview = RiskPreview::for_legs(&legs);
        assert_eq!(preview.legs, 2);
        assert_eq!(preview.max_profit_display, "$100");
        assert_eq!(preview.risk_reward_display, "1.00");
        assert!((preview.net_credit - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_fee_bounds_leave_room_for_platform_fee() {
        let max_fee = max_fee_percentage(dec!(0.05));
        assert!(check_fee(dec!(0), max_fee).is_ok());
        assert!(check_fee(dec!(95), max_fee).is_ok());
        assert!(check_fee(dec!(-1), max_fee).is_err());
        assert!(check_fee(dec!(95.01), max_fee).is_err());
        let err = check_fee(dec!(100), max_fee).unwrap_err();
        assert_eq!(err.to_string(), "fee_percentage must be between 0 and 95");
    }

    #[test]
    fn test_normalize_config_rejects_non_objects() {
        assert!(normalize_config(&json!([1, 2])).is_err());
        let normalized = normalize_config(&json!({
            "legs": [{"strike": "100", "type": "Call", "expiration": "30", "buySell": "Sell", "size": "2", "price": "1.10"}]
        }))
        .unwrap();
        assert_eq!(normalized["legs"][0]["size"], 2);
        assert_eq!(normalized["conditions"], json!([]));
    }

    #[test]
    fn test_required_trims() {
        assert_eq!(required("title", "  Condor ").unwrap(), "Condor");
        assert!(required("title", "   ").is_err());
    }
}
