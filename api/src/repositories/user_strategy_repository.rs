use anyhow::Result;
use sea_orm::prelude::*;
use sea_orm::ActiveValue;
use shared::entity::user_strategies;
use std::sync::Arc;

pub struct UserStrategyRepository {
    db: Arc<DatabaseConnection>,
}

impl UserStrategyRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: u64) -> Result<Option<user_strategies::Model>> {
        let row = user_strategies::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(row)
    }

    pub async fn find_for_user(&self, user_id: i64, strategy_id: u64) -> Result<Option<user_strategies::Model>> {
        let row = user_strategies::Entity::find()
            .filter(user_strategies::Column::UserId.eq(user_id))
            .filter(user_strategies::Column::StrategyId.eq(strategy_id))
            .one(self.db.as_ref())
            .await?;
        Ok(row)
    }

    pub async fn create(&self, user_id: i64, strategy_id: u64) -> Result<user_strategies::Model> {
        let active_model = user_strategies::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            strategy_id: ActiveValue::Set(strategy_id),
            is_active: ActiveValue::Set(true),
            created_at: ActiveValue::Set(Some(chrono::Utc::now())),
            ..Default::default()
        };
        let row = user_strategies::Entity::insert(active_model)
            .exec_with_returning(self.db.as_ref())
            .await?;
        Ok(row)
    }

    pub async fn set_active(&self, row: user_strategies::Model, is_active: bool) -> Result<user_strategies::Model> {
        let mut active: user_strategies::ActiveModel = row.into();
        active.is_active = ActiveValue::Set(is_active);
        let row = active.update(self.db.as_ref()).await?;
        Ok(row)
    }
}
