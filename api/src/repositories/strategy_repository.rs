use anyhow::Result;
use sea_orm::prelude::*;
use sea_orm::QueryOrder;
use shared::entity::trading_strategies;
use std::sync::Arc;
use strategy_core::status::StrategyStatus;

pub struct StrategyRepository {
    db: Arc<DatabaseConnection>,
}

impl StrategyRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: u64) -> Result<Option<trading_strategies::Model>> {
        let strategy = trading_strategies::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(strategy)
    }

    /// Published strategies, newest first
    pub async fn list_published(&self, category: Option<&str>) -> Result<Vec<trading_strategies::Model>> {
        let mut query = trading_strategies::Entity::find().filter(
            trading_strategies::Column::Status.is_in(StrategyStatus::Published.stored_forms().iter().copied()),
        );
        if let Some(category) = category {
            query = query.filter(trading_strategies::Column::Category.eq(category));
        }
        let strategies = query
            .order_by_desc(trading_strategies::Column::PublishedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(strategies)
    }

    pub async fn list_by_creator(&self, creator_id: i64) -> Result<Vec<trading_strategies::Model>> {
        let strategies = trading_strategies::Entity::find()
            .filter(trading_strategies::Column::CreatorId.eq(creator_id))
            .order_by_desc(trading_strategies::Column::Id)
            .all(self.db.as_ref())
            .await?;
        Ok(strategies)
    }

    pub async fn create(&self, active_model: trading_strategies::ActiveModel) -> Result<trading_strategies::Model> {
        let strategy = trading_strategies::Entity::insert(active_model)
            .exec_with_returning(self.db.as_ref())
            .await?;
        Ok(strategy)
    }

    pub async fn update(&self, active_model: trading_strategies::ActiveModel) -> Result<trading_strategies::Model> {
        let strategy = active_model.update(self.db.as_ref()).await?;
        Ok(strategy)
    }

    pub async fn delete(&self, id: u64) -> Result<bool> {
        let result = trading_strategies::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_list_published_includes_approved_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([Vec::<trading_strategies::Model>::new()])
                .into_connection(),
        );
        let repo = StrategyRepository::new(db.clone());
        repo.list_published(Some("Iron Condor")).await.unwrap();

        drop(repo);
        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let statement = &log[0].statements()[0];
        assert!(statement.sql.contains("`status` IN (?, ?)"), "{}", statement.sql);
        let values = format!("{:?}", statement.values);
        assert!(values.contains("\"published\"") && values.contains("\"approved\""), "{}", values);
    }
}
