use anyhow::Result;
use sea_orm::prelude::*;
use shared::entity::royalty_distributions;
use std::sync::Arc;

pub struct RoyaltyRepository {
    db: Arc<DatabaseConnection>,
}

impl RoyaltyRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn count_for_creator(&self, creator_id: i64) -> Result<u64> {
        let count = royalty_distributions::Entity::find()
            .filter(royalty_distributions::Column::CreatorId.eq(creator_id))
            .count(self.db.as_ref())
            .await?;
        Ok(count)
    }

    /// Distribution already paid for a copy-trade leg
    pub async fn find_by_trade<C: ConnectionTrait>(
        conn: &C,
        trade_id: u64,
    ) -> Result<Option<royalty_distributions::Model>> {
        let row = royalty_distributions::Entity::find()
            .filter(royalty_distributions::Column::TradeId.eq(trade_id))
            .one(conn)
            .await?;
        Ok(row)
    }

    pub async fn insert<C: ConnectionTrait>(
        conn: &C,
        active_model: royalty_distributions::ActiveModel,
    ) -> Result<royalty_distributions::Model> {
        let row = royalty_distributions::Entity::insert(active_model)
            .exec_with_returning(conn)
            .await?;
        Ok(row)
    }
}
