use anyhow::Result;
use sea_orm::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveValue, QueryOrder};
use shared::entity::broker_connections;
use std::sync::Arc;

pub struct BrokerConnectionRepository {
    db: Arc<DatabaseConnection>,
}

impl BrokerConnectionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: u64) -> Result<Option<broker_connections::Model>> {
        let connection = broker_connections::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(connection)
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<broker_connections::Model>> {
        let connections = broker_connections::Entity::find()
            .filter(broker_connections::Column::UserId.eq(user_id))
            .order_by_desc(broker_connections::Column::Id)
            .all(self.db.as_ref())
            .await?;
        Ok(connections)
    }

    /// Most recent active connection of a user
    pub async fn find_active(&self, user_id: i64) -> Result<Option<broker_connections::Model>> {
        let connection = broker_connections::Entity::find()
            .filter(broker_connections::Column::UserId.eq(user_id))
            .filter(broker_connections::Column::IsActive.eq(true))
            .order_by_desc(broker_connections::Column::Id)
            .one(self.db.as_ref())
            .await?;
        Ok(connection)
    }

    /// Runs on any connection so `connect` can pair it with the insert
    pub async fn deactivate_broker<C: ConnectionTrait>(conn: &C, user_id: i64, broker: &str) -> Result<u64> {
        let result = broker_connections::Entity::update_many()
            .col_expr(broker_connections::Column::IsActive, Expr::value(false))
            .filter(broker_connections::Column::UserId.eq(user_id))
            .filter(broker_connections::Column::Broker.eq(broker))
            .filter(broker_connections::Column::IsActive.eq(true))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn create<C: ConnectionTrait>(
        conn: &C,
        active_model: broker_connections::ActiveModel,
    ) -> Result<broker_connections::Model> {
        let connection = broker_connections::Entity::insert(active_model)
            .exec_with_returning(conn)
            .await?;
        Ok(connection)
    }

    pub async fn touch(&self, id: u64) -> Result<()> {
        let active_model = broker_connections::ActiveModel {
            id: ActiveValue::Unchanged(id),
            last_connected_at: ActiveValue::Set(Some(chrono::Utc::now())),
            ..Default::default()
        };
        broker_connections::Entity::update(active_model)
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: u64) -> Result<bool> {
        let result = broker_connections::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected > 0)
    }
}
