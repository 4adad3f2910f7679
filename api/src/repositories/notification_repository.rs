use anyhow::Result;
use sea_orm::prelude::*;
use sea_orm::{ActiveValue, QueryOrder, TransactionTrait};
use shared::entity::{notification_recipients, notifications};
use std::sync::Arc;

pub struct NotificationRepository {
    db: Arc<DatabaseConnection>,
}

impl NotificationRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a notification and one recipient row per user, in one transaction
    pub async fn create(
        &self,
        active_model: notifications::ActiveModel,
        recipients: &[i64],
    ) -> Result<notifications::Model> {
        let txn = self.db.begin().await?;
        let notification = notifications::Entity::insert(active_model)
            .exec_with_returning(&txn)
            .await?;

        if !recipients.is_empty() {
            let now = chrono::Utc::now();
            let rows = recipients.iter().map(|user_id| notification_recipients::ActiveModel {
                notification_id: ActiveValue::Set(notification.id),
                user_id: ActiveValue::Set(*user_id),
                is_read: ActiveValue::Set(false),
                read_at: ActiveValue::Set(None),
                created_at: ActiveValue::Set(Some(now)),
                ..Default::default()
            });
            notification_recipients::Entity::insert_many(rows)
                .exec(&txn)
                .await?;
        }
        txn.commit().await?;
        Ok(notification)
    }

    pub async fn list_for_user(
        &self,
        user_id: i64,
        unread_only: bool,
    ) -> Result<Vec<(notification_recipients::Model, Option<notifications::Model>)>> {
        let mut query = notification_recipients::Entity::find()
            .filter(notification_recipients::Column::UserId.eq(user_id));
        if unread_only {
            query = query.filter(notification_recipients::Column::IsRead.eq(false));
        }
        let rows = query
            .find_also_related(notifications::Entity)
            .order_by_desc(notification_recipients::Column::Id)
            .all(self.db.as_ref())
            .await?;
        Ok(rows)
    }

    pub async fn find_recipient(&self, id: u64) -> Result<Option<notification_recipients::Model>> {
        let row = notification_recipients::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(row)
    }

    pub async fn mark_read(&self, row: notification_recipients::Model) -> Result<notification_recipients::Model> {
        let mut active: notification_recipients::ActiveModel = row.into();
        active.is_read = ActiveValue::Set(true);
        active.read_at = ActiveValue::Set(Some(chrono::Utc::now()));
        let row = active.update(self.db.as_ref()).await?;
        Ok(row)
    }
}
