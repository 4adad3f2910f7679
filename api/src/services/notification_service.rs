use sea_orm::prelude::DatabaseConnection;
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};
use shared::entity::{notification_recipients, notifications};
use shared::NotificationKind;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::repositories::{NotificationRepository, ProfileRepository};

#[derive(Debug, Clone, PartialEq)]
pub enum Audience {
    All,
    Users(Vec<i64>),
}

#[derive(Debug, Deserialize)]
pub struct SendNotification {
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub kind: Option<NotificationKind>,
    /// Omitted means every active user
    #[serde(default)]
    pub user_ids: Option<Vec<i64>>,
}

impl SendNotification {
    pub fn audience(&self) -> Audience {
        match &self.user_ids {
            Some(ids) => Audience::Users(ids.clone()),
            None => Audience::All,
        }
    }
}

/// A notification as one recipient sees it
#[derive(Debug, Serialize)]
pub struct NotificationView {
    pub id: u64,
    pub notification_id: u64,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub is_read: bool,
    pub read_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl NotificationView {
    fn from_rows(recipient: notification_recipients::Model, notification: notifications::Model) -> Self {
        Self {
            id: recipient.id,
            notification_id: notification.id,
            title: notification.title,
            message: notification.message,
            kind: notification.kind,
            is_read: recipient.is_read,
            read_at: recipient.read_at,
            created_at: notification.created_at,
        }
    }
}

pub struct NotificationService {
    repo: NotificationRepository,
    profiles: ProfileRepository,
}

impl NotificationService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            repo: NotificationRepository::new(db.clone()),
            profiles: ProfileRepository::new(db),
        }
    }

    /// Admin broadcast. Delivery (push, email) happens elsewhere.
    pub async fn send(&self, sender_id: i64, request: SendNotification) -> AppResult<notifications::Model> {
        let title = request.title.trim();
        if title.is_empty() || request.message.trim().is_empty() {
            return Err(AppError::bad_request("title and message are required"));
        }

        let recipients = match request.audience() {
            Audience::All => self.profiles.active_ids().await?,
            Audience::Users(mut ids) => {
                ids.sort_unstable();
                ids.dedup();
                ids
            }
        };
        if recipients.is_empty() {
            return Err(AppError::bad_request("no recipients"));
        }

        let kind = request.kind.unwrap_or(NotificationKind::Campaign);
        let notification = self
            .insert(title, &request.message, kind, Some(sender_id), &recipients)
            .await?;
        tracing::info!(
            notification_id = notification.id,
            recipients = recipients.len(),
            "notification queued"
        );
        Ok(notification)
    }

    /// System event for a single user
    pub async fn notify_user(
        &self,
        user_id: i64,
        title: &str,
        message: &str,
        kind: NotificationKind,
    ) -> AppResult<notifications::Model> {
        self.insert(title, message, kind, None, &[user_id]).await
    }

    pub async fn list_for(&self, user_id: i64, unread_only: bool) -> AppResult<Vec<NotificationView>> {
        let rows = self.repo.list_for_user(user_id, unread_only).await?;
        Ok(rows
            .into_iter()
            .filter_map(|(recipient, notification)| {
                notification.map(|n| NotificationView::from_rows(recipient, n))
            })
            .collect())
    }

    pub async fn mark_read(&self, user_id: i64, recipient_id: u64) -> AppResult<notification_recipients::Model> {
        let row = self
            .repo
            .find_recipient(recipient_id)
            .await?
            .filter(|r| r.user_id == user_id)
            .ok_or_else(|| AppError::not_found("notification"))?;
        if row.is_read {
            return Ok(row);
        }
        Ok(self.repo.mark_read(row).await?)
    }

    async fn insert(
        &self,
        title: &str,
        message: &str,
        kind: NotificationKind,
        created_by: Option<i64>,
        recipients: &[i64],
    ) -> AppResult<notifications::Model> {
        let active_model = notifications::ActiveModel {
            title: ActiveValue::Set(title.to_string()),
            message: ActiveValue::Set(message.to_string()),
            kind: ActiveValue::Set(kind.as_str().to_string()),
            created_by: ActiveValue::Set(created_by),
            created_at: ActiveValue::Set(Some(chrono::Utc::now())),
            ..Default::default()
        };
        Ok(self.repo.create(active_model, recipients).await?)
    }
}
