//! `SeaORM` Entity, @generated manually

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: u64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub kind: String, // "info", "strategy", "trade", "royalty", "campaign"
    pub created_by: Option<i64>,
    pub created_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::notification_recipients::Entity")]
    NotificationRecipients,
}

impl Related<super::notification_recipients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NotificationRecipients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
