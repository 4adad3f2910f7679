//! `SeaORM` Entity, @generated manually

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "strategy_subscriptions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: u64,
    pub subscriber_id: i64,
    pub strategy_id: u64,
    pub status: String, // "active", "cancelled"
    pub created_at: Option<DateTimeUtc>,
    pub cancelled_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
