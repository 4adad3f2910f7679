//! `SeaORM` Entity, @generated manually

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "trading_strategies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: u64,
    pub creator_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub category: String,
    pub config: Json, // legs + conditions document
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub fee_percentage: Decimal,
    pub is_premium: bool,
    pub status: String, // "draft", "pending_review", "published", "rejected", "archived"
    #[sea_orm(column_type = "Text", nullable)]
    pub review_notes: Option<String>,
    pub reviewed_by: Option<i64>,
    pub published_at: Option<DateTimeUtc>,
    pub created_at: Option<DateTimeUtc>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::CreatorId",
        to = "super::profiles::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Profiles,
    #[sea_orm(has_many = "super::user_strategies::Entity")]
    UserStrategies,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profiles.def()
    }
}

impl Related<super::user_strategies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserStrategies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
