//! `SeaORM` Entity, @generated manually

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "broker_connections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: u64,
    pub user_id: i64,
    pub broker: String,
    pub account_id: Option<String>,
    #[serde(skip_serializing)]
    #[sea_orm(column_type = "Text")]
    pub api_key_encrypted: String,
    #[serde(skip_serializing)]
    #[sea_orm(column_type = "Text")]
    pub api_secret_encrypted: String,
    pub api_key_hint: String, // masked, e.g. "****abcd"
    pub is_active: bool,
    pub last_connected_at: Option<DateTimeUtc>,
    pub created_at: Option<DateTimeUtc>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::UserId",
        to = "super::profiles::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Profiles,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
