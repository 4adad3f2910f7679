//! `SeaORM` Entity, @generated manually

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub email: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub display_name: Option<String>,
    pub role: String, // "user", "creator", "admin"
    pub is_active: bool,
    pub created_at: Option<DateTimeUtc>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::trading_strategies::Entity")]
    TradingStrategies,
    #[sea_orm(has_one = "super::user_wallets::Entity")]
    UserWallets,
}

impl Related<super::trading_strategies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TradingStrategies.def()
    }
}

impl Related<super::user_wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserWallets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
