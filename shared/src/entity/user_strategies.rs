//! `SeaORM` Entity, @generated manually
//!
//! A user's copy of a published strategy.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "user_strategies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: u64,
    pub user_id: i64,
    pub strategy_id: u64,
    pub is_active: bool,
    pub created_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::trading_strategies::Entity",
        from = "Column::StrategyId",
        to = "super::trading_strategies::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    TradingStrategies,
}

impl Related<super::trading_strategies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TradingStrategies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
