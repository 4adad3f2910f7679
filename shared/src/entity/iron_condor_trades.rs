//! `SeaORM` Entity, @generated manually
//!
//! One row per leg order placed by a copy-trading run.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "iron_condor_trades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: u64,
    pub user_id: i64,
    pub user_strategy_id: u64,
    pub strategy_id: u64,
    pub run_id: String,
    pub leg_index: i32,
    #[sea_orm(unique)]
    pub client_order_id: String,
    pub broker_order_id: Option<String>,
    pub option_type: String, // "Call", "Put"
    pub side: String,        // "Buy", "Sell"
    pub strike: String,
    pub expiration: String,
    pub size: i32,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub fill_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))", nullable)]
    pub realized_profit: Option<Decimal>,
    pub status: String, // "filled", "failed"
    #[sea_orm(column_type = "Text", nullable)]
    pub error: Option<String>,
    pub created_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_strategies::Entity",
        from = "Column::UserStrategyId",
        to = "super::user_strategies::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    UserStrategies,
}

impl Related<super::user_strategies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserStrategies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
