//! `SeaORM` Entity, @generated manually
//!
//! Audit trail of every creator royalty paid out of a copy-trade profit.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "royalty_distributions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: u64,
    #[sea_orm(unique)]
    pub trade_id: Option<u64>,
    pub strategy_id: u64,
    pub creator_id: i64,
    pub trader_id: i64,
    #[sea_orm(column_type = "Decimal(Some((20, 2)))")]
    pub profit: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 2)))")]
    pub creator_royalty: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 2)))")]
    pub platform_fee: Decimal,
    #[sea_orm(column_type = "Decimal(Some((6, 4)))")]
    pub royalty_pct: Decimal,
    #[sea_orm(column_type = "Decimal(Some((6, 4)))")]
    pub platform_fee_pct: Decimal,
    pub created_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
