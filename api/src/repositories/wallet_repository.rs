use anyhow::Result;
use rust_decimal::Decimal;
use sea_orm::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue;
use shared::entity::user_wallets;
use std::sync::Arc;

pub struct WalletRepository {
    db: Arc<DatabaseConnection>,
}

impl WalletRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn find_by_user(&self, user_id: i64) -> Result<Option<user_wallets::Model>> {
        let wallet = user_wallets::Entity::find()
            .filter(user_wallets::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await?;
        Ok(wallet)
    }

    /// Add `amount` to balance and total earned, creating the wallet on first credit.
    /// Runs on any connection so callers can use it inside a transaction.
    pub async fn credit<C: ConnectionTrait>(conn: &C, user_id: i64, amount: Decimal) -> Result<()> {
        let result = user_wallets::Entity::update_many()
            .col_expr(
                user_wallets::Column::Balance,
                Expr::col(user_wallets::Column::Balance).add(amount),
            )
            .col_expr(
                user_wallets::Column::TotalEarned,
                Expr::col(user_wallets::Column::TotalEarned).add(amount),
            )
            .col_expr(user_wallets::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(user_wallets::Column::UserId.eq(user_id))
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            let wallet = user_wallets::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                balance: ActiveValue::Set(amount),
                total_earned: ActiveValue::Set(amount),
                updated_at: ActiveValue::Set(Some(chrono::Utc::now())),
                ..Default::default()
            };
            user_wallets::Entity::insert(wallet).exec(conn).await?;
        }
        Ok(())
    }
}
