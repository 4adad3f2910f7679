use rust_decimal::Decimal;
use sea_orm::prelude::DatabaseConnection;
use serde::Serialize;
use shared::entity::profiles;
use shared::Role;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::repositories::{ProfileRepository, RoyaltyRepository, WalletRepository};

#[derive(Debug, Serialize)]
pub struct WalletView {
    pub user_id: i64,
    pub balance: Decimal,
    pub total_earned: Decimal,
    pub royalty_count: u64,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

pub struct ProfileService {
    profiles: ProfileRepository,
    wallets: WalletRepository,
    royalties: RoyaltyRepository,
}

impl ProfileService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            profiles: ProfileRepository::new(db.clone()),
            wallets: WalletRepository::new(db.clone()),
            royalties: RoyaltyRepository::new(db),
        }
    }

    pub async fn find_profile(&self, user_id: i64) -> AppResult<Option<profiles::Model>> {
        Ok(self.profiles.find_by_id(user_id).await?)
    }

    /// Wallet balance; users without earnings get a zero wallet
    pub async fn wallet(&self, user_id: i64) -> AppResult<WalletView> {
        let wallet = self.wallets.find_by_user(user_id).await?;
        let royalty_count = self.royalties.count_for_creator(user_id).await?;
        Ok(match wallet {
            Some(w) => WalletView {
                user_id,
                balance: w.balance,
                total_earned: w.total_earned,
                royalty_count,
                updated_at: w.updated_at,
            },
            None => WalletView {
                user_id,
                balance: Decimal::ZERO,
                total_earned: Decimal::ZERO,
                royalty_count,
                updated_at: None,
            },
        })
    }

    pub async fn list_users(&self) -> AppResult<Vec<profiles::Model>> {
        Ok(self.profiles.list_all().await?)
    }

    pub async fn set_role(&self, admin_id: i64, user_id: i64, role: &str) -> AppResult<profiles::Model> {
        let role: Role = role.parse().map_err(|e: anyhow::Error| AppError::bad_request(e.to_string()))?;
        if admin_id == user_id && role != Role::Admin {
            return Err(AppError::bad_request("admins cannot remove their own admin role"));
        }
        let profile = self
            .profiles
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("user"))?;
        let profile = self.profiles.set_role(profile, role.as_str()).await?;
        tracing::info!(user_id, role = %role, changed_by = admin_id, "role updated");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use shared::entity::user_wallets;
    use std::collections::BTreeMap;

    fn count_row(n: i32) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::Int(Some(n)))])
    }

    #[tokio::test]
    async fn test_wallet_counts_royalties_without_loading_them() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([vec![user_wallets::Model {
                    id: 1,
                    user_id: 20,
                    balance: dec!(12.40),
                    total_earned: dec!(30.00),
                    updated_at: None,
                }]])
                .append_query_results([vec![count_row(3)]])
                .into_connection(),
        );
        let service = ProfileService::new(db.clone());
        let wallet = service.wallet(20).await.unwrap();
        assert_eq!(wallet.balance, dec!(12.40));
        assert_eq!(wallet.royalty_count, 3);

        drop(service);
        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        assert!(log[1].statements()[0].sql.contains("COUNT(*)"));
    }

    #[tokio::test]
    async fn test_wallet_defaults_to_zero() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([Vec::<user_wallets::Model>::new()])
            .append_query_results([vec![count_row(0)]])
            .into_connection();
        let wallet = ProfileService::new(Arc::new(db)).wallet(5).await.unwrap();
        assert_eq!(wallet.balance, Decimal::ZERO);
        assert_eq!(wallet.royalty_count, 0);
    }

    #[tokio::test]
    async fn test_admin_cannot_demote_self() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let err = ProfileService::new(Arc::new(db)).set_role(1, 1, "user").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
