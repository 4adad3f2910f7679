use sea_orm::prelude::DatabaseConnection;
use sea_orm::{ActiveValue, TransactionTrait};
use serde::{Deserialize, Serialize};
use shared::entity::broker_connections;
use shared::vault::mask;
use shared::CredentialVault;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::repositories::BrokerConnectionRepository;
use crate::services::copy_trading::BrokerGateway;

#[derive(Debug, Deserialize)]
pub struct ConnectBroker {
    pub broker: String,
    pub api_key: String,
    pub api_secret: String,
    #[serde(default)]
    pub account_id: Option<String>,
}

/// Decrypted credentials of an active connection
#[derive(Clone, PartialEq, Eq)]
pub struct BrokerCredentials {
    pub connection_id: u64,
    pub broker: String,
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for BrokerCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokerCredentials")
            .field("connection_id", &self.connection_id)
            .field("broker", &self.broker)
            .field("api_key", &mask(&self.api_key))
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub struct DisconnectResult {
    pub id: u64,
    pub disconnected: bool,
}

pub struct BrokerConnectionService {
    db: Arc<DatabaseConnection>,
    repo: BrokerConnectionRepository,
    vault: CredentialVault,
    broker: Arc<dyn BrokerGateway>,
}

impl BrokerConnectionService {
    pub fn new(db: Arc<DatabaseConnection>, vault: CredentialVault, broker: Arc<dyn BrokerGateway>) -> Self {
        Self {
            repo: BrokerConnectionRepository::new(db.clone()),
            db,
            vault,
            broker,
        }
    }

    /// Verify the credentials with the broker, then store them encrypted.
    /// Replaces any earlier active connection to the same broker.
    pub async fn connect(&self, user_id: i64, request: ConnectBroker) -> AppResult<broker_connections::Model> {
        let broker = request.broker.trim().to_lowercase();
        let api_key = request.api_key.trim();
        let api_secret = request.api_secret.trim();
        if broker.is_empty() || api_key.is_empty() || api_secret.is_empty() {
            return Err(AppError::bad_request("broker, api_key and api_secret are required"));
        }

        let session = self.broker.authenticate(api_key, api_secret).await?;
        let account_id = request
            .account_id
            .filter(|a| !a.trim().is_empty())
            .unwrap_or(session.account_id);

        let now = chrono::Utc::now();
        let active_model = broker_connections::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            broker: ActiveValue::Set(broker.clone()),
            account_id: ActiveValue::Set(Some(account_id)),
            api_key_encrypted: ActiveValue::Set(self.vault.encrypt(api_key)?),
            api_secret_encrypted: ActiveValue::Set(self.vault.encrypt(api_secret)?),
            api_key_hint: ActiveValue::Set(mask(api_key)),
            is_active: ActiveValue::Set(true),
            last_connected_at: ActiveValue::Set(Some(now)),
            created_at: ActiveValue::Set(Some(now)),
            updated_at: ActiveValue::Set(Some(now)),
            ..Default::default()
        };

        let txn = self.db.begin().await?;
        let replaced = BrokerConnectionRepository::deactivate_broker(&txn, user_id, &broker).await?;
        let connection = BrokerConnectionRepository::create(&txn, active_model).await?;
        txn.commit().await?;
        tracing::info!(user_id, broker = %broker, replaced, "broker connected");
        Ok(connection)
    }

    pub async fn list(&self, user_id: i64) -> AppResult<Vec<broker_connections::Model>> {
        Ok(self.repo.list_for_user(user_id).await?)
    }

    /// Removes the connection and its stored credentials
    pub async fn disconnect(&self, user_id: i64, connection_id: u64) -> AppResult<DisconnectResult> {
        let connection = self
            .repo
            .find_by_id(connection_id)
            .await?
            .filter(|c| c.user_id == user_id)
            .ok_or_else(|| AppError::not_found("broker connection"))?;
        let disconnected = self.repo.delete(connection.id).await?;
        tracing::info!(user_id, connection_id, "broker disconnected");
        Ok(DisconnectResult {
            id: connection_id,
            disconnected,
        })
    }

    pub async fn active_credentials(&self, user_id: i64) -> AppResult<Option<BrokerCredentials>> {
        let Some(connection) = self.repo.find_active(user_id).await? else {
            return Ok(None);
        };
        Ok(Some(BrokerCredentials {
            connection_id: connection.id,
            broker: connection.broker,
            api_key: self.vault.decrypt(&connection.api_key_encrypted)?,
            api_secret: self.vault.decrypt(&connection.api_secret_encrypted)?,
        }))
    }

    pub async fn mark_used(&self, connection_id: u64) -> AppResult<()> {
        Ok(self.repo.touch(connection_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use shared::{BrokerError, BrokerSession, OrderFill, OrderRequest};

    const API_KEY: &str = "AKIA-0000-abcdef";
    const API_SECRET: &str = "s3cr3t-value";

    struct FakeBroker;

    #[async_trait]
    impl BrokerGateway for FakeBroker {
        async fn authenticate(&self, api_key: &str, _api_secret: &str) -> Result<BrokerSession, BrokerError> {
            if api_key == "bad" {
                return Err(BrokerError::Rejected {
                    status: 401,
                    message: "invalid key".into(),
                });
            }
            Ok(BrokerSession {
                access_token: "token".into(),
                account_id: "ACC-1".into(),
            })
        }

        async fn place_order(&self, _session: &BrokerSession, _order: &OrderRequest) -> Result<OrderFill, BrokerError> {
            unreachable!("connect never places orders")
        }
    }

    fn service_on(db: Arc<DatabaseConnection>) -> BrokerConnectionService {
        let vault = CredentialVault::new("unit-test-secret").unwrap();
        BrokerConnectionService::new(db, vault, Arc::new(FakeBroker))
    }

    fn connection(user_id: i64) -> broker_connections::Model {
        broker_connections::Model {
            id: 8,
            user_id,
            broker: "tastytrade".into(),
            account_id: Some("ACC-1".into()),
            api_key_encrypted: "stored-key".into(),
            api_secret_encrypted: "stored-secret".into(),
            api_key_hint: mask(API_KEY),
            is_active: true,
            last_connected_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn request(api_key: &str) -> ConnectBroker {
        ConnectBroker {
            broker: " TastyTrade ".into(),
            api_key: api_key.into(),
            api_secret: API_SECRET.into(),
            account_id: None,
        }
    }

    #[tokio::test]
    async fn test_connect_replaces_previous_connection_in_one_transaction() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 8,
                        rows_affected: 1,
                    },
                ])
                .append_query_results([vec![connection(10)]])
                .into_connection(),
        );
        let service = service_on(db.clone());
        let stored = service.connect(10, request(API_KEY)).await.unwrap();
        assert_eq!(stored.api_key_hint, "****cdef");

        let body = serde_json::to_value(&stored).unwrap();
        assert!(body.get("api_key_encrypted").is_none());
        assert!(body.get("api_secret_encrypted").is_none());

        drop(service);
        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        assert_eq!(log.len(), 1);
        let statements = log[0].statements();
        assert!(statements[1].sql.starts_with("UPDATE `broker_connections`"), "{}", statements[1].sql);
        let insert = &statements[2];
        assert!(insert.sql.starts_with("INSERT INTO `broker_connections`"), "{}", insert.sql);
        assert_eq!(statements.last().unwrap().sql, "COMMIT");

        let values = format!("{:?}", insert.values);
        assert!(values.contains("\"tastytrade\""));
        assert!(values.contains("\"****cdef\""));
        assert!(!values.contains(API_KEY));
        assert!(!values.contains(API_SECRET));
    }

    #[tokio::test]
    async fn test_rejected_credentials_are_not_stored() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::MySql).into_connection());
        let service = service_on(db.clone());
        let err = service.connect(10, request("bad")).await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);

        drop(service);
        assert!(Arc::try_unwrap(db).unwrap().into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_connect_requires_every_field() {
        let service = service_on(Arc::new(MockDatabase::new(DatabaseBackend::MySql).into_connection()));
        let err = service.connect(10, request("  ")).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_disconnect_of_another_users_connection_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([vec![connection(99)]])
                .into_connection(),
        );
        let service = service_on(db.clone());
        let err = service.disconnect(10, 8).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        drop(service);
        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn test_disconnect_deletes_own_connection() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![connection(10)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let result = service_on(Arc::new(db)).disconnect(10, 8).await.unwrap();
        assert_eq!(result.id, 8);
        assert!(result.disconnected);
    }
}
