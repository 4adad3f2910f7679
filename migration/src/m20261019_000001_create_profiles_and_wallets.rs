use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Profiles::Id).big_integer().not_null().primary_key())
                    .col(ColumnDef::new(Profiles::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Profiles::DisplayName).text().null())
                    .col(ColumnDef::new(Profiles::Role).string_len(16).not_null().default("user")) // "user", "creator", "admin"
                    .col(ColumnDef::new(Profiles::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Profiles::CreatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(Profiles::UpdatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP")))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserWallets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserWallets::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(UserWallets::UserId).big_integer().not_null().unique_key())
                    .col(ColumnDef::new(UserWallets::Balance).decimal_len(20, 2).not_null().default(0.0))
                    .col(ColumnDef::new(UserWallets::TotalEarned).decimal_len(20, 2).not_null().default(0.0))
                    .col(ColumnDef::new(UserWallets::UpdatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP")))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_wallets_profile")
                            .from(UserWallets::Table, UserWallets::UserId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        // Credentials are stored encrypted; only the hint is ever returned
        manager
            .create_table(
                Table::create()
                    .table(BrokerConnections::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BrokerConnections::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(BrokerConnections::UserId).big_integer().not_null())
                    .col(ColumnDef::new(BrokerConnections::Broker).string().not_null())
                    .col(ColumnDef::new(BrokerConnections::AccountId).string().null())
                    .col(ColumnDef::new(BrokerConnections::ApiKeyEncrypted).text().not_null())
                    .col(ColumnDef::new(BrokerConnections::ApiSecretEncrypted).text().not_null())
                    .col(ColumnDef::new(BrokerConnections::ApiKeyHint).string_len(16).not_null())
                    .col(ColumnDef::new(BrokerConnections::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(BrokerConnections::LastConnectedAt).timestamp().null())
                    .col(ColumnDef::new(BrokerConnections::CreatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(BrokerConnections::UpdatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP")))
                    .index(
                        Index::create()
                            .name("idx_broker_connections_user_active")
                            .table(BrokerConnections::Table)
                            .col(BrokerConnections::UserId)
                            .col(BrokerConnections::IsActive)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_broker_connections_profile")
                            .from(BrokerConnections::Table, BrokerConnections::UserId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BrokerConnections::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserWallets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Profiles {
    Table,
    Id,
    Email,
    DisplayName,
    Role,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserWallets {
    Table,
    Id,
    UserId,
    Balance,
    TotalEarned,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BrokerConnections {
    Table,
    Id,
    UserId,
    Broker,
    AccountId,
    ApiKeyEncrypted,
    ApiSecretEncrypted,
    ApiKeyHint,
    IsActive,
    LastConnectedAt,
    CreatedAt,
    UpdatedAt,
}
