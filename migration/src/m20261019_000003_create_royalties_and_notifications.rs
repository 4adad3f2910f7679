use sea_orm_migration::prelude::*;

use crate::m20261019_000001_create_profiles_and_wallets::Profiles;
use crate::m20261019_000002_create_strategies_and_trades::TradingStrategies;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RoyaltyDistributions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RoyaltyDistributions::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(RoyaltyDistributions::TradeId).big_unsigned().null())
                    .col(ColumnDef::new(RoyaltyDistributions::StrategyId).big_unsigned().not_null())
                    .col(ColumnDef::new(RoyaltyDistributions::CreatorId).big_integer().not_null())
                    .col(ColumnDef::new(RoyaltyDistributions::TraderId).big_integer().not_null())
                    .col(ColumnDef::new(RoyaltyDistributions::Profit).decimal_len(20, 2).not_null())
                    .col(ColumnDef::new(RoyaltyDistributions::CreatorRoyalty).decimal_len(20, 2).not_null())
                    .col(ColumnDef::new(RoyaltyDistributions::PlatformFee).decimal_len(20, 2).not_null())
                    .col(ColumnDef::new(RoyaltyDistributions::RoyaltyPct).decimal_len(6, 4).not_null())
                    .col(ColumnDef::new(RoyaltyDistributions::PlatformFeePct).decimal_len(6, 4).not_null())
                    .col(ColumnDef::new(RoyaltyDistributions::CreatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .index(
                        Index::create()
                            .name("idx_royalty_distributions_creator")
                            .table(RoyaltyDistributions::Table)
                            .col(RoyaltyDistributions::CreatorId)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_royalty_distributions_strategy")
                            .from(RoyaltyDistributions::Table, RoyaltyDistributions::StrategyId)
                            .to(TradingStrategies::Table, TradingStrategies::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_royalty_distributions_creator")
                            .from(RoyaltyDistributions::Table, RoyaltyDistributions::CreatorId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Notifications::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Message).text().not_null())
                    .col(ColumnDef::new(Notifications::Kind).string_len(16).not_null().default("info"))
                    .col(ColumnDef::new(Notifications::CreatedBy).big_integer().null())
                    .col(ColumnDef::new(Notifications::CreatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NotificationRecipients::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(NotificationRecipients::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(NotificationRecipients::NotificationId).big_unsigned().not_null())
                    .col(ColumnDef::new(NotificationRecipients::UserId).big_integer().not_null())
                    .col(ColumnDef::new(NotificationRecipients::IsRead).boolean().not_null().default(false))
                    .col(ColumnDef::new(NotificationRecipients::ReadAt).timestamp().null())
                    .col(ColumnDef::new(NotificationRecipients::CreatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .index(
                        Index::create()
                            .name("idx_notification_recipients_user_read")
                            .table(NotificationRecipients::Table)
                            .col(NotificationRecipients::UserId)
                            .col(NotificationRecipients::IsRead)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_recipients_notification")
                            .from(NotificationRecipients::Table, NotificationRecipients::NotificationId)
                            .to(Notifications::Table, Notifications::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NotificationRecipients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RoyaltyDistributions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RoyaltyDistributions {
    Table,
    Id,
    TradeId,
    StrategyId,
    CreatorId,
    TraderId,
    Profit,
    CreatorRoyalty,
    PlatformFee,
    RoyaltyPct,
    PlatformFeePct,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    Title,
    Message,
    Kind,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum NotificationRecipients {
    Table,
    Id,
    NotificationId,
    UserId,
    IsRead,
    ReadAt,
    CreatedAt,
}
