use sea_orm_migration::prelude::*;

use crate::m20261019_000001_create_profiles_and_wallets::Profiles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TradingStrategies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TradingStrategies::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(TradingStrategies::CreatorId).big_integer().not_null())
                    .col(ColumnDef::new(TradingStrategies::Title).string().not_null())
                    .col(ColumnDef::new(TradingStrategies::Description).text().null())
                    .col(ColumnDef::new(TradingStrategies::Category).string().not_null())
                    .col(ColumnDef::new(TradingStrategies::Config).json().not_null()) // legs + conditions
                    .col(ColumnDef::new(TradingStrategies::FeePercentage).decimal_len(5, 2).not_null().default(0.0))
                    .col(ColumnDef::new(TradingStrategies::IsPremium).boolean().not_null().default(false))
                    .col(ColumnDef::new(TradingStrategies::Status).string_len(32).not_null().default("draft"))
                    .col(ColumnDef::new(TradingStrategies::ReviewNotes).text().null())
                    .col(ColumnDef::new(TradingStrategies::ReviewedBy).big_integer().null())
                    .col(ColumnDef::new(TradingStrategies::PublishedAt).timestamp().null())
                    .col(ColumnDef::new(TradingStrategies::CreatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(TradingStrategies::UpdatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP")))
                    .index(
                        Index::create()
                            .name("idx_trading_strategies_status_category")
                            .table(TradingStrategies::Table)
                            .col(TradingStrategies::Status)
                            .col(TradingStrategies::Category)
                    )
                    .index(
                        Index::create()
                            .name("idx_trading_strategies_creator")
                            .table(TradingStrategies::Table)
                            .col(TradingStrategies::CreatorId)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trading_strategies_creator")
                            .from(TradingStrategies::Table, TradingStrategies::CreatorId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        // A user's copy of a published strategy
        manager
            .create_table(
                Table::create()
                    .table(UserStrategies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserStrategies::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(UserStrategies::UserId).big_integer().not_null())
                    .col(ColumnDef::new(UserStrategies::StrategyId).big_unsigned().not_null())
                    .col(ColumnDef::new(UserStrategies::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(UserStrategies::CreatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .index(
                        Index::create()
                            .name("uq_user_strategies_user_strategy")
                            .table(UserStrategies::Table)
                            .col(UserStrategies::UserId)
                            .col(UserStrategies::StrategyId)
                            .unique()
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_strategies_strategy")
                            .from(UserStrategies::Table, UserStrategies::StrategyId)
                            .to(TradingStrategies::Table, TradingStrategies::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StrategySubscriptions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(StrategySubscriptions::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(StrategySubscriptions::SubscriberId).big_integer().not_null())
                    .col(ColumnDef::new(StrategySubscriptions::StrategyId).big_unsigned().not_null())
                    .col(ColumnDef::new(StrategySubscriptions::Status).string_len(16).not_null().default("active"))
                    .col(ColumnDef::new(StrategySubscriptions::CreatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(StrategySubscriptions::CancelledAt).timestamp().null())
                    .index(
                        Index::create()
                            .name("idx_subscriptions_subscriber_strategy")
                            .table(StrategySubscriptions::Table)
                            .col(StrategySubscriptions::SubscriberId)
                            .col(StrategySubscriptions::StrategyId)
                    )
                    .to_owned(),
            )
            .await?;

        // One row per leg order; client_order_id makes retries idempotent
        manager
            .create_table(
                Table::create()
                    .table(IronCondorTrades::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(IronCondorTrades::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(IronCondorTrades::UserId).big_integer().not_null())
                    .col(ColumnDef::new(IronCondorTrades::UserStrategyId).big_unsigned().not_null())
                    .col(ColumnDef::new(IronCondorTrades::StrategyId).big_unsigned().not_null())
                    .col(ColumnDef::new(IronCondorTrades::RunId).string_len(64).not_null())
                    .col(ColumnDef::new(IronCondorTrades::LegIndex).integer().not_null())
                    .col(ColumnDef::new(IronCondorTrades::ClientOrderId).string().not_null().unique_key())
                    .col(ColumnDef::new(IronCondorTrades::BrokerOrderId).string().null())
                    .col(ColumnDef::new(IronCondorTrades::OptionType).string_len(8).not_null())
                    .col(ColumnDef::new(IronCondorTrades::Side).string_len(8).not_null())
                    .col(ColumnDef::new(IronCondorTrades::Strike).string().not_null())
                    .col(ColumnDef::new(IronCondorTrades::Expiration).string().not_null())
                    .col(ColumnDef::new(IronCondorTrades::Size).integer().not_null())
                    .col(ColumnDef::new(IronCondorTrades::FillPrice).decimal_len(20, 8).not_null())
                    .col(ColumnDef::new(IronCondorTrades::RealizedProfit).decimal_len(20, 8).null())
                    .col(ColumnDef::new(IronCondorTrades::Status).string_len(16).not_null()) // "filled", "failed"
                    .col(ColumnDef::new(IronCondorTrades::Error).text().null())
                    .col(ColumnDef::new(IronCondorTrades::CreatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .index(
                        Index::create()
                            .name("idx_iron_condor_trades_run")
                            .table(IronCondorTrades::Table)
                            .col(IronCondorTrades::UserStrategyId)
                            .col(IronCondorTrades::RunId)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_iron_condor_trades_user_strategy")
                            .from(IronCondorTrades::Table, IronCondorTrades::UserStrategyId)
                            .to(UserStrategies::Table, UserStrategies::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IronCondorTrades::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StrategySubscriptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserStrategies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TradingStrategies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TradingStrategies {
    Table,
    Id,
    CreatorId,
    Title,
    Description,
    Category,
    Config,
    FeePercentage,
    IsPremium,
    Status,
    ReviewNotes,
    ReviewedBy,
    PublishedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserStrategies {
    Table,
    Id,
    UserId,
    StrategyId,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum StrategySubscriptions {
    Table,
    Id,
    SubscriberId,
    StrategyId,
    Status,
    CreatedAt,
    CancelledAt,
}

#[derive(DeriveIden)]
enum IronCondorTrades {
    Table,
    Id,
    UserId,
    UserStrategyId,
    StrategyId,
    RunId,
    LegIndex,
    ClientOrderId,
    BrokerOrderId,
    OptionType,
    Side,
    Strike,
    Expiration,
    Size,
    FillPrice,
    RealizedProfit,
    Status,
    Error,
    CreatedAt,
}
