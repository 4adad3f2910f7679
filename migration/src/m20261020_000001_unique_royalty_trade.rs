use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One distribution per copy-trade leg; manual payouts keep trade_id NULL
        manager
            .create_index(
                Index::create()
                    .name("uq_royalty_distributions_trade")
                    .table(RoyaltyDistributions::Table)
                    .col(RoyaltyDistributions::TradeId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("uq_royalty_distributions_trade")
                    .table(RoyaltyDistributions::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum RoyaltyDistributions {
    Table,
    TradeId,
}
