pub use sea_orm_migration::prelude::*;

mod m20261019_000001_create_profiles_and_wallets;
mod m20261019_000002_create_strategies_and_trades;
mod m20261019_000003_create_royalties_and_notifications;
mod m20261020_000001_unique_royalty_trade;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261019_000001_create_profiles_and_wallets::Migration),
            Box::new(m20261019_000002_create_strategies_and_trades::Migration),
            Box::new(m20261019_000003_create_royalties_and_notifications::Migration),
            Box::new(m20261020_000001_unique_royalty_trade::Migration),
        ]
    }
}
