use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use anyhow::Result;
use std::time::Duration;
use tracing::info;

pub async fn get_db_connection(database_url: &str) -> Result<DatabaseConnection> {
    info!("Connecting to database via Sea-ORM");
    let mut options = ConnectOptions::new(database_url.to_string());
    options
        .max_connections(20)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    Ok(db)
}
