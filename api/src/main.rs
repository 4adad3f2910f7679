use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use shared::{get_db_connection, get_redis_client, Config};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod auth;
mod error;
mod repositories;
mod response;
mod routes;
mod services;
mod state;

use state::AppState;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    info!("Starting Condor API server...");

    let config = Config::from_env()?;
    let db = get_db_connection(&config.database_url).await?;
    info!("Connected to database");

    if config.run_migrations {
        Migrator::up(&db, None).await?;
        info!("Migrations applied");
    }

    let redis = match config.redis_url.as_deref() {
        Some(url) => match get_redis_client(url) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("Redis unavailable, market data cache disabled: {}", e);
                None
            }
        },
        None => None,
    };

    let state = Arc::new(AppState::build(&config, db, redis)?);
    let app = routes::router(state)
        .layer(routes::cors_layer(&config))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.api_bind).await?;
    info!("API server listening on http://{}", config.api_bind);

    axum::serve(listener, app).await?;

    Ok(())
}
