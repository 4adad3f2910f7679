pub mod admin;
pub mod broker_connections;
pub mod functions;
pub mod health;
pub mod notifications;
pub mod profile;
pub mod strategies;


use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use shared::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::auth::USER_ID_HEADER;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        // serverless functions
        .route("/functions/strategy-risk", post(functions::strategy_risk))
        .route("/functions/strategy-presets", post(functions::strategy_preset))
        .route("/functions/copy-trade", post(functions::copy_trade))
        .route("/functions/distribute-royalties", post(functions::distribute_royalties))
        .route("/functions/market-data/:symbol", get(functions::market_snapshot))
        .route("/functions/market-data/:symbol/options", get(functions::option_chain))
        // strategies
        .route("/api/strategies", get(strategies::list).post(strategies::create))
        .route("/api/strategies/mine", get(strategies::mine))
        .route(
            "/api/strategies/:id",
            get(strategies::get).patch(strategies::update).delete(strategies::remove),
        )
        .route("/api/strategies/:id/preview", get(strategies::preview))
        .route("/api/strategies/:id/submit", post(strategies::submit))
        .route("/api/strategies/:id/archive", post(strategies::archive))
        .route("/api/strategies/:id/copy", post(strategies::copy))
        .route(
            "/api/strategies/:id/follow",
            post(strategies::follow).delete(strategies::unfollow),
        )
        .route("/api/subscriptions", get(strategies::subscriptions))
        // account
        .route(
            "/api/broker-connections",
            get(broker_connections::list).post(broker_connections::connect),
        )
        .route("/api/broker-connections/:id", delete(broker_connections::disconnect))
        .route("/api/notifications", get(notifications::list))
        .route("/api/notifications/:id/read", post(notifications::mark_read))
        .route("/api/me", get(profile::me))
        .route("/api/wallet", get(profile::wallet))
        // admin
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/:id/role", patch(admin::set_role))
        .route("/admin/strategies/:id/review", post(admin::review))
        .route("/admin/notifications", post(admin::send_notification))
        .with_state(state)
}

pub fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            HeaderName::from_static(USER_ID_HEADER),
        ]);
    if config.cors_allow_all() {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    layer.allow_origin(origins)
}

/// JSON body with rejections reported in the standard error envelope
pub fn body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}
