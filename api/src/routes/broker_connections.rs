use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;

use super::body;
use crate::auth::CurrentUser;
use crate::error::AppResult;
use crate::response::ok;
use crate::services::broker_connection_service::ConnectBroker;
use crate::state::AppState;

pub async fn list(State(state): State<Arc<AppState>>, user: CurrentUser) -> AppResult<impl IntoResponse> {
    Ok(ok(state.broker_connections.list(user.id()).await?))
}

pub async fn connect(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<ConnectBroker>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let connection = state.broker_connections.connect(user.id(), body(payload)?).await?;
    Ok((StatusCode::CREATED, ok(connection)))
}

pub async fn disconnect(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> AppResult<impl IntoResponse> {
    Ok(ok(state.broker_connections.disconnect(user.id(), id).await?))
}
