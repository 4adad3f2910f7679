use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

use super::body;
use crate::auth::CurrentUser;
use crate::error::AppResult;
use crate::response::ok;
use crate::services::notification_service::SendNotification;
use crate::services::strategy_service::ReviewDecision;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RoleChange {
    pub role: String,
}

pub async fn list_users(State(state): State<Arc<AppState>>, user: CurrentUser) -> AppResult<impl IntoResponse> {
    user.require_admin()?;
    Ok(ok(state.profiles.list_users().await?))
}

pub async fn set_role(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<i64>,
    payload: Result<Json<RoleChange>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    user.require_admin()?;
    let change = body(payload)?;
    Ok(ok(state.profiles.set_role(user.id(), id, &change.role).await?))
}

pub async fn review(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<u64>,
    payload: Result<Json<ReviewDecision>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    Ok(ok(state.strategies.review(&user, id, body(payload)?).await?))
}

pub async fn send_notification(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<SendNotification>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    user.require_admin()?;
    let notification = state.notifications.send(user.id(), body(payload)?).await?;
    Ok((StatusCode::CREATED, ok(notification)))
}
