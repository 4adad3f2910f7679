use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::body;
use crate::auth::CurrentUser;
use crate::error::AppResult;
use crate::response::ok;
use crate::services::strategy_service::{CreateStrategy, UpdateStrategy};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

/// Marketplace listing; open to anonymous callers
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> AppResult<impl IntoResponse> {
    let strategies = state.strategies.list_published(query.category.as_deref()).await?;
    Ok(ok(strategies))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<CreateStrategy>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let strategy = state.strategies.create(&user, body(payload)?).await?;
    Ok((StatusCode::CREATED, ok(strategy)))
}

pub async fn mine(State(state): State<Arc<AppState>>, user: CurrentUser) -> AppResult<impl IntoResponse> {
    Ok(ok(state.strategies.list_mine(&user).await?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> AppResult<impl IntoResponse> {
    Ok(ok(state.strategies.get(&user, id).await?))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<u64>,
    payload: Result<Json<UpdateStrategy>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    Ok(ok(state.strategies.update(&user, id, body(payload)?).await?))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> AppResult<impl IntoResponse> {
    let id = state.strategies.delete(&user, id).await?;
    Ok(ok(json!({ "id": id, "deleted": true })))
}

pub async fn preview(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> AppResult<impl IntoResponse> {
    Ok(ok(state.strategies.preview(&user, id).await?))
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> AppResult<impl IntoResponse> {
    Ok(ok(state.strategies.submit(&user, id).await?))
}

pub async fn archive(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> AppResult<impl IntoResponse> {
    Ok(ok(state.strategies.archive(&user, id).await?))
}

pub async fn copy(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> AppResult<impl IntoResponse> {
    Ok(ok(state.strategies.copy(&user, id).await?))
}

pub async fn follow(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> AppResult<impl IntoResponse> {
    Ok(ok(state.subscriptions.follow(&user, id).await?))
}

pub async fn unfollow(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> AppResult<impl IntoResponse> {
    Ok(ok(state.subscriptions.unfollow(&user, id).await?))
}

pub async fn subscriptions(State(state): State<Arc<AppState>>, user: CurrentUser) -> AppResult<impl IntoResponse> {
    Ok(ok(state.subscriptions.list(&user).await?))
}
