use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::CurrentUser;
use crate::error::AppResult;
use crate::response::ok;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread: bool,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Query(query): Query<NotificationQuery>,
) -> AppResult<impl IntoResponse> {
    Ok(ok(state.notifications.list_for(user.id(), query.unread).await?))
}

pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> AppResult<impl IntoResponse> {
    Ok(ok(state.notifications.mark_read(user.id(), id).await?))
}
