use axum::extract::State;
use axum::response::IntoResponse;
use std::sync::Arc;

use crate::auth::CurrentUser;
use crate::error::AppResult;
use crate::response::ok;
use crate::state::AppState;

pub async fn me(user: CurrentUser) -> AppResult<impl IntoResponse> {
    Ok(ok(user.profile))
}

pub async fn wallet(State(state): State<Arc<AppState>>, user: CurrentUser) -> AppResult<impl IntoResponse> {
    Ok(ok(state.profiles.wallet(user.id()).await?))
}
