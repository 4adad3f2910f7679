use axum::Json;
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "git_hash": env!("GIT_HASH"),
        "git_branch": env!("GIT_BRANCH"),
        "build_time": env!("BUILD_TIME"),
        "profile": env!("BUILD_PROFILE"),
    }))
}
