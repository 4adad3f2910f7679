use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use strategy_core::config::StrategyConfig;
use strategy_core::presets::{spread_width, PresetKind, QuotedStrike};

use super::body;
use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::response::ok;
use crate::services::copy_trading::CopyTradeRequest;
use crate::services::royalty_service::RoyaltyRequest;
use crate::services::strategy_service::RiskPreview;
use crate::state::AppState;

/// Risk metrics for an unsaved leg list, used by the builder
pub async fn strategy_risk(payload: Result<Json<Value>, JsonRejection>) -> AppResult<impl IntoResponse> {
    let config = StrategyConfig::from_json(&body(payload)?)?;
    Ok(ok(RiskPreview::for_legs(&config.legs)))
}

pub async fn copy_trade(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<CopyTradeRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.copy_trading.run(&user, body(payload)?).await?;
    let status = if outcome.is_partial() {
        StatusCode::MULTI_STATUS
    } else {
        StatusCode::OK
    };
    Ok((status, ok(outcome)))
}

pub async fn distribute_royalties(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<RoyaltyRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    user.require_admin()?;
    let receipt = state.royalties.distribute(body(payload)?).await?;
    Ok(ok(receipt))
}

pub async fn market_snapshot(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(symbol): Path<String>,
) -> AppResult<impl IntoResponse> {
    Ok(ok(state.market_data.snapshot(&symbol).await?))
}

#[derive(Debug, Deserialize)]
pub struct ChainQuery {
    pub expiration: Option<String>,
}

pub async fn option_chain(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(symbol): Path<String>,
    Query(query): Query<ChainQuery>,
) -> AppResult<impl IntoResponse> {
    let chain = state
        .market_data
        .option_chain(&symbol, query.expiration.as_deref())
        .await?;
    Ok(ok(chain))
}

#[derive(Debug, Deserialize)]
pub struct PresetRequest {
    pub kind: PresetKind,
    pub quotes: Vec<QuotedStrike>,
    pub expiration: String,
    #[serde(default = "default_preset_size")]
    pub size: u32,
    #[serde(default)]
    pub underlying: Option<String>,
}

fn default_preset_size() -> u32 {
    1
}

#[derive(Debug, Serialize)]
pub struct PresetResponse {
    pub kind: PresetKind,
    pub label: &'static str,
    pub category: &'static str,
    pub config: StrategyConfig,
    pub preview: RiskPreview,
    pub spread_width: Option<f64>,
}

/// Build one of the preset multi-leg strategies from quoted strikes
pub async fn strategy_preset(payload: Result<Json<PresetRequest>, JsonRejection>) -> AppResult<impl IntoResponse> {
    let request = body(payload)?;
    let mut config = request
        .kind
        .build(&request.quotes, &request.expiration, request.size.max(1))
        .ok_or_else(|| {
            AppError::bad_request(format!(
                "{} takes {} quotes",
                request.kind.label(),
                match request.kind {
                    PresetKind::IronCondor | PresetKind::IronButterfly => 4,
                    PresetKind::BullPutSpread | PresetKind::BearCallSpread => 2,
                }
            ))
        })?;
    if let Some(underlying) = request.underlying.filter(|u| !u.trim().is_empty()) {
        config = config.with_underlying(underlying.trim().to_uppercase());
    }
    Ok(ok(PresetResponse {
        kind: request.kind,
        label: request.kind.label(),
        category: request.kind.category(),
        preview: RiskPreview::for_legs(&config.legs),
        spread_width: spread_width(&config),
        config,
    }))
}
