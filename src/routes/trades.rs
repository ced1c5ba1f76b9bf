use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::Transaction;
use crate::routes::auth::AuthUser;
use crate::services::trading_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/buy", post(buy))
        .route("/sell", post(sell))
        .route("/sellable", get(sellable))
}

#[derive(Debug, Deserialize)]
pub struct TradeRequest {
    pub symbol: String,
    pub shares: i64,
}

pub async fn buy(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<TradeRequest>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    info!(
        "POST /api/trades/buy - User {} buying {} {}",
        user.user_id, input.shares, input.symbol
    );
    if input.symbol.trim().is_empty() {
        return Err(AppError::Validation("missing symbol".to_string()));
    }

    let row = trading_service::buy(
        &state.pool,
        state.quote_provider.as_ref(),
        user.user_id,
        &input.symbol,
        input.shares,
    )
    .await
    .map_err(|e| {
        warn!("Buy rejected for user {}: {}", user.user_id, e);
        e
    })?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn sell(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<TradeRequest>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    info!(
        "POST /api/trades/sell - User {} selling {} {}",
        user.user_id, input.shares, input.symbol
    );
    if input.symbol.trim().is_empty() {
        return Err(AppError::Validation("missing symbol".to_string()));
    }

    let row = trading_service::sell(
        &state.pool,
        state.quote_provider.as_ref(),
        user.user_id,
        &input.symbol,
        input.shares,
    )
    .await
    .map_err(|e| {
        warn!("Sell rejected for user {}: {}", user.user_id, e);
        e
    })?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn sellable(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    info!("GET /api/trades/sellable - User {}", user.user_id);
    let symbols = trading_service::sellable_symbols(&state.pool, user.user_id).await?;
    Ok(Json(symbols))
}
