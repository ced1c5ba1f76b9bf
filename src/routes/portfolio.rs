use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::PortfolioSnapshot;
use crate::routes::auth::AuthUser;
use crate::services::portfolio_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_portfolio))
}

pub async fn get_portfolio(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<PortfolioSnapshot>, AppError> {
    info!("GET /api/portfolio - Snapshot for user {}", user.user_id);
    let snapshot = portfolio_service::snapshot(
        &state.pool,
        state.quote_provider.as_ref(),
        user.user_id,
    )
    .await
    .map_err(|e| {
        error!("Failed to build portfolio snapshot for {}: {}", user.user_id, e);
        e
    })?;
    Ok(Json(snapshot))
}
