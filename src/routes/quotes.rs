use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::external::quote_provider::Quote;
use crate::routes::auth::AuthUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:symbol", get(get_quote))
}

pub async fn get_quote(
    _user: AuthUser,
    Path(symbol): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Quote>, AppError> {
    info!("GET /api/quotes/{} - Looking up quote", symbol);
    let quote = state
        .quote_provider
        .lookup(&symbol)
        .await
        .map_err(|e| {
            error!("Quote lookup failed for {}: {}", symbol, e);
            AppError::from(e)
        })?;
    Ok(Json(quote))
}
