use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::db::transaction_queries;
use crate::errors::AppError;
use crate::models::Transaction;
use crate::routes::auth::AuthUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_history))
}

pub async fn list_history(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    info!("GET /api/history - Listing transactions for {}", user.user_id);

    let transactions = transaction_queries::fetch_by_user(&state.pool, user.user_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch transaction history: {}", e);
            AppError::Db(e)
        })?;

    Ok(Json(transactions))
}
