use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{auth, health, history, portfolio, quotes, trades};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/auth", auth::router())
        .nest("/api/quotes", quotes::router())
        .nest("/api/portfolio", portfolio::router())
        .nest("/api/trades", trades::router())
        .nest("/api/history", history::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
