use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest};
use crate::services::auth_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// Identity extracted from the Authorization bearer token. Routes that take
/// this parameter reject unauthenticated requests with 401.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;
        let claims = state.jwt.verify(token)?;
        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    info!("POST /api/auth/register - Registering {}", input.username);
    let response = auth_service::register(&state.pool, &state.jwt, input).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    info!("POST /api/auth/login - Login attempt for {}", input.username);
    let response = auth_service::login(&state.pool, &state.jwt, input).await?;
    Ok(Json(response))
}

// Tokens are stateless; the client discards its copy. The endpoint exists
// so the frontend has something to call.
pub async fn logout(user: AuthUser) -> StatusCode {
    info!("POST /api/auth/logout - User {} logged out", user.user_id);
    StatusCode::NO_CONTENT
}
