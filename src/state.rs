use std::sync::Arc;

use sqlx::PgPool;

use crate::external::quote_provider::QuoteProvider;
use crate::services::auth_service::JwtKeys;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub quote_provider: Arc<dyn QuoteProvider>,
    pub jwt: JwtKeys,
}
