mod app;
mod db;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use crate::external::iex::IexProvider;
use crate::external::mock::MockProvider;
use crate::external::quote_provider::QuoteProvider;
use crate::services::auth_service::JwtKeys;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    logging::init_logging(logging::LoggingConfig::from_env())?;

    let database_url = std::env::var("DATABASE_URL")?;
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;
    sqlx::migrate!().run(&pool).await?;

    let jwt_secret = std::env::var("JWT_SECRET")?;
    let jwt = JwtKeys::from_secret(&jwt_secret);

    // QUOTE_PROVIDER selects the quote source (defaults to iex).
    let provider_name =
        std::env::var("QUOTE_PROVIDER").unwrap_or_else(|_| "iex".to_string());
    let provider: Arc<dyn QuoteProvider> = match provider_name.to_lowercase().as_str() {
        "iex" => {
            tracing::info!("📊 Using quote provider: IEX Cloud");
            Arc::new(
                IexProvider::from_env()
                    .expect("Failed to create IexProvider (check IEX_API_KEY)"),
            )
        }
        "mock" => {
            tracing::info!("📊 Using quote provider: mock (fixed quote table)");
            Arc::new(MockProvider::new())
        }
        _ => {
            panic!(
                "Invalid QUOTE_PROVIDER: {}. Must be 'iex' or 'mock'",
                provider_name
            );
        }
    };

    let state = AppState {
        pool,
        quote_provider: provider,
        jwt,
    };
    let app = app::create_app(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 papertrade backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
