use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde::Serialize;
use thiserror::Error;

/// A fresh market quote for a symbol. Prices are never cached by this
/// service; every lookup hits the provider.
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub price: BigDecimal,
}

#[derive(Debug, Error)]
pub enum QuoteProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("symbol not found")]
    NotFound,

    #[error("rate limited")]
    RateLimited,
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Look up the current {name, price} for a ticker symbol.
    /// Returns `NotFound` when the symbol does not resolve.
    async fn lookup(&self, symbol: &str) -> Result<Quote, QuoteProviderError>;
}
