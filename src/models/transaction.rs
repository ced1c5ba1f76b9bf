use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "Buy",
            Side::Sell => "Sell",
        }
    }
}

// One row of the append-only ledger. `shares` is signed: positive for a
// buy, negative for a sell. `price` is the execution-time snapshot and is
// never re-fetched.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub symbol: String,
    pub shares: i64,
    pub price: BigDecimal,
    pub side: String,
    pub executed_at: chrono::DateTime<chrono::Utc>,
}

impl Transaction {
    pub fn new(
        user_id: uuid::Uuid,
        symbol: String,
        shares: i64,
        price: BigDecimal,
        side: Side,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            user_id,
            symbol,
            shares,
            price,
            side: side.as_str().to_string(),
            executed_at: chrono::Utc::now(),
        }
    }
}
