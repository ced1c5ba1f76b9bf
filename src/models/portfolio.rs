use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Derived share count for one symbol, aggregated from the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Holding {
    pub symbol: String,
    pub shares: i64,
}

// One valued position in the snapshot: derived shares priced at the
// current live quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub shares: i64,
    pub name: String,
    pub price: BigDecimal,
    pub value: BigDecimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub positions: Vec<Position>,
    pub cash: BigDecimal,
    pub total: BigDecimal,
}
