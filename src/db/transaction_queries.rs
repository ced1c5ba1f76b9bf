use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::{Holding, Transaction};

// The ledger is append-only: insert is the only write. Runs on a
// transaction's connection so it commits together with the cash update.
pub async fn insert(
    conn: &mut PgConnection,
    transaction: &Transaction,
) -> Result<Transaction, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(
        "INSERT INTO transactions (id, user_id, symbol, shares, price, side, executed_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id, user_id, symbol, shares, price, side, executed_at",
    )
    .bind(transaction.id)
    .bind(transaction.user_id)
    .bind(&transaction.symbol)
    .bind(transaction.shares)
    .bind(&transaction.price)
    .bind(&transaction.side)
    .bind(transaction.executed_at)
    .fetch_one(conn)
    .await
}

pub async fn fetch_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(
        "SELECT id, user_id, symbol, shares, price, side, executed_at
         FROM transactions
         WHERE user_id = $1
         ORDER BY executed_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

// SUM(bigint) comes back as NUMERIC, hence the cast.
pub async fn fetch_holdings(pool: &PgPool, user_id: Uuid) -> Result<Vec<Holding>, sqlx::Error> {
    sqlx::query_as::<_, Holding>(
        "SELECT symbol, SUM(shares)::BIGINT AS shares
         FROM transactions
         WHERE user_id = $1
         GROUP BY symbol
         HAVING SUM(shares) > 0
         ORDER BY symbol ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

// Derived holdings for one (user, symbol), read inside the trade
// transaction so a concurrent sell cannot double-spend shares.
pub async fn shares_for_symbol(
    conn: &mut PgConnection,
    user_id: Uuid,
    symbol: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(shares), 0)::BIGINT
         FROM transactions
         WHERE user_id = $1 AND symbol = $2",
    )
    .bind(user_id)
    .bind(symbol)
    .fetch_one(conn)
    .await
}
