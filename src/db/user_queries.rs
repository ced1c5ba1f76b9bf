use bigdecimal::BigDecimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::User;

pub async fn insert(pool: &PgPool, user: User) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (id, username, password_hash, cash, created_at)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, username, password_hash, cash, created_at",
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.password_hash)
    .bind(&user.cash)
    .bind(user.created_at)
    .fetch_one(pool)
    .await
}

pub async fn fetch_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, cash, created_at
         FROM users
         WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, cash, created_at
         FROM users
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
        .bind(username)
        .fetch_one(pool)
        .await
}

// Locks the user row for the rest of the enclosing transaction so that
// concurrent trades cannot interleave check-funds with deduct.
pub async fn cash_for_update(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<BigDecimal>, sqlx::Error> {
    sqlx::query_scalar::<_, BigDecimal>("SELECT cash FROM users WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn set_cash(
    conn: &mut PgConnection,
    id: Uuid,
    cash: &BigDecimal,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET cash = $1 WHERE id = $2")
        .bind(cash)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}
