use bigdecimal::BigDecimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::external::quote_provider::QuoteProvider;
use crate::models::{Side, Transaction};

pub fn validate_shares(shares: i64) -> Result<(), AppError> {
    if shares < 1 {
        return Err(AppError::Validation("invalid shares".to_string()));
    }
    Ok(())
}

pub fn trade_amount(price: &BigDecimal, shares: i64) -> BigDecimal {
    price * BigDecimal::from(shares)
}

pub fn check_affordable(cash: &BigDecimal, amount: &BigDecimal) -> Result<(), AppError> {
    if amount > cash {
        return Err(AppError::Validation("can't afford".to_string()));
    }
    Ok(())
}

pub fn check_sellable(held: i64, requested: i64) -> Result<(), AppError> {
    if held < 1 {
        return Err(AppError::Validation(
            "no such shares in your portfolio".to_string(),
        ));
    }
    if held < requested {
        return Err(AppError::Validation("not enough shares".to_string()));
    }
    Ok(())
}

/// Execute a buy: capture the live price, then deduct cash and append the
/// ledger row in one database transaction. The user row is locked for the
/// duration so two concurrent trades cannot both pass the funds check.
pub async fn buy(
    pool: &PgPool,
    provider: &dyn QuoteProvider,
    user_id: Uuid,
    symbol: &str,
    shares: i64,
) -> Result<Transaction, AppError> {
    validate_shares(shares)?;
    let quote = provider.lookup(symbol).await?;
    let amount = trade_amount(&quote.price, shares);

    let mut tx = pool.begin().await?;
    let cash = db::user_queries::cash_for_update(&mut tx, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;
    check_affordable(&cash, &amount)?;

    let balance = &cash - &amount;
    db::user_queries::set_cash(&mut tx, user_id, &balance).await?;
    let row = Transaction::new(user_id, quote.symbol, shares, quote.price, Side::Buy);
    let row = db::transaction_queries::insert(&mut tx, &row).await?;
    tx.commit().await?;

    info!(
        "User {} bought {} {} at {} (cash {} -> {})",
        user_id, shares, row.symbol, row.price, cash, balance
    );
    Ok(row)
}

/// Execute a sell: holdings are derived from the ledger inside the same
/// transaction that appends the negative row, so accepted sells can never
/// drive a (user, symbol) position below zero.
pub async fn sell(
    pool: &PgPool,
    provider: &dyn QuoteProvider,
    user_id: Uuid,
    symbol: &str,
    shares: i64,
) -> Result<Transaction, AppError> {
    validate_shares(shares)?;
    let quote = provider.lookup(symbol).await?;
    let amount = trade_amount(&quote.price, shares);

    let mut tx = pool.begin().await?;
    let cash = db::user_queries::cash_for_update(&mut tx, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;
    let held = db::transaction_queries::shares_for_symbol(&mut tx, user_id, &quote.symbol).await?;
    check_sellable(held, shares)?;

    let balance = &cash + &amount;
    db::user_queries::set_cash(&mut tx, user_id, &balance).await?;
    let row = Transaction::new(user_id, quote.symbol, -shares, quote.price, Side::Sell);
    let row = db::transaction_queries::insert(&mut tx, &row).await?;
    tx.commit().await?;

    info!(
        "User {} sold {} {} at {} (cash {} -> {})",
        user_id, shares, row.symbol, row.price, cash, balance
    );
    Ok(row)
}

/// Symbols the user currently holds, for the sell form.
pub async fn sellable_symbols(pool: &PgPool, user_id: Uuid) -> Result<Vec<String>, AppError> {
    let holdings = db::transaction_queries::fetch_holdings(pool, user_id).await?;
    Ok(holdings.into_iter().map(|h| h.symbol).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    #[test]
    fn zero_and_negative_share_counts_rejected() {
        assert!(validate_shares(0).is_err());
        assert!(validate_shares(-3).is_err());
        assert!(validate_shares(1).is_ok());
    }

    #[test]
    fn trade_amount_is_price_times_shares() {
        assert_eq!(trade_amount(&dec("150.00"), 3), dec("450.00"));
        assert_eq!(trade_amount(&dec("0.0001"), 10000), dec("1.0000"));
    }

    #[test]
    fn buy_beyond_cash_rejected() {
        let cash = dec("100.00");
        let err = check_affordable(&cash, &dec("100.01")).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "can't afford"));
    }

    #[test]
    fn buy_of_exact_cash_accepted() {
        assert!(check_affordable(&dec("100.00"), &dec("100.00")).is_ok());
    }

    #[test]
    fn selling_more_than_held_rejected() {
        let err = check_sellable(5, 6).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "not enough shares"));
    }

    #[test]
    fn selling_with_no_holdings_rejected() {
        let err = check_sellable(0, 1).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("portfolio")));
    }

    #[test]
    fn selling_exactly_held_accepted() {
        assert!(check_sellable(5, 5).is_ok());
    }
}
