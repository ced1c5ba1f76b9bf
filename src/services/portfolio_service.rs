use bigdecimal::BigDecimal;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::external::quote_provider::{QuoteProvider, QuoteProviderError};
use crate::models::{Holding, PortfolioSnapshot, Position};

/// Price a set of derived holdings with live quotes. Positions come out
/// symbol-ascending when the holdings do (the query orders them). A failed
/// lookup for any held symbol fails the whole snapshot; a partially priced
/// portfolio is never returned.
pub async fn value_holdings(
    provider: &dyn QuoteProvider,
    holdings: Vec<Holding>,
    cash: BigDecimal,
) -> Result<PortfolioSnapshot, AppError> {
    let mut positions = Vec::with_capacity(holdings.len());
    let mut total = cash.clone();

    for holding in holdings {
        let quote = provider.lookup(&holding.symbol).await.map_err(|e| {
            error!("Quote lookup failed for held symbol {}: {}", holding.symbol, e);
            match e {
                // A held symbol the provider no longer knows is an outage
                // from the user's point of view, not bad input.
                QuoteProviderError::NotFound => AppError::External(format!(
                    "quote unavailable for held symbol {}",
                    holding.symbol
                )),
                other => AppError::from(other),
            }
        })?;

        let value = &quote.price * BigDecimal::from(holding.shares);
        total = total + &value;
        positions.push(Position {
            symbol: holding.symbol,
            shares: holding.shares,
            name: quote.name,
            price: quote.price,
            value,
        });
    }

    Ok(PortfolioSnapshot {
        positions,
        cash,
        total,
    })
}

pub async fn snapshot(
    pool: &PgPool,
    provider: &dyn QuoteProvider,
    user_id: Uuid,
) -> Result<PortfolioSnapshot, AppError> {
    let user = db::user_queries::fetch_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;
    let holdings = db::transaction_queries::fetch_holdings(pool, user_id).await?;
    value_holdings(provider, holdings, user.cash).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mock::MockProvider;

    fn dec(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    fn holdings(entries: &[(&str, i64)]) -> Vec<Holding> {
        entries
            .iter()
            .map(|(symbol, shares)| Holding {
                symbol: symbol.to_string(),
                shares: *shares,
            })
            .collect()
    }

    #[tokio::test]
    async fn total_is_cash_plus_priced_positions() {
        let provider = MockProvider::new();
        let snapshot = value_holdings(
            &provider,
            holdings(&[("AAPL", 2), ("MSFT", 1)]),
            dec("100.00"),
        )
        .await
        .unwrap();

        // 2 * 150.00 + 1 * 310.25 + 100.00
        assert_eq!(snapshot.total, dec("710.25"));
        assert_eq!(snapshot.cash, dec("100.00"));
        assert_eq!(snapshot.positions.len(), 2);
        assert_eq!(snapshot.positions[0].symbol, "AAPL");
        assert_eq!(snapshot.positions[0].value, dec("300.00"));
        assert_eq!(snapshot.positions[1].name, "Microsoft Corporation");
    }

    #[tokio::test]
    async fn empty_portfolio_totals_to_cash() {
        let provider = MockProvider::new();
        let snapshot = value_holdings(&provider, Vec::new(), dec("10000.00"))
            .await
            .unwrap();
        assert!(snapshot.positions.is_empty());
        assert_eq!(snapshot.total, dec("10000.00"));
    }

    #[tokio::test]
    async fn provider_outage_fails_whole_snapshot() {
        let provider = MockProvider::failing();
        let result = value_holdings(&provider, holdings(&[("AAPL", 1)]), dec("0")).await;
        assert!(matches!(result, Err(AppError::External(_))));
    }

    #[tokio::test]
    async fn unknown_held_symbol_is_external_not_validation() {
        let provider = MockProvider::empty();
        let result = value_holdings(&provider, holdings(&[("AAPL", 1)]), dec("0")).await;
        assert!(matches!(result, Err(AppError::External(msg)) if msg.contains("AAPL")));
    }
}
