/// Ledger property tests.
///
/// The service derives holdings from an append-only ledger and keeps the
/// cash column as a materialized sum updated in the same transaction as
/// each insert. These tests replay buy/sell sequences through an in-memory
/// model of those rules and check the invariants the trade paths enforce:
///
/// - derived holdings never go negative after any accepted sell
/// - a rejected trade changes neither cash nor the ledger
/// - buy then sell of the same count at the same price restores cash
/// - portfolio total always equals cash + sum(shares * price)
///
/// NOTE: the database paths apply exactly these checks inside one
/// transaction per trade; full end-to-end coverage requires a running
/// Postgres and is exercised manually.

use std::collections::BTreeMap;

use bigdecimal::BigDecimal;

fn dec(s: &str) -> BigDecimal {
    s.parse().unwrap()
}

#[derive(Debug, Clone)]
struct LedgerRow {
    symbol: String,
    shares: i64,
    price: BigDecimal,
}

struct Account {
    cash: BigDecimal,
    ledger: Vec<LedgerRow>,
}

#[derive(Debug, PartialEq)]
enum Rejection {
    InvalidShares,
    CantAfford,
    NotEnoughShares,
}

impl Account {
    fn new(cash: &str) -> Self {
        Self {
            cash: dec(cash),
            ledger: Vec::new(),
        }
    }

    fn holdings(&self, symbol: &str) -> i64 {
        self.ledger
            .iter()
            .filter(|row| row.symbol == symbol)
            .map(|row| row.shares)
            .sum()
    }

    fn held_symbols(&self) -> BTreeMap<String, i64> {
        let mut map = BTreeMap::new();
        for row in &self.ledger {
            *map.entry(row.symbol.clone()).or_insert(0) += row.shares;
        }
        map.retain(|_, shares| *shares > 0);
        map
    }

    fn buy(&mut self, symbol: &str, shares: i64, price: &BigDecimal) -> Result<(), Rejection> {
        if shares < 1 {
            return Err(Rejection::InvalidShares);
        }
        let amount = price * BigDecimal::from(shares);
        if amount > self.cash {
            return Err(Rejection::CantAfford);
        }
        self.cash = &self.cash - &amount;
        self.ledger.push(LedgerRow {
            symbol: symbol.to_string(),
            shares,
            price: price.clone(),
        });
        Ok(())
    }

    fn sell(&mut self, symbol: &str, shares: i64, price: &BigDecimal) -> Result<(), Rejection> {
        if shares < 1 {
            return Err(Rejection::InvalidShares);
        }
        if self.holdings(symbol) < shares {
            return Err(Rejection::NotEnoughShares);
        }
        let amount = price * BigDecimal::from(shares);
        self.cash = &self.cash + &amount;
        self.ledger.push(LedgerRow {
            symbol: symbol.to_string(),
            shares: -shares,
            price: price.clone(),
        });
        Ok(())
    }

    fn total(&self, quotes: &BTreeMap<String, BigDecimal>) -> BigDecimal {
        let mut total = self.cash.clone();
        for (symbol, shares) in self.held_symbols() {
            let price = quotes.get(&symbol).expect("quote for held symbol");
            total = total + price * BigDecimal::from(shares);
        }
        total
    }
}

#[test]
fn buy_then_sell_restores_cash() {
    let mut account = Account::new("10000.00");
    let price = dec("150.00");

    account.buy("AAPL", 7, &price).unwrap();
    assert_eq!(account.cash, dec("8950.00"));
    account.sell("AAPL", 7, &price).unwrap();
    assert_eq!(account.cash, dec("10000.00"));
}

#[test]
fn holdings_never_negative_after_accepted_sells() {
    let mut account = Account::new("10000.00");
    let price = dec("10.00");

    account.buy("NFLX", 5, &price).unwrap();
    account.sell("NFLX", 3, &price).unwrap();
    account.sell("NFLX", 2, &price).unwrap();
    assert_eq!(account.holdings("NFLX"), 0);

    // Every further sell is rejected, so the sum can never dip below zero.
    assert_eq!(account.sell("NFLX", 1, &price), Err(Rejection::NotEnoughShares));
    assert_eq!(account.holdings("NFLX"), 0);
}

#[test]
fn overselling_is_rejected_and_writes_nothing() {
    let mut account = Account::new("10000.00");
    let price = dec("20.00");

    account.buy("TSLA", 5, &price).unwrap();
    let cash_before = account.cash.clone();
    let rows_before = account.ledger.len();

    assert_eq!(account.sell("TSLA", 6, &price), Err(Rejection::NotEnoughShares));
    assert_eq!(account.cash, cash_before);
    assert_eq!(account.ledger.len(), rows_before);
}

#[test]
fn buying_beyond_cash_is_rejected_and_cash_unchanged() {
    let mut account = Account::new("100.00");

    assert_eq!(
        account.buy("AAPL", 1, &dec("100.01")),
        Err(Rejection::CantAfford)
    );
    assert_eq!(account.cash, dec("100.00"));
    assert!(account.ledger.is_empty());

    // Spending exactly the balance is allowed.
    account.buy("AAPL", 1, &dec("100.00")).unwrap();
    assert_eq!(account.cash, dec("0.00"));
}

#[test]
fn non_positive_share_counts_rejected() {
    let mut account = Account::new("10000.00");
    assert_eq!(account.buy("AAPL", 0, &dec("1")), Err(Rejection::InvalidShares));
    assert_eq!(account.sell("AAPL", -2, &dec("1")), Err(Rejection::InvalidShares));
    assert!(account.ledger.is_empty());
}

#[test]
fn total_is_cash_plus_priced_holdings() {
    let mut account = Account::new("10000.00");
    account.buy("AAPL", 2, &dec("150.00")).unwrap();
    account.buy("MSFT", 3, &dec("300.00")).unwrap();
    account.sell("MSFT", 1, &dec("310.00")).unwrap();

    // Live prices differ from execution prices; the total reprices the
    // derived holdings at the live quotes.
    let quotes = BTreeMap::from([
        ("AAPL".to_string(), dec("155.00")),
        ("MSFT".to_string(), dec("305.00")),
    ]);

    // cash: 10000 - 300 - 900 + 310 = 9110
    // positions: 2 * 155 + 2 * 305 = 920
    assert_eq!(account.total(&quotes), dec("10030.00"));
}

#[test]
fn fully_sold_symbol_drops_out_of_holdings() {
    let mut account = Account::new("10000.00");
    let price = dec("50.00");

    account.buy("AAPL", 4, &price).unwrap();
    account.buy("MSFT", 1, &price).unwrap();
    account.sell("AAPL", 4, &price).unwrap();

    let held = account.held_symbols();
    assert!(!held.contains_key("AAPL"));
    assert_eq!(held.get("MSFT"), Some(&1));
}

#[test]
fn interleaved_sequence_keeps_cash_consistent_with_ledger() {
    let mut account = Account::new("10000.00");
    account.buy("AAPL", 3, &dec("100.00")).unwrap();
    account.sell("AAPL", 1, &dec("120.00")).unwrap();
    account.buy("NFLX", 2, &dec("400.00")).unwrap();
    account.sell("NFLX", 2, &dec("390.00")).unwrap();

    // Initial cash minus the signed sum of price * shares over the ledger.
    let spent: BigDecimal = account
        .ledger
        .iter()
        .map(|row| &row.price * BigDecimal::from(row.shares))
        .sum();
    assert_eq!(account.cash, dec("10000.00") - spent);
}
