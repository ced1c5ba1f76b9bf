use std::collections::HashMap;

use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::external::quote_provider::{Quote, QuoteProvider, QuoteProviderError};

/// In-memory quote table for local runs (QUOTE_PROVIDER=mock) and tests.
/// Unknown symbols resolve to NotFound, matching the real provider.
pub struct MockProvider {
    quotes: HashMap<String, (String, BigDecimal)>,
    fail_all: bool,
}

impl MockProvider {
    pub fn new() -> Self {
        let mut provider = Self {
            quotes: HashMap::new(),
            fail_all: false,
        };
        provider.add("AAPL", "Apple Inc", "150.00");
        provider.add("MSFT", "Microsoft Corporation", "310.25");
        provider.add("NFLX", "Netflix Inc", "420.50");
        provider.add("TSLA", "Tesla Inc", "242.10");
        provider
    }

    pub fn empty() -> Self {
        Self {
            quotes: HashMap::new(),
            fail_all: false,
        }
    }

    /// Provider whose every lookup fails, for exercising outage paths.
    pub fn failing() -> Self {
        Self {
            quotes: HashMap::new(),
            fail_all: true,
        }
    }

    pub fn add(&mut self, symbol: &str, name: &str, price: &str) -> &mut Self {
        let price = price
            .parse::<BigDecimal>()
            .unwrap_or_else(|_| panic!("bad mock price for {}: {}", symbol, price));
        self.quotes
            .insert(symbol.to_uppercase(), (name.to_string(), price));
        self
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteProvider for MockProvider {
    async fn lookup(&self, symbol: &str) -> Result<Quote, QuoteProviderError> {
        if self.fail_all {
            return Err(QuoteProviderError::Network("mock outage".to_string()));
        }

        let key = symbol.trim().to_uppercase();
        match self.quotes.get(&key) {
            Some((name, price)) => Ok(Quote {
                symbol: key,
                name: name.clone(),
                price: price.clone(),
            }),
            None => Err(QuoteProviderError::NotFound),
        }
    }
}
