use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde::Deserialize;

use crate::external::quote_provider::{Quote, QuoteProvider, QuoteProviderError};

const DEFAULT_BASE_URL: &str = "https://cloud.iexapis.com/stable";

/// IEX Cloud quote client. Needs IEX_API_KEY; IEX_BASE_URL can point at the
/// sandbox endpoint for manual testing.
pub struct IexProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl IexProvider {
    pub fn from_env() -> Result<Self, QuoteProviderError> {
        let api_key = std::env::var("IEX_API_KEY")
            .map_err(|_| QuoteProviderError::BadResponse("IEX_API_KEY not set".into()))?;
        let base_url =
            std::env::var("IEX_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
        })
    }
}

#[derive(Debug, Deserialize)]
struct IexQuoteResponse {
    symbol: String,
    #[serde(rename = "companyName")]
    company_name: String,
    #[serde(rename = "latestPrice")]
    latest_price: Option<f64>,
}

#[async_trait]
impl QuoteProvider for IexProvider {
    async fn lookup(&self, symbol: &str) -> Result<Quote, QuoteProviderError> {
        let url = format!("{}/stock/{}/quote", self.base_url, symbol);

        let resp = self
            .client
            .get(&url)
            .query(&[("token", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| QuoteProviderError::Network(e.to_string()))?;

        match resp.status().as_u16() {
            404 => return Err(QuoteProviderError::NotFound),
            429 => return Err(QuoteProviderError::RateLimited),
            s if s >= 400 => {
                return Err(QuoteProviderError::BadResponse(format!(
                    "IEX returned HTTP {}",
                    s
                )))
            }
            _ => {}
        }

        let body: IexQuoteResponse = resp
            .json()
            .await
            .map_err(|e| QuoteProviderError::Parse(e.to_string()))?;

        // IEX reports null latestPrice for symbols it knows but cannot price.
        let price = body
            .latest_price
            .ok_or(QuoteProviderError::NotFound)?;

        let price = price
            .to_string()
            .parse::<BigDecimal>()
            .map_err(|e| QuoteProviderError::Parse(e.to_string()))?;

        Ok(Quote {
            symbol: body.symbol,
            name: body.company_name,
            price,
        })
    }
}
