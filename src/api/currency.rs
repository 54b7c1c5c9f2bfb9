use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use super::ApiClient;
use crate::core::currency::{RateTable, RateTableProvider};

/// Server-side conversion of a single amount.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub original_amount: f64,
    pub from_currency: String,
    pub to_currency: String,
    pub converted_amount: f64,
    pub rate: f64,
}

#[derive(Deserialize)]
struct SupportedCurrencies {
    currencies: Vec<String>,
}

impl ApiClient {
    pub async fn rates(&self) -> Result<RateTable> {
        self.get("/api/currency/get-rates").await
    }

    pub async fn convert_remote(&self, amount: f64, from: &str, to: &str) -> Result<Conversion> {
        self.get_with_query(
            "/api/currency/convert",
            &[
                ("amount", amount.to_string()),
                ("fromCurrency", from.to_string()),
                ("toCurrency", to.to_string()),
            ],
        )
        .await
    }

    pub async fn supported_currencies(&self) -> Result<Vec<String>> {
        let supported: SupportedCurrencies = self.get("/api/currency/supported").await?;
        Ok(supported.currencies)
    }

    pub async fn refresh_rates(&self) -> Result<RateTable> {
        self.post_empty("/api/currency/refresh").await
    }
}

#[async_trait]
impl RateTableProvider for ApiClient {
    async fn fetch_rates(&self) -> Result<RateTable> {
        self.rates().await
    }
}
