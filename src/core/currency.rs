//! Currency conversion through a shared rate table.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

/// Currency assumed for accounts and transactions that don't carry one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Point-in-time snapshot of rates against `base_currency`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTable {
    #[serde(default)]
    pub date: Option<String>,
    pub base_currency: String,
    #[serde(default)]
    pub rates: HashMap<String, f64>,
}

impl RateTable {
    /// Usable rate for `code`. Zero and NaN rates count as missing.
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates
            .get(code)
            .copied()
            .filter(|r| *r != 0.0 && !r.is_nan())
    }

    /// Codes from `codes` without a usable rate, deduplicated, in first-seen order.
    pub fn missing<'a, I>(&self, codes: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut missing: Vec<String> = Vec::new();
        for code in codes {
            if self.rate(code).is_none() && !missing.iter().any(|m| m == code) {
                missing.push(code.to_string());
            }
        }
        missing
    }
}

/// Converts `amount` from `from` to `to` via the table's base currency.
///
/// A missing rate on either side is replaced by `1`, so the amount passes
/// through unscaled on that side. Use [`try_convert`] to detect that case.
pub fn convert(amount: f64, from: &str, to: &str, table: &RateTable) -> f64 {
    if let Some(converted) = try_convert(amount, from, to, table) {
        return converted;
    }
    let from_rate = table.rate(from).unwrap_or_else(|| {
        warn!(currency = from, "No rate available, assuming 1");
        1.0
    });
    let to_rate = table.rate(to).unwrap_or_else(|| {
        warn!(currency = to, "No rate available, assuming 1");
        1.0
    });
    amount / from_rate * to_rate
}

/// Like [`convert`] but `None` when either currency has no usable rate.
pub fn try_convert(amount: f64, from: &str, to: &str, table: &RateTable) -> Option<f64> {
    if from == to {
        return Some(amount);
    }
    Some(amount / table.rate(from)? * table.rate(to)?)
}

#[async_trait]
pub trait RateTableProvider: Send + Sync {
    async fn fetch_rates(&self) -> Result<RateTable>;
}
