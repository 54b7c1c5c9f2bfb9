//! Records exchanged with the finance backend.

use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use crate::core::currency::DEFAULT_CURRENCY;

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub balance: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// Reference from a transaction to an account. The backend sends either the
/// bare id or the populated account document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "AccountRefRepr")]
pub struct AccountRef {
    pub id: String,
    pub name: Option<String>,
    pub currency: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AccountRefRepr {
    Id(String),
    Populated {
        #[serde(rename = "_id")]
        id: String,
        name: Option<String>,
        currency: Option<String>,
    },
}

impl From<AccountRefRepr> for AccountRef {
    fn from(repr: AccountRefRepr) -> Self {
        match repr {
            AccountRefRepr::Id(id) => AccountRef {
                id,
                name: None,
                currency: None,
            },
            AccountRefRepr::Populated { id, name, currency } => AccountRef { id, name, currency },
        }
    }
}

impl AccountRef {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("N/A")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TransactionKind::Income => "income",
                TransactionKind::Expense => "expense",
                TransactionKind::Transfer => "transfer",
            }
        )
    }
}

impl FromStr for TransactionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            "transfer" => Ok(TransactionKind::Transfer),
            _ => Err(anyhow!("Invalid transaction type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "accountId", default)]
    pub account: Option<AccountRef>,
    #[serde(rename = "toAccountId", default)]
    pub to_account: Option<AccountRef>,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default)]
    pub category: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Transaction {
    /// Currency of the source account, `USD` when the backend did not say.
    pub fn currency(&self) -> &str {
        self.account
            .as_ref()
            .and_then(|a| a.currency.as_deref())
            .unwrap_or(DEFAULT_CURRENCY)
    }

    /// Calendar day of the transaction in UTC.
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }
}

/// Parses a backend date, either a full RFC 3339 timestamp or a bare day.
pub fn parse_date(value: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| anyhow!("Invalid date '{}': {}", value, e))?;
    day.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| anyhow!("Invalid date '{}'", value))
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAccount {
    pub name: String,
    pub balance: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AccountUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub from_account_id: String,
    pub to_account_id: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_account_id: Option<String>,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TransactionUpdate {
    pub fn is_empty(&self) -> bool {
        self.account_id.is_none()
            && self.to_account_id.is_none()
            && self.amount.is_none()
            && self.kind.is_none()
            && self.category.is_none()
            && self.date.is_none()
            && self.description.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthToken {
    pub token: String,
}

/// Generic `{ message }` acknowledgement returned by mutating endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Balance lookup. Older backends return just the number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BalanceResponse {
    Detailed {
        balance: f64,
        #[serde(default)]
        currency: Option<String>,
    },
    Bare(f64),
}

impl BalanceResponse {
    pub fn balance(&self) -> f64 {
        match self {
            BalanceResponse::Detailed { balance, .. } => *balance,
            BalanceResponse::Bare(balance) => *balance,
        }
    }
}
