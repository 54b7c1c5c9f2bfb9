//! Totals over a filtered, currency-converted set of transactions.
use crate::core::currency::{RateTable, convert};
use crate::core::model::{Account, Transaction, TransactionKind};
use chrono::Datelike;
use std::collections::BTreeMap;

/// Income, expense and their difference, in one display currency.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    pub net: f64,
}

/// Income and expense for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthTotals {
    /// Zero-based, January is 0.
    pub month0: u32,
    pub income: f64,
    pub expense: f64,
}

/// The transaction amount expressed in `display_currency`.
pub fn converted_amount(
    transaction: &Transaction,
    display_currency: &str,
    rates: &RateTable,
) -> f64 {
    convert(
        transaction.amount,
        transaction.currency(),
        display_currency,
        rates,
    )
}

pub fn total_by_kind<'a, I>(
    transactions: I,
    kind: TransactionKind,
    display_currency: &str,
    rates: &RateTable,
) -> f64
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|t| t.kind == kind)
        .map(|t| converted_amount(t, display_currency, rates))
        .sum()
}

pub fn category_totals<'a, I>(
    transactions: I,
    kind: TransactionKind,
    display_currency: &str,
    rates: &RateTable,
) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals = BTreeMap::new();
    for t in transactions.into_iter().filter(|t| t.kind == kind) {
        *totals.entry(t.category.clone()).or_insert(0.0) +=
            converted_amount(t, display_currency, rates);
    }
    totals
}

/// Transfers move money between the user's own accounts and count as neither side.
pub fn summarize<'a, I>(transactions: I, display_currency: &str, rates: &RateTable) -> Totals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals = Totals::default();
    for t in transactions {
        match t.kind {
            TransactionKind::Income => {
                totals.income += converted_amount(t, display_currency, rates)
            }
            TransactionKind::Expense => {
                totals.expense += converted_amount(t, display_currency, rates)
            }
            TransactionKind::Transfer => {}
        }
    }
    totals.net = totals.income - totals.expense;
    totals
}

pub fn total_balance(accounts: &[Account], display_currency: &str, rates: &RateTable) -> f64 {
    accounts
        .iter()
        .map(|a| convert(a.balance, &a.currency, display_currency, rates))
        .sum()
}

/// Twelve entries, one per month of `year`, months without activity included.
pub fn monthly_trend<'a, I>(
    transactions: I,
    year: i32,
    display_currency: &str,
    rates: &RateTable,
) -> Vec<MonthTotals>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut months: Vec<MonthTotals> = (0..12)
        .map(|month0| MonthTotals {
            month0,
            income: 0.0,
            expense: 0.0,
        })
        .collect();

    for t in transactions {
        let day = t.day();
        if day.year() != year {
            continue;
        }
        let slot = &mut months[day.month0() as usize];
        match t.kind {
            TransactionKind::Income => slot.income += converted_amount(t, display_currency, rates),
            TransactionKind::Expense => {
                slot.expense += converted_amount(t, display_currency, rates)
            }
            TransactionKind::Transfer => {}
        }
    }
    months
}

/// The `limit` newest transactions, newest first.
pub fn recent<'a, I>(transactions: I, limit: usize) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut sorted: Vec<&Transaction> = transactions.into_iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::{FilterMode, FilterSelection, filter};
    use crate::core::model::{AccountRef, parse_date};
    use std::collections::HashMap;

    fn tx(
        id: &str,
        kind: TransactionKind,
        amount: f64,
        category: &str,
        currency: Option<&str>,
        date: &str,
    ) -> Transaction {
        Transaction {
            id: id.to_string(),
            account: Some(AccountRef {
                id: "acc".to_string(),
                name: Some("Main".to_string()),
                currency: currency.map(str::to_string),
            }),
            to_account: None,
            amount,
            kind,
            category: category.to_string(),
            date: parse_date(date).unwrap(),
            description: None,
        }
    }

    fn rates() -> RateTable {
        RateTable {
            date: None,
            base_currency: "USD".to_string(),
            rates: HashMap::from([("USD".to_string(), 1.0), ("EUR".to_string(), 0.5)]),
        }
    }

    #[test]
    fn test_category_totals_sum_within_kind() {
        let txs = vec![
            tx("1", TransactionKind::Expense, 10.0, "Food", None, "2024-01-01"),
            tx("2", TransactionKind::Expense, 15.0, "Food", None, "2024-01-02"),
            tx("3", TransactionKind::Expense, 7.0, "Rent", None, "2024-01-03"),
            tx("4", TransactionKind::Income, 100.0, "Food", None, "2024-01-04"),
        ];
        let totals = category_totals(&txs, TransactionKind::Expense, "USD", &rates());
        assert_eq!(totals.get("Food"), Some(&25.0));
        assert_eq!(totals.get("Rent"), Some(&7.0));
        assert_eq!(totals.len(), 2);
    }

    #[test]
    fn test_summarize_converts_and_skips_transfers() {
        let txs = vec![
            tx("1", TransactionKind::Income, 100.0, "Salary", Some("USD"), "2024-01-01"),
            tx("2", TransactionKind::Expense, 10.0, "Food", Some("EUR"), "2024-01-02"),
            tx("3", TransactionKind::Transfer, 500.0, "Move", Some("USD"), "2024-01-03"),
        ];
        let totals = summarize(&txs, "USD", &rates());
        assert_eq!(totals.income, 100.0);
        assert_eq!(totals.expense, 20.0);
        assert_eq!(totals.net, 80.0);

        let in_eur = summarize(&txs, "EUR", &rates());
        assert_eq!(in_eur.income, 50.0);
        assert_eq!(in_eur.expense, 10.0);
    }

    #[test]
    fn test_totals_over_filtered_view() {
        let txs = vec![
            tx("1", TransactionKind::Expense, 10.0, "Food", None, "2024-01-15"),
            tx("2", TransactionKind::Expense, 20.0, "Food", None, "2024-02-01"),
            tx("3", TransactionKind::Expense, 40.0, "Food", None, "2023-12-31"),
        ];
        let selection = FilterSelection {
            date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            month0: 0,
            year: 2024,
        };
        let window = filter(&txs, FilterMode::Year, &selection);
        let total =
            total_by_kind(window.iter().copied(), TransactionKind::Expense, "USD", &rates());
        assert_eq!(total, 30.0);
    }

    #[test]
    fn test_total_balance_handles_negative_balances() {
        let accounts = vec![
            Account {
                id: "a".to_string(),
                name: "Checking".to_string(),
                balance: 200.0,
                currency: "USD".to_string(),
            },
            Account {
                id: "b".to_string(),
                name: "Card".to_string(),
                balance: -50.0,
                currency: "EUR".to_string(),
            },
        ];
        assert_eq!(total_balance(&accounts, "USD", &rates()), 100.0);
        assert_eq!(total_balance(&[], "USD", &rates()), 0.0);
    }

    #[test]
    fn test_monthly_trend_has_twelve_months() {
        let txs = vec![
            tx("1", TransactionKind::Income, 100.0, "Salary", None, "2024-01-31"),
            tx("2", TransactionKind::Expense, 30.0, "Food", None, "2024-03-02"),
            tx("3", TransactionKind::Expense, 99.0, "Food", None, "2023-03-02"),
        ];
        let trend = monthly_trend(&txs, 2024, "USD", &rates());
        assert_eq!(trend.len(), 12);
        assert_eq!(trend[0].income, 100.0);
        assert_eq!(trend[2].expense, 30.0);
        assert_eq!(trend[1].income + trend[1].expense, 0.0);
    }

    #[test]
    fn test_recent_orders_newest_first() {
        let txs = vec![
            tx("old", TransactionKind::Expense, 1.0, "x", None, "2023-01-01"),
            tx("new", TransactionKind::Expense, 1.0, "x", None, "2024-06-01"),
            tx("mid", TransactionKind::Expense, 1.0, "x", None, "2024-01-01"),
        ];
        let top = recent(&txs, 2);
        let ids: Vec<&str> = top.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid"]);
    }
}
