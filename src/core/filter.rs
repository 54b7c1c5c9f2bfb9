//! Narrowing a transaction list to a day, month or year.

use anyhow::anyhow;
use chrono::{Datelike, NaiveDate, Utc};
use std::collections::BTreeSet;
use std::fmt::Display;
use std::str::FromStr;

use crate::core::model::Transaction;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    All,
    Day,
    Month,
    Year,
}

impl Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                FilterMode::All => "all",
                FilterMode::Day => "day",
                FilterMode::Month => "month",
                FilterMode::Year => "year",
            }
        )
    }
}

impl FromStr for FilterMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "day" => Ok(FilterMode::Day),
            "month" => Ok(FilterMode::Month),
            "year" => Ok(FilterMode::Year),
            _ => Err(anyhow!("Invalid filter: {}", s)),
        }
    }
}

/// The day, month and year pickers. Each mode reads only the fields it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSelection {
    pub date: NaiveDate,
    /// Zero-based, January is 0.
    pub month0: u32,
    pub year: i32,
}

impl FilterSelection {
    /// Today's date, month and year. Days are keyed in UTC, like transaction dates.
    pub fn current() -> Self {
        Self::for_date(Utc::now().date_naive())
    }

    pub fn for_date(date: NaiveDate) -> Self {
        FilterSelection {
            date,
            month0: date.month0(),
            year: date.year(),
        }
    }
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self::current()
    }
}

/// Keeps the transactions inside the selected window, in input order.
pub fn filter<'a>(
    transactions: &'a [Transaction],
    mode: FilterMode,
    selection: &FilterSelection,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|t| matches(t, mode, selection))
        .collect()
}

fn matches(transaction: &Transaction, mode: FilterMode, selection: &FilterSelection) -> bool {
    let day = transaction.day();
    match mode {
        FilterMode::All => true,
        FilterMode::Day => day == selection.date,
        FilterMode::Month => day.month0() == selection.month0 && day.year() == selection.year,
        FilterMode::Year => day.year() == selection.year,
    }
}

/// Distinct years present in `transactions`, newest first.
pub fn available_years(transactions: &[Transaction]) -> Vec<i32> {
    available_years_at(transactions, Utc::now().year())
}

/// Same as [`available_years`] with an explicit fallback year for empty input.
pub fn available_years_at(transactions: &[Transaction], current_year: i32) -> Vec<i32> {
    let years: BTreeSet<i32> = transactions.iter().map(|t| t.day().year()).collect();
    if years.is_empty() {
        return vec![current_year];
    }
    years.into_iter().rev().collect()
}

/// Human label for the active window, e.g. "March 2024".
pub fn describe(mode: FilterMode, selection: &FilterSelection) -> String {
    match mode {
        FilterMode::All => "All time".to_string(),
        FilterMode::Day => selection.date.format("%b %-d, %Y").to_string(),
        FilterMode::Month => {
            let month = MONTH_NAMES
                .get(selection.month0 as usize)
                .copied()
                .unwrap_or("Unknown month");
            format!("{} {}", month, selection.year)
        }
        FilterMode::Year => selection.year.to_string(),
    }
}
