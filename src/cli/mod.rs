pub mod accounts;
pub mod analytics;
pub mod auth;
pub mod currency;
pub mod dashboard;
pub mod setup;
pub mod transactions;
pub mod ui;

use chrono::NaiveDate;
use clap::Args;

use crate::core::filter::{self, FilterMode, FilterSelection};
use crate::core::{RateTable, Transaction};

/// Time window and display currency shared by the list views.
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Time window: all, day, month or year
    #[arg(short, long, default_value = "all")]
    pub filter: FilterMode,

    /// Day to show with `--filter day` (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Month to show with `--filter month` (1-12, defaults to this month)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// Year for `--filter month` or `--filter year` (defaults to this year)
    #[arg(long)]
    pub year: Option<i32>,

    /// Currency to display totals in (defaults to the configured currency)
    #[arg(long)]
    pub currency: Option<String>,
}

impl ViewArgs {
    pub fn selection(&self) -> FilterSelection {
        self.selection_from(FilterSelection::current())
    }

    fn selection_from(&self, current: FilterSelection) -> FilterSelection {
        FilterSelection {
            date: self.date.unwrap_or(current.date),
            month0: self.month.map(|m| m - 1).unwrap_or(current.month0),
            year: self.year.unwrap_or(current.year),
        }
    }

    pub fn display_currency(&self, configured: &str) -> String {
        self.currency
            .as_deref()
            .unwrap_or(configured)
            .to_uppercase()
    }

    pub fn label(&self) -> String {
        filter::describe(self.filter, &self.selection())
    }
}

/// A dim footnote naming currencies that were converted at 1:1 for lack of a rate.
pub(crate) fn missing_rates_note<'a>(
    rates: &RateTable,
    display_currency: &str,
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Option<String> {
    let mut codes: Vec<&str> = transactions
        .into_iter()
        .map(|t| t.currency())
        .filter(|c| *c != display_currency)
        .collect();
    if !codes.is_empty() {
        codes.push(display_currency);
    }
    currency_note(rates, codes)
}

pub(crate) fn currency_note<'a>(
    rates: &RateTable,
    codes: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    let missing = rates.missing(codes);
    if missing.is_empty() {
        return None;
    }
    Some(ui::style_text(
        &format!(
            "No exchange rate for {}; converted 1:1 against {}.",
            missing.join(", "),
            rates.base_currency
        ),
        ui::StyleType::Subtle,
    ))
}

/// Line listing years with activity, like the year picker of the list views.
pub(crate) fn years_hint(transactions: &[Transaction]) -> String {
    let years: Vec<String> = filter::available_years(transactions)
        .iter()
        .map(|y| y.to_string())
        .collect();
    ui::style_text(
        &format!("Years with activity: {}", years.join(", ")),
        ui::StyleType::Subtle,
    )
}

/// Rendered output without terminal styling, for assertions.
#[cfg(test)]
pub(crate) fn plain(rendered: impl AsRef<str>) -> String {
    console::strip_ansi_codes(rendered.as_ref()).into_owned()
}
