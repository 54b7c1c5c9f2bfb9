use super::transactions::transactions_table;
use super::{ViewArgs, ui};
use crate::api::{self, ApiClient};
use crate::core::analytics;
use crate::core::filter;
use crate::core::{Account, RateTable, RateTableProvider, Transaction};
use anyhow::Result;
use tracing::debug;

const RECENT_LIMIT: usize = 5;

pub async fn run(client: &ApiClient, view: &ViewArgs, configured_currency: &str) -> Result<()> {
    let pb = ui::new_spinner("Loading dashboard...");
    let result = futures::try_join!(
        client.list_transactions(),
        client.fetch_rates(),
        client.list_accounts()
    );
    pb.finish_and_clear();
    let (transactions, rates, accounts) =
        result.map_err(|e| api::fail(e, "Failed to load dashboard"))?;
    debug!(
        transactions = transactions.len(),
        accounts = accounts.len(),
        "Dashboard data loaded"
    );

    let display_currency = view.display_currency(configured_currency);
    println!(
        "{}",
        render_dashboard(&transactions, &accounts, view, &display_currency, &rates)
    );
    Ok(())
}

pub(crate) fn render_dashboard(
    transactions: &[Transaction],
    accounts: &[Account],
    view: &ViewArgs,
    display_currency: &str,
    rates: &RateTable,
) -> String {
    let window = filter::filter(transactions, view.filter, &view.selection());
    let totals = analytics::summarize(window.iter().copied(), display_currency, rates);
    let balance = analytics::total_balance(accounts, display_currency, rates);

    let mut output = format!(
        "{} {}\n\n",
        ui::style_text("Dashboard", ui::StyleType::Title),
        ui::style_text(&view.label(), ui::StyleType::Subtle)
    );

    let mut cards = ui::new_styled_table();
    cards.set_header(vec![
        ui::header_cell("Total Income"),
        ui::header_cell("Total Expenses"),
        ui::header_cell("Net"),
        ui::header_cell("Total Balance"),
    ]);
    cards.add_row(vec![
        ui::money_cell(totals.income, display_currency),
        ui::money_cell(-totals.expense, display_currency),
        ui::money_cell(totals.net, display_currency),
        ui::money_cell(balance, display_currency),
    ]);
    output.push_str(&cards.to_string());

    output.push_str(&format!(
        "\n\n{}\n",
        ui::style_text("Recent Transactions", ui::StyleType::TotalLabel)
    ));
    let recent = analytics::recent(window.iter().copied(), RECENT_LIMIT);
    if recent.is_empty() {
        output.push_str("No transactions yet.");
    } else {
        output.push_str(
            &transactions_table(recent.iter().copied(), display_currency, rates).to_string(),
        );
    }

    let mut codes: Vec<&str> = window
        .iter()
        .map(|t| t.currency())
        .chain(accounts.iter().map(|a| a.currency.as_str()))
        .filter(|c| *c != display_currency)
        .collect();
    if !codes.is_empty() {
        codes.push(display_currency);
    }
    if let Some(note) = super::currency_note(rates, codes) {
        output.push('\n');
        output.push_str(&note);
    }
    output
}
