use super::transactions::fetch_with_rates;
use super::{ViewArgs, ui};
use crate::api::ApiClient;
use crate::core::analytics::{self, MonthTotals};
use crate::core::filter::{self, MONTH_NAMES};
use crate::core::{RateTable, Transaction, TransactionKind};
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};

pub async fn run(client: &ApiClient, view: &ViewArgs, configured_currency: &str) -> Result<()> {
    let (transactions, rates) = fetch_with_rates(client, "Failed to load analytics").await?;
    let display_currency = view.display_currency(configured_currency);
    println!(
        "{}",
        render_analytics(&transactions, view, &display_currency, &rates)
    );
    Ok(())
}

pub(crate) fn render_analytics(
    transactions: &[Transaction],
    view: &ViewArgs,
    display_currency: &str,
    rates: &RateTable,
) -> String {
    let selection = view.selection();
    let window = filter::filter(transactions, view.filter, &selection);
    let totals = analytics::summarize(window.iter().copied(), display_currency, rates);

    let mut output = format!(
        "{} {}\n\n",
        ui::style_text("Analytics", ui::StyleType::Title),
        ui::style_text(&view.label(), ui::StyleType::Subtle)
    );

    output.push_str(&format!(
        "{}\n",
        ui::style_text("Income vs Expenses", ui::StyleType::TotalLabel)
    ));
    let mut overview = ui::new_styled_table();
    overview.set_header(vec![
        ui::header_cell("Income"),
        ui::header_cell("Expenses"),
        ui::header_cell("Net"),
    ]);
    overview.add_row(vec![
        ui::money_cell(totals.income, display_currency),
        ui::money_cell(totals.expense, display_currency),
        ui::money_cell(totals.net, display_currency),
    ]);
    output.push_str(&overview.to_string());

    for (kind, title) in [
        (TransactionKind::Income, "Income by Category"),
        (TransactionKind::Expense, "Expenses by Category"),
    ] {
        output.push_str(&format!(
            "\n\n{}\n",
            ui::style_text(title, ui::StyleType::TotalLabel)
        ));
        let categories =
            analytics::category_totals(window.iter().copied(), kind, display_currency, rates);
        if categories.is_empty() {
            output.push_str("No data for the selected filter.");
        } else {
            output.push_str(&category_table(categories, display_currency).to_string());
        }
    }

    let trend = analytics::monthly_trend(transactions, selection.year, display_currency, rates);
    output.push_str(&format!(
        "\n\n{}\n",
        ui::style_text(
            &format!("Monthly Trend {}", selection.year),
            ui::StyleType::TotalLabel
        )
    ));
    output.push_str(&trend_table(&trend, display_currency).to_string());

    if let Some(note) = super::missing_rates_note(rates, display_currency, window.iter().copied())
    {
        output.push('\n');
        output.push_str(&note);
    }
    output
}

/// Categories sorted by amount, largest first, with their share of the kind's total.
fn category_table(
    categories: std::collections::BTreeMap<String, f64>,
    display_currency: &str,
) -> comfy_table::Table {
    let total: f64 = categories.values().sum();
    let mut rows: Vec<(String, f64)> = categories.into_iter().collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Category"),
        ui::header_cell(&format!("Amount ({display_currency})")),
        ui::header_cell("Share (%)"),
    ]);
    for (category, amount) in rows {
        let share = (total != 0.0).then(|| amount / total * 100.0);
        table.add_row(vec![
            Cell::new(category),
            ui::money_cell(amount, display_currency),
            ui::format_optional_cell(share, |s| format!("{s:.1}%"))
                .set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

fn trend_table(trend: &[MonthTotals], display_currency: &str) -> comfy_table::Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Month"),
        ui::header_cell(&format!("Income ({display_currency})")),
        ui::header_cell(&format!("Expenses ({display_currency})")),
        ui::header_cell("Net"),
    ]);
    for month in trend {
        table.add_row(vec![
            Cell::new(MONTH_NAMES[month.month0 as usize]),
            ui::money_cell(month.income, display_currency),
            ui::money_cell(month.expense, display_currency),
            ui::money_cell(month.income - month.expense, display_currency),
        ]);
    }
    table
}
