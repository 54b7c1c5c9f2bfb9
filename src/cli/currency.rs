use super::ui;
use crate::api::currency::Conversion;
use crate::api::{self, ApiClient};
use crate::core::RateTable;
use anyhow::{Result, bail};
use clap::Subcommand;
use comfy_table::{Cell, CellAlignment};

#[derive(Subcommand, Debug, Clone)]
pub enum CurrencyCommand {
    /// Show the current exchange rate table
    Rates,
    /// Convert an amount on the server
    Convert {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        from: String,
        to: String,
    },
    /// List the currency codes the server knows
    Supported,
    /// Ask the server to refresh its rates
    Refresh,
}

pub async fn run(client: &ApiClient, command: CurrencyCommand) -> Result<()> {
    match command {
        CurrencyCommand::Rates => {
            let rates = client
                .rates()
                .await
                .map_err(|e| api::fail(e, "Failed to load exchange rates"))?;
            println!("{}", render_rates(&rates));
        }
        CurrencyCommand::Convert { amount, from, to } => {
            if !amount.is_finite() {
                bail!("Invalid amount: {amount}");
            }
            let conversion = client
                .convert_remote(amount, &from.to_uppercase(), &to.to_uppercase())
                .await
                .map_err(|e| api::fail(e, "Failed to convert currency"))?;
            println!("{}", render_conversion(&conversion));
        }
        CurrencyCommand::Supported => {
            let codes = client
                .supported_currencies()
                .await
                .map_err(|e| api::fail(e, "Failed to load supported currencies"))?;
            println!("{}", codes.join(", "));
        }
        CurrencyCommand::Refresh => {
            let rates = client
                .refresh_rates()
                .await
                .map_err(|e| api::fail(e, "Failed to refresh exchange rates"))?;
            println!(
                "{}",
                ui::style_text("Exchange rates refreshed.", ui::StyleType::Success)
            );
            println!("{}", render_rates(&rates));
        }
    }
    Ok(())
}

pub(crate) fn render_rates(rates: &RateTable) -> String {
    let mut codes: Vec<(&String, &f64)> = rates.rates.iter().collect();
    codes.sort_by(|a, b| a.0.cmp(b.0));

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell(&format!("Rate (per 1 {})", rates.base_currency)),
    ]);
    for (code, rate) in codes {
        table.add_row(vec![
            Cell::new(code),
            Cell::new(format!("{rate:.4}")).set_alignment(CellAlignment::Right),
        ]);
    }

    let mut output = format!(
        "{} {}\n\n",
        ui::style_text("Exchange Rates", ui::StyleType::Title),
        ui::style_text(&rates.base_currency, ui::StyleType::Subtle)
    );
    if let Some(date) = &rates.date {
        output.push_str(&format!("As of {date}\n"));
    }
    output.push_str(&table.to_string());
    output
}

fn render_conversion(conversion: &Conversion) -> String {
    format!(
        "{} = {} (rate {:.4})",
        ui::format_money(conversion.original_amount, &conversion.from_currency),
        ui::style_text(
            &ui::format_money(conversion.converted_amount, &conversion.to_currency),
            ui::StyleType::TotalValue
        ),
        conversion.rate
    )
}
