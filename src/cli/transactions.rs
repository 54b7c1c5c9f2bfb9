use super::{ViewArgs, ui};
use crate::api::{self, ApiClient};
use crate::core::analytics::{self, converted_amount};
use crate::core::filter;
use crate::core::model::{NewTransaction, TransactionUpdate};
use crate::core::{Account, RateTable, RateTableProvider, Transaction, TransactionKind};
use anyhow::{Result, anyhow, bail};
use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand};
use comfy_table::Cell;

#[derive(Subcommand, Debug, Clone)]
pub enum TransactionsCommand {
    /// List transactions in a time window
    List {
        /// Only show one type: income, expense or transfer
        #[arg(short, long)]
        kind: Option<TransactionKind>,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Record a new transaction
    Add(NewTransactionArgs),
    /// Show a single transaction
    Show { id: String },
    /// Change fields of a transaction
    Update(TransactionUpdateArgs),
    /// Delete a transaction
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct NewTransactionArgs {
    /// Type of transaction: income, expense or transfer
    #[arg(short, long, default_value = "income")]
    pub kind: TransactionKind,
    #[arg(short, long, allow_negative_numbers = true)]
    pub amount: f64,
    #[arg(long)]
    pub category: String,
    /// Source account id (defaults to your first account)
    #[arg(long)]
    pub account: Option<String>,
    /// Receiving account id, required for transfers
    #[arg(long)]
    pub to: Option<String>,
    /// Day of the transaction, YYYY-MM-DD (defaults to today)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct TransactionUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub kind: Option<TransactionKind>,
    #[arg(long, allow_negative_numbers = true)]
    pub amount: Option<f64>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub account: Option<String>,
    #[arg(long)]
    pub to: Option<String>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub description: Option<String>,
}

pub async fn run(
    client: &ApiClient,
    command: TransactionsCommand,
    configured_currency: &str,
) -> Result<()> {
    match command {
        TransactionsCommand::List { kind, view } => {
            list(client, kind, &view, configured_currency).await
        }
        TransactionsCommand::Add(args) => add(client, args).await,
        TransactionsCommand::Show { id } => show(client, &id).await,
        TransactionsCommand::Update(args) => update(client, args).await,
        TransactionsCommand::Delete { id, yes } => delete(client, &id, yes).await,
    }
}

/// Fetches all transactions and a fresh rate table together.
pub(crate) async fn fetch_with_rates(
    client: &ApiClient,
    fallback: &str,
) -> Result<(Vec<Transaction>, RateTable)> {
    let pb = ui::new_spinner("Fetching transactions...");
    let result = futures::try_join!(client.list_transactions(), client.fetch_rates());
    pb.finish_and_clear();
    result.map_err(|e| api::fail(e, fallback))
}

pub async fn list(
    client: &ApiClient,
    kind: Option<TransactionKind>,
    view: &ViewArgs,
    configured_currency: &str,
) -> Result<()> {
    let fallback = match kind {
        Some(TransactionKind::Income) => "Failed to load income",
        Some(TransactionKind::Expense) => "Failed to load expenses",
        _ => "Failed to load transactions",
    };
    let (transactions, rates) = fetch_with_rates(client, fallback).await?;
    let display_currency = view.display_currency(configured_currency);
    println!(
        "{}",
        render_list(&transactions, kind, view, &display_currency, &rates)
    );
    Ok(())
}

fn title_for(kind: Option<TransactionKind>) -> &'static str {
    match kind {
        Some(TransactionKind::Income) => "Your Income",
        Some(TransactionKind::Expense) => "Your Expenses",
        Some(TransactionKind::Transfer) => "Your Transfers",
        None => "Your Transactions",
    }
}

/// Renders the kind-filtered, time-filtered list with its totals.
pub(crate) fn render_list(
    transactions: &[Transaction],
    kind: Option<TransactionKind>,
    view: &ViewArgs,
    display_currency: &str,
    rates: &RateTable,
) -> String {
    let of_kind: Vec<Transaction> = match kind {
        Some(k) => transactions
            .iter()
            .filter(|t| t.kind == k)
            .cloned()
            .collect(),
        None => transactions.to_vec(),
    };
    let window = filter::filter(&of_kind, view.filter, &view.selection());

    let mut output = format!(
        "{} ({}) {}\n",
        ui::style_text(title_for(kind), ui::StyleType::Title),
        window.len(),
        ui::style_text(&view.label(), ui::StyleType::Subtle)
    );
    if view.filter != filter::FilterMode::All {
        output.push_str(&super::years_hint(&of_kind));
        output.push('\n');
    }
    output.push('\n');

    if window.is_empty() {
        output.push_str("No transactions found for the selected filter.");
        return output;
    }

    output.push_str(
        &transactions_table(window.iter().copied(), display_currency, rates).to_string(),
    );
    output.push_str("\n\n");

    match kind {
        Some(TransactionKind::Transfer) => {}
        Some(k) => {
            let total =
                analytics::total_by_kind(window.iter().copied(), k, display_currency, rates);
            output.push_str(&format!(
                "Total ({}): {}",
                ui::style_text(display_currency, ui::StyleType::TotalLabel),
                ui::style_total(total, display_currency)
            ));
        }
        None => {
            let totals = analytics::summarize(window.iter().copied(), display_currency, rates);
            output.push_str(&format!(
                "Income: {}  Expenses: {}  Net: {}",
                ui::style_total(totals.income, display_currency),
                ui::style_total(-totals.expense, display_currency),
                ui::style_total(totals.net, display_currency)
            ));
        }
    }

    if let Some(note) = super::missing_rates_note(rates, display_currency, window.iter().copied())
    {
        output.push('\n');
        output.push_str(&note);
    }
    output
}

/// Table of transactions with amounts in `display_currency`. The native
/// amount is shown alongside when the account uses a different currency.
pub(crate) fn transactions_table<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    display_currency: &str,
    rates: &RateTable,
) -> comfy_table::Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Type"),
        ui::header_cell("Category"),
        ui::header_cell("Account"),
        ui::header_cell("Description"),
        ui::header_cell(&format!("Amount ({display_currency})")),
        ui::header_cell("Original"),
        ui::header_cell("Id"),
    ]);

    for t in transactions {
        let converted = converted_amount(t, display_currency, rates);
        let original = (t.currency() != display_currency).then(|| (t.amount, t.currency()));
        table.add_row(vec![
            Cell::new(t.day().format("%b %-d, %Y")),
            ui::kind_cell(t.kind),
            Cell::new(&t.category),
            Cell::new(account_label(t)),
            ui::format_optional_cell(t.description.as_deref(), str::to_string),
            ui::kind_money_cell(converted, display_currency, t.kind),
            ui::format_optional_cell(original, |(amount, currency)| {
                ui::format_money(amount, currency)
            }),
            Cell::new(&t.id),
        ]);
    }
    table
}

fn account_label(t: &Transaction) -> String {
    let from = t.account.as_ref().map_or("N/A", |a| a.display_name());
    match (t.kind, &t.to_account) {
        (TransactionKind::Transfer, to) => {
            format!("{} → {}", from, to.as_ref().map_or("N/A", |a| a.display_name()))
        }
        _ => from.to_string(),
    }
}

pub async fn add(client: &ApiClient, args: NewTransactionArgs) -> Result<()> {
    let account_id = match &args.account {
        Some(id) => id.clone(),
        None => {
            let accounts = client
                .list_accounts()
                .await
                .map_err(|e| api::fail(e, "Failed to load accounts"))?;
            default_account(&accounts)?
        }
    };
    let payload = build_new_transaction(&args, account_id, Utc::now().date_naive())?;

    client
        .create_transaction(&payload)
        .await
        .map_err(|e| api::fail(e, "Failed to create transaction"))?;
    println!(
        "{}",
        ui::style_text("Transaction created successfully!", ui::StyleType::Success)
    );
    Ok(())
}

fn default_account(accounts: &[Account]) -> Result<String> {
    accounts
        .first()
        .map(|a| a.id.clone())
        .ok_or_else(|| anyhow!("You need to create an account first"))
}

/// Checks the form the same way the backend expects it filled.
pub(crate) fn build_new_transaction(
    args: &NewTransactionArgs,
    account_id: String,
    today: NaiveDate,
) -> Result<NewTransaction> {
    let category = args.category.trim();
    if account_id.trim().is_empty() || category.is_empty() || !args.amount.is_finite() {
        bail!("Please fill in all required fields");
    }

    let to_account_id = match args.kind {
        TransactionKind::Transfer => {
            let to = args
                .to
                .as_deref()
                .filter(|to| !to.trim().is_empty())
                .ok_or_else(|| anyhow!("Please select a receiving account for transfers"))?;
            if to == account_id {
                bail!("Source and destination accounts must be different");
            }
            Some(to.to_string())
        }
        _ => None,
    };

    Ok(NewTransaction {
        account_id,
        to_account_id,
        amount: args.amount,
        kind: args.kind,
        category: category.to_string(),
        date: args.date.unwrap_or(today).format("%Y-%m-%d").to_string(),
        description: args
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
    })
}

pub async fn show(client: &ApiClient, id: &str) -> Result<()> {
    let transaction = client
        .get_transaction(id)
        .await
        .map_err(|e| api::fail(e, "Failed to load transaction"))?;
    println!("{}", render_detail(&transaction));
    Ok(())
}

fn render_detail(t: &Transaction) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Field"), ui::header_cell("Value")]);
    table.add_row(vec![Cell::new("Id"), Cell::new(&t.id)]);
    table.add_row(vec![Cell::new("Type"), ui::kind_cell(t.kind)]);
    table.add_row(vec![
        Cell::new("Amount"),
        ui::kind_money_cell(t.amount, t.currency(), t.kind),
    ]);
    table.add_row(vec![Cell::new("Category"), Cell::new(&t.category)]);
    table.add_row(vec![Cell::new("Account"), Cell::new(account_label(t))]);
    table.add_row(vec![
        Cell::new("Date"),
        Cell::new(t.date.format("%Y-%m-%d %H:%M UTC")),
    ]);
    table.add_row(vec![
        Cell::new("Description"),
        ui::format_optional_cell(t.description.as_deref(), str::to_string),
    ]);
    table.to_string()
}

pub async fn update(client: &ApiClient, args: TransactionUpdateArgs) -> Result<()> {
    let update = TransactionUpdate {
        account_id: args.account,
        to_account_id: args.to,
        amount: args.amount,
        kind: args.kind,
        category: args.category,
        date: args.date.map(|d| d.format("%Y-%m-%d").to_string()),
        description: args.description,
    };
    if update.is_empty() {
        bail!("Nothing to update");
    }
    if update.account_id.is_some() && update.account_id == update.to_account_id {
        bail!("Source and destination accounts must be different");
    }

    client
        .update_transaction(&args.id, &update)
        .await
        .map_err(|e| api::fail(e, "Failed to update transaction"))?;
    println!(
        "{}",
        ui::style_text("Transaction updated successfully!", ui::StyleType::Success)
    );
    Ok(())
}

pub async fn delete(client: &ApiClient, id: &str, yes: bool) -> Result<()> {
    if !yes && !ui::confirm("Are you sure you want to delete this transaction?")? {
        println!("Cancelled.");
        return Ok(());
    }
    client
        .delete_transaction(id)
        .await
        .map_err(|e| api::fail(e, "Failed to delete transaction"))?;
    println!(
        "{}",
        ui::style_text("Transaction deleted.", ui::StyleType::Success)
    );
    Ok(())
}
