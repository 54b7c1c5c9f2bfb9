use super::transactions::transactions_table;
use super::ui;
use crate::api::{self, ApiClient};
use crate::core::analytics;
use crate::core::currency::convert;
use crate::core::model::{AccountUpdate, BalanceResponse, NewAccount, TransferRequest};
use crate::core::{Account, RateTable, RateTableProvider};
use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use comfy_table::Cell;

/// Currencies offered when opening an account.
pub const ACCOUNT_CURRENCIES: [(&str, &str); 6] = [
    ("USD", "US Dollar"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("JPY", "Japanese Yen"),
    ("CAD", "Canadian Dollar"),
    ("VND", "Vietnamese Dong"),
];

#[derive(Subcommand, Debug, Clone)]
pub enum AccountsCommand {
    /// List accounts with balances converted to one currency
    List {
        /// Currency to display balances in (defaults to the configured currency)
        #[arg(long)]
        currency: Option<String>,
    },
    /// Open a new account
    Create(NewAccountArgs),
    /// Show one account
    Show { id: String },
    /// Show the current balance of an account
    Balance { id: String },
    /// Change the name, balance or currency of an account
    Update(AccountUpdateArgs),
    /// Move money between two accounts
    Transfer(TransferArgs),
    /// List the transactions of one account
    History {
        id: String,
        #[arg(long)]
        currency: Option<String>,
    },
    /// Delete an account
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct NewAccountArgs {
    #[arg(short, long)]
    pub name: String,
    /// Opening balance
    #[arg(short, long, allow_negative_numbers = true)]
    pub balance: f64,
    /// One of USD, EUR, GBP, JPY, CAD, VND
    #[arg(long, default_value = "USD")]
    pub currency: String,
}

#[derive(Args, Debug, Clone)]
pub struct AccountUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    pub balance: Option<f64>,
    #[arg(long)]
    pub currency: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct TransferArgs {
    #[arg(long)]
    pub from: String,
    #[arg(long)]
    pub to: String,
    #[arg(short, long)]
    pub amount: f64,
}

pub async fn run(
    client: &ApiClient,
    command: AccountsCommand,
    configured_currency: &str,
) -> Result<()> {
    match command {
        AccountsCommand::List { currency } => {
            let display_currency = currency
                .as_deref()
                .unwrap_or(configured_currency)
                .to_uppercase();
            list(client, &display_currency).await
        }
        AccountsCommand::Create(args) => create(client, args).await,
        AccountsCommand::Show { id } => show(client, &id).await,
        AccountsCommand::Balance { id } => balance(client, &id).await,
        AccountsCommand::Update(args) => update(client, args).await,
        AccountsCommand::Transfer(args) => transfer(client, args).await,
        AccountsCommand::History { id, currency } => {
            let display_currency = currency
                .as_deref()
                .unwrap_or(configured_currency)
                .to_uppercase();
            history(client, &id, &display_currency).await
        }
        AccountsCommand::Delete { id, yes } => delete(client, &id, yes).await,
    }
}

pub async fn list(client: &ApiClient, display_currency: &str) -> Result<()> {
    let pb = ui::new_spinner("Fetching accounts...");
    let result = futures::try_join!(client.list_accounts(), client.fetch_rates());
    pb.finish_and_clear();
    let (accounts, rates) = result.map_err(|e| api::fail(e, "Failed to load accounts"))?;

    println!("{}", render_accounts(&accounts, display_currency, &rates));
    Ok(())
}

pub(crate) fn render_accounts(
    accounts: &[Account],
    display_currency: &str,
    rates: &RateTable,
) -> String {
    let mut output = format!(
        "{} ({})\n\n",
        ui::style_text("Your Accounts", ui::StyleType::Title),
        accounts.len()
    );
    if accounts.is_empty() {
        output.push_str("No accounts yet. Create one with `fintrack accounts create`.");
        return output;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Name"),
        ui::header_cell("Currency"),
        ui::header_cell("Balance"),
        ui::header_cell(&format!("Balance ({display_currency})")),
        ui::header_cell("Id"),
    ]);
    for account in accounts {
        let converted = convert(account.balance, &account.currency, display_currency, rates);
        table.add_row(vec![
            Cell::new(&account.name),
            Cell::new(&account.currency),
            ui::money_cell(account.balance, &account.currency),
            ui::money_cell(converted, display_currency),
            Cell::new(&account.id),
        ]);
    }
    output.push_str(&table.to_string());

    let total = analytics::total_balance(accounts, display_currency, rates);
    output.push_str(&format!(
        "\n\nTotal Balance ({}): {}",
        ui::style_text(display_currency, ui::StyleType::TotalLabel),
        ui::style_total(total, display_currency)
    ));

    let mut codes: Vec<&str> = accounts
        .iter()
        .map(|a| a.currency.as_str())
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

/// Validates the account form and normalizes the currency code.
pub(crate) fn build_new_account(args: &NewAccountArgs) -> Result<NewAccount> {
    let name = args.name.trim();
    if name.is_empty() || !args.balance.is_finite() {
        bail!("Please fill in all required fields");
    }
    let currency = args.currency.trim().to_uppercase();
    validate_currency(&currency)?;
    Ok(NewAccount {
        name: name.to_string(),
        balance: args.balance,
        currency,
    })
}

fn validate_currency(currency: &str) -> Result<()> {
    if !ACCOUNT_CURRENCIES.iter().any(|(code, _)| *code == currency) {
        let supported: Vec<&str> = ACCOUNT_CURRENCIES.iter().map(|(code, _)| *code).collect();
        bail!(
            "Unsupported currency: {}. Choose one of {}",
            currency,
            supported.join(", ")
        );
    }
    Ok(())
}

pub async fn create(client: &ApiClient, args: NewAccountArgs) -> Result<()> {
    let payload = build_new_account(&args)?;
    client
        .create_account(&payload)
        .await
        .map_err(|e| api::fail(e, "Failed to create account"))?;
    println!(
        "{}",
        ui::style_text("Account created successfully!", ui::StyleType::Success)
    );
    Ok(())
}

pub async fn show(client: &ApiClient, id: &str) -> Result<()> {
    let account = client
        .get_account(id)
        .await
        .map_err(|e| api::fail(e, "Failed to load account"))?;

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Field"), ui::header_cell("Value")]);
    table.add_row(vec![Cell::new("Id"), Cell::new(&account.id)]);
    table.add_row(vec![Cell::new("Name"), Cell::new(&account.name)]);
    table.add_row(vec![Cell::new("Currency"), Cell::new(&account.currency)]);
    table.add_row(vec![
        Cell::new("Balance"),
        ui::money_cell(account.balance, &account.currency),
    ]);
    println!("{table}");
    Ok(())
}

pub async fn balance(client: &ApiClient, id: &str) -> Result<()> {
    let result = client
        .account_balance(id)
        .await
        .map_err(|e| api::fail(e, "Failed to load account balance"))?;
    let currency = match &result {
        BalanceResponse::Detailed {
            currency: Some(c), ..
        } => c.clone(),
        _ => String::new(),
    };
    let text = format!("{:.2} {}", result.balance(), currency);
    let style = if result.balance() >= 0.0 {
        ui::StyleType::TotalValue
    } else {
        ui::StyleType::Negative
    };
    println!("Balance: {}", ui::style_text(text.trim_end(), style));
    Ok(())
}

pub async fn update(client: &ApiClient, args: AccountUpdateArgs) -> Result<()> {
    let currency = args.currency.map(|c| c.trim().to_uppercase());
    if let Some(code) = &currency {
        validate_currency(code)?;
    }
    let update = AccountUpdate {
        name: args
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        balance: args.balance,
        currency,
    };
    if update.name.is_none() && update.balance.is_none() && update.currency.is_none() {
        bail!("Nothing to update");
    }

    client
        .update_account(&args.id, &update)
        .await
        .map_err(|e| api::fail(e, "Failed to update account"))?;
    println!(
        "{}",
        ui::style_text("Account updated successfully!", ui::StyleType::Success)
    );
    Ok(())
}

pub(crate) fn build_transfer(args: &TransferArgs) -> Result<TransferRequest> {
    if args.from.trim().is_empty() || args.to.trim().is_empty() {
        bail!("Please fill in all required fields");
    }
    if args.from == args.to {
        bail!("Source and destination accounts must be different");
    }
    if !args.amount.is_finite() || args.amount <= 0.0 {
        bail!("Transfer amount must be greater than zero");
    }
    Ok(TransferRequest {
        from_account_id: args.from.clone(),
        to_account_id: args.to.clone(),
        amount: args.amount,
    })
}

pub async fn transfer(client: &ApiClient, args: TransferArgs) -> Result<()> {
    let request = build_transfer(&args)?;
    let message = client
        .transfer(&request)
        .await
        .map_err(|e| api::fail(e, "Failed to transfer between accounts"))?;
    let text = message
        .message
        .unwrap_or_else(|| "Transfer completed successfully!".to_string());
    println!("{}", ui::style_text(&text, ui::StyleType::Success));
    Ok(())
}

pub async fn history(client: &ApiClient, id: &str, display_currency: &str) -> Result<()> {
    let pb = ui::new_spinner("Fetching account transactions...");
    let result = futures::try_join!(client.account_transactions(id), client.fetch_rates());
    pb.finish_and_clear();
    let (transactions, rates) =
        result.map_err(|e| api::fail(e, "Failed to load account transactions"))?;

    if transactions.is_empty() {
        println!("No transactions for this account.");
        return Ok(());
    }
    println!(
        "{}",
        transactions_table(&transactions, display_currency, &rates)
    );
    Ok(())
}

pub async fn delete(client: &ApiClient, id: &str, yes: bool) -> Result<()> {
    if !yes && !ui::confirm("Are you sure you want to delete this account?")? {
        println!("Cancelled.");
        return Ok(());
    }
    client
        .delete_account(id)
        .await
        .map_err(|e| api::fail(e, "Failed to delete account"))?;
    println!("{}", ui::style_text("Account deleted.", ui::StyleType::Success));
    Ok(())
}
