pub mod api;
pub mod cli;
pub mod core;
pub mod store;

use anyhow::{Result, bail};
use clap::Subcommand;
use tracing::{debug, info};

use crate::api::ApiClient;
use crate::cli::ViewArgs;
use crate::cli::accounts::AccountsCommand;
use crate::cli::auth::{LoginArgs, SignupArgs};
use crate::cli::currency::CurrencyCommand;
use crate::cli::transactions::TransactionsCommand;
use crate::core::TransactionKind;
use crate::core::config::AppConfig;
use crate::store::{DiskSessionStore, SessionStore};

#[derive(Subcommand, Debug, Clone)]
pub enum AppCommand {
    /// Log in and remember the session
    Login(LoginArgs),
    /// Register a new user and log in
    Signup(SignupArgs),
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Income, expenses, balance and recent activity
    Dashboard(ViewArgs),
    /// Manage accounts
    Accounts {
        #[command(subcommand)]
        command: AccountsCommand,
    },
    /// Manage transactions
    Transactions {
        #[command(subcommand)]
        command: TransactionsCommand,
    },
    /// List income with its total
    Income(ViewArgs),
    /// List expenses with their total
    Expense(ViewArgs),
    /// Category breakdown and monthly trend
    Analytics(ViewArgs),
    /// Exchange rates and conversion
    Currency {
        #[command(subcommand)]
        command: CurrencyCommand,
    },
}

impl AppCommand {
    fn requires_session(&self) -> bool {
        !matches!(
            self,
            AppCommand::Login(_) | AppCommand::Signup(_) | AppCommand::Logout
        )
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Finance Tracker starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let store = DiskSessionStore::open(&config.data_dir()?)?;
    run_with_session(command, &config, &store).await
}

/// Runs `command` against the configured backend using `store` for the session token.
pub async fn run_with_session(
    command: AppCommand,
    config: &AppConfig,
    store: &dyn SessionStore,
) -> Result<()> {
    let client = ApiClient::new(&config.api.base_url)?;
    let client = if command.requires_session() {
        match store.load_token().await? {
            Some(token) => client.with_token(token),
            None => bail!("Not logged in. Run `fintrack login` first."),
        }
    } else {
        client
    };
    let currency = config.currency.as_str();

    match command {
        AppCommand::Login(args) => cli::auth::login(&client, store, args).await,
        AppCommand::Signup(args) => cli::auth::signup(&client, store, args).await,
        AppCommand::Logout => cli::auth::logout(store).await,
        AppCommand::Whoami => cli::auth::whoami(&client).await,
        AppCommand::Dashboard(view) => cli::dashboard::run(&client, &view, currency).await,
        AppCommand::Accounts { command } => cli::accounts::run(&client, command, currency).await,
        AppCommand::Transactions { command } => {
            cli::transactions::run(&client, command, currency).await
        }
        AppCommand::Income(view) => {
            cli::transactions::list(&client, Some(TransactionKind::Income), &view, currency).await
        }
        AppCommand::Expense(view) => {
            cli::transactions::list(&client, Some(TransactionKind::Expense), &view, currency).await
        }
        AppCommand::Analytics(view) => cli::analytics::run(&client, &view, currency).await,
        AppCommand::Currency { command } => cli::currency::run(&client, command).await,
    }
}
