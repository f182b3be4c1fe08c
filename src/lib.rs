pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::add::NewExpense;
use crate::core::config::AppConfig;
use crate::core::report::Income;
use crate::providers::{ExchangeRateApiProvider, FallbackRateResolver};
use crate::store::Ledger;
use anyhow::{Context, Result};
use tracing::{debug, info};

pub enum AppCommand {
    Add(NewExpense),
    List,
    Report { income: Option<Income> },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Expense tracker starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let ledger_path = config.ledger_path()?;
    let mut ledger = Ledger::load_with(&ledger_path, config.load_policy())
        .with_context(|| format!("Failed to load ledger from {}", ledger_path.display()))?;

    match command {
        AppCommand::Add(expense) => cli::add::run(&mut ledger, &expense),
        AppCommand::List => {
            cli::list::run(&ledger);
            Ok(())
        }
        AppCommand::Report { income } => {
            let currency_provider = FallbackRateResolver::new(ExchangeRateApiProvider::new(
                config.exchangerate_base_url(),
            ));
            let income = income.or(config.income);
            cli::report::run(&ledger, income.as_ref(), &currency_provider).await;
            Ok(())
        }
    }
}
