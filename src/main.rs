use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use xpense::cli::add::NewExpense;
use xpense::core::REFERENCE_CURRENCY;
use xpense::core::log::init_logging;
use xpense::core::report::Income;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for xpense::AppCommand {
    fn from(cmd: Commands) -> xpense::AppCommand {
        match cmd {
            Commands::Add {
                category,
                cost,
                note,
                date,
                currency,
                account,
            } => xpense::AppCommand::Add(NewExpense {
                category,
                cost,
                note,
                date,
                currency,
                account,
            }),
            Commands::List => xpense::AppCommand::List,
            Commands::Report {
                income,
                income_currency,
            } => xpense::AppCommand::Report {
                income: income.map(|amount| Income {
                    amount,
                    currency: income_currency,
                }),
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Record a new expense
    Add {
        /// Expense category, e.g. Food
        category: String,
        /// Amount spent, in the given currency
        cost: f64,
        /// Free text note
        #[arg(short, long, default_value = "")]
        note: String,
        /// Date as DD-MM-YYYY, defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Currency code such as EUR, USD, GBP or CHF
        #[arg(long, default_value = REFERENCE_CURRENCY)]
        currency: String,
        /// Account the expense was paid from
        #[arg(short, long, default_value = "")]
        account: String,
    },
    /// List all recorded expenses
    List,
    /// Display category, monthly and profit/loss summaries
    Report {
        /// Monthly income, overrides the configured income
        #[arg(short, long)]
        income: Option<f64>,
        /// Currency of the monthly income
        #[arg(long, default_value = REFERENCE_CURRENCY)]
        income_currency: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => xpense::cli::setup::setup(),
        Some(cmd) => xpense::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
