use crate::core::REFERENCE_CURRENCY;
use crate::core::expense::DATE_FORMAT;
use crate::store::Ledger;
use anyhow::{Context, Result};
use tracing::info;

/// User input for a new expense. A missing date means today.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub category: String,
    pub cost: f64,
    pub note: String,
    pub date: Option<String>,
    pub currency: String,
    pub account: String,
}

impl NewExpense {
    pub fn new(category: &str, cost: f64) -> Self {
        NewExpense {
            category: category.to_string(),
            cost,
            note: String::new(),
            date: None,
            currency: REFERENCE_CURRENCY.to_string(),
            account: String::new(),
        }
    }
}

pub fn run(ledger: &mut Ledger, expense: &NewExpense) -> Result<()> {
    let date = expense
        .date
        .clone()
        .unwrap_or_else(|| chrono::Local::now().format(DATE_FORMAT).to_string());

    let record = ledger
        .add(
            &expense.category,
            expense.cost,
            &expense.note,
            &date,
            &expense.currency,
            &expense.account,
        )
        .context("Failed to add expense")?;

    info!(path = %ledger.path().display(), "Expense saved");
    println!(
        "Added {} {:.2} {} on {}",
        record.category(),
        record.cost(),
        record.currency(),
        record.date_string()
    );
    Ok(())
}
