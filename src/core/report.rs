//! Builds the full expense report from ledger records.
use crate::core::analytics::{self, MonthlyTotal, Statistics};
use crate::core::currency::CurrencyRateProvider;
use crate::core::expense::ExpenseRecord;
use crate::core::normalize::Normalizer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Monthly income in its own currency.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Income {
    pub amount: f64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub category_totals: BTreeMap<String, f64>,
    pub monthly_totals: Vec<MonthlyTotal>,
    pub statistics: Statistics,
    /// Monthly income in the reference currency, if set and convertible.
    pub monthly_income: Option<f64>,
    /// Records left out because their currency could not be converted.
    pub dropped: usize,
    /// Whether any figure relies on a fallback exchange rate.
    pub approximate: bool,
}

impl Report {
    /// True when no expense survived normalization.
    pub fn is_empty(&self) -> bool {
        self.monthly_totals.is_empty()
    }
}

pub async fn build_report(
    records: &[ExpenseRecord],
    income: Option<&Income>,
    currency_provider: &(dyn CurrencyRateProvider + Send + Sync),
) -> Report {
    let normalizer = Normalizer::new(currency_provider);
    let rows = normalizer.normalize(records).await;

    // Income as entered and in the reference currency; both unset when the
    // conversion fails.
    let (entered_income, converted_income) = match income {
        Some(income) => match normalizer
            .convert_amount_quoted(income.amount, &income.currency)
            .await
        {
            Some(converted) => (Some(income.amount), Some(converted)),
            None => {
                warn!(
                    "Monthly income of {} {} could not be converted, ignoring it",
                    income.amount, income.currency
                );
                (None, None)
            }
        },
        None => (None, None),
    };
    let monthly_income = converted_income.map(|(value, _)| value);
    let income_approximate = converted_income.is_some_and(|(_, approximate)| approximate);

    let report = Report {
        category_totals: analytics::category_totals(&rows),
        monthly_totals: analytics::monthly_totals(&rows),
        statistics: analytics::statistics(&rows, entered_income, monthly_income),
        monthly_income,
        dropped: records.len() - rows.len(),
        approximate: income_approximate || rows.iter().any(|r| r.approximate),
    };
    info!(
        expenses = rows.len(),
        dropped = report.dropped,
        "Report generated"
    );
    report
}
