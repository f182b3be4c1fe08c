//! Converts expense costs into the reference currency.
use crate::core::currency::{CurrencyRateProvider, REFERENCE_CURRENCY, RateQuote};
use crate::core::expense::ExpenseRecord;
use anyhow::Result;
use futures::future::join_all;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// An expense together with its cost in the reference currency.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub record: ExpenseRecord,
    pub cost_in_reference_currency: f64,
    /// Set when the rate came from the static fallback table.
    pub approximate: bool,
}

impl NormalizedRow {
    /// Builds a row that is already in the reference currency.
    pub fn reference(record: ExpenseRecord) -> Self {
        let cost = record.cost();
        NormalizedRow {
            record,
            cost_in_reference_currency: cost,
            approximate: false,
        }
    }
}

pub struct Normalizer<'a> {
    provider: &'a (dyn CurrencyRateProvider + Send + Sync),
}

impl<'a> Normalizer<'a> {
    pub fn new(provider: &'a (dyn CurrencyRateProvider + Send + Sync)) -> Self {
        Normalizer { provider }
    }

    /// Normalizes every record to the reference currency.
    ///
    /// Each distinct foreign currency is looked up once per call. A record
    /// whose rate lookup fails is dropped from the output rather than
    /// zero-filled.
    pub async fn normalize(&self, records: &[ExpenseRecord]) -> Vec<NormalizedRow> {
        let currencies: BTreeSet<&str> = records
            .iter()
            .map(|r| r.currency())
            .filter(|c| *c != REFERENCE_CURRENCY)
            .collect();

        let quote_futures = currencies.into_iter().map(|currency| async move {
            let quote = self.provider.get_quote(currency, REFERENCE_CURRENCY).await;
            (currency, quote)
        });
        let quotes: HashMap<&str, Result<RateQuote>> =
            join_all(quote_futures).await.into_iter().collect();

        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            if record.currency() == REFERENCE_CURRENCY {
                rows.push(NormalizedRow::reference(record.clone()));
                continue;
            }

            match quotes.get(record.currency()) {
                Some(Ok(quote)) => rows.push(NormalizedRow {
                    record: record.clone(),
                    cost_in_reference_currency: record.cost() * quote.rate,
                    approximate: quote.is_approximate(),
                }),
                Some(Err(e)) => {
                    warn!(
                        category = record.category(),
                        date = %record.date_string(),
                        "Dropping expense, failed to convert {} to {}: {}",
                        record.currency(),
                        REFERENCE_CURRENCY,
                        e
                    );
                }
                None => {
                    warn!("No rate resolved for {}", record.currency());
                }
            }
        }

        debug!(
            "Normalized {} of {} expenses to {}",
            rows.len(),
            records.len(),
            REFERENCE_CURRENCY
        );
        rows
    }

    /// Converts a standalone amount, such as a monthly income, to the
    /// reference currency. Returns `None` when the rate lookup fails.
    pub async fn convert_amount(&self, amount: f64, currency: &str) -> Option<f64> {
        self.convert_amount_quoted(amount, currency)
            .await
            .map(|(value, _)| value)
    }

    /// Same as [`Normalizer::convert_amount`], also returning whether the rate
    /// came from the fallback table.
    pub async fn convert_amount_quoted(&self, amount: f64, currency: &str) -> Option<(f64, bool)> {
        if currency == REFERENCE_CURRENCY {
            return Some((amount, false));
        }

        match self.provider.get_quote(currency, REFERENCE_CURRENCY).await {
            Ok(quote) => Some((amount * quote.rate, quote.is_approximate())),
            Err(e) => {
                warn!(
                    "Failed to convert {amount} {currency} to {}: {e}",
                    REFERENCE_CURRENCY
                );
                None
            }
        }
    }
}
