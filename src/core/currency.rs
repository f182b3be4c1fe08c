//! Currency conversion abstractions

use anyhow::Result;
use async_trait::async_trait;

/// Currency every report is normalized to.
pub const REFERENCE_CURRENCY: &str = "EUR";

/// Static rates used when the remote service cannot answer, keyed by the
/// target currency.
pub const FALLBACK_RATES: [(&str, f64); 4] = [
    ("EUR", 1.0),
    ("USD", 0.8958),
    ("GBP", 0.8465),
    ("CHF", 0.9460),
];

/// Returns the fallback rate for `to`, or `1.0` for unknown codes.
pub fn fallback_rate(to: &str) -> f64 {
    FALLBACK_RATES
        .iter()
        .find(|(code, _)| *code == to)
        .map_or(1.0, |(_, rate)| *rate)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    Live,
    Fallback,
}

/// A single conversion rate between two currencies.
#[derive(Debug, Clone, PartialEq)]
pub struct RateQuote {
    pub from: String,
    pub to: String,
    pub rate: f64,
    pub source: RateSource,
}

impl RateQuote {
    pub fn live(from: &str, to: &str, rate: f64) -> Self {
        RateQuote {
            from: from.to_string(),
            to: to.to_string(),
            rate,
            source: RateSource::Live,
        }
    }

    pub fn is_approximate(&self) -> bool {
        self.source == RateSource::Fallback
    }
}

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64>;

    async fn get_quote(&self, from: &str, to: &str) -> Result<RateQuote> {
        let rate = self.get_rate(from, to).await?;
        Ok(RateQuote::live(from, to, rate))
    }
}
