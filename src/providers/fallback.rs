use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, error};

use crate::core::currency::{CurrencyRateProvider, RateQuote, RateSource, fallback_rate};

/// Wraps a rate provider so lookups never fail: identical currencies resolve
/// to `1.0` and any provider error is replaced by the static fallback rate of
/// the target currency.
pub struct FallbackRateResolver<P> {
    inner: P,
}

impl<P: CurrencyRateProvider> FallbackRateResolver<P> {
    pub fn new(inner: P) -> Self {
        FallbackRateResolver { inner }
    }

    pub async fn resolve(&self, from: &str, to: &str) -> RateQuote {
        if from == to {
            debug!("No currency conversion needed for {from}");
            return RateQuote::live(from, to, 1.0);
        }

        match self.inner.get_rate(from, to).await {
            Ok(rate) => RateQuote::live(from, to, rate),
            Err(e) => {
                let rate = fallback_rate(to);
                error!(
                    "Failed to fetch exchange rate {from} -> {to}: {e}. Using fallback rate {rate}"
                );
                RateQuote {
                    from: from.to_string(),
                    to: to.to_string(),
                    rate,
                    source: RateSource::Fallback,
                }
            }
        }
    }
}

#[async_trait]
impl<P: CurrencyRateProvider> CurrencyRateProvider for FallbackRateResolver<P> {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
        Ok(self.resolve(from, to).await.rate)
    }

    async fn get_quote(&self, from: &str, to: &str) -> Result<RateQuote> {
        Ok(self.resolve(from, to).await)
    }
}
