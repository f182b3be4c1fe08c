use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::currency::CurrencyRateProvider;

/// Rate provider backed by an ExchangeRate-API style service, which answers
/// `GET <base_url>/<from>` with every rate quoted against `from`.
pub struct ExchangeRateApiProvider {
    base_url: String,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    conversion_rates: Option<HashMap<String, f64>>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
}

#[async_trait]
impl CurrencyRateProvider for ExchangeRateApiProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self))]
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| anyhow!("Invalid rate service URL {}: {}", self.base_url, e))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Rate service URL {} cannot take a path", self.base_url))?
            .pop_if_empty()
            .push(from);
        debug!("Requesting exchange rates for {}", from);

        let client = reqwest::Client::builder().user_agent("xpense/1.0").build()?;
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for currency: {}", e, from))?;

        let status = response.status();
        let text = response.text().await?;
        let data: Option<LatestRatesResponse> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            let error_type = data
                .and_then(|d| d.error_type)
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(anyhow!(
                "HTTP error: {} for currency: {} ({})",
                status,
                from,
                error_type
            ));
        }

        let data = data.ok_or_else(|| anyhow!("Failed to parse JSON response for {}", from))?;
        let rates = data.conversion_rates.ok_or_else(|| {
            anyhow!(
                "No conversion rates in response for {}: {}",
                from,
                data.error_type.as_deref().unwrap_or("Unknown error")
            )
        })?;
        let rate = rates
            .get(to)
            .copied()
            .ok_or_else(|| anyhow!("Conversion rate for {} not found in response", to))?;

        debug!("Rate {from} -> {to}: {rate}");
        Ok(rate)
    }
}
