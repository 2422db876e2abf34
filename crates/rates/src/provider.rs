//! Exchange-rate sources.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use tripsplit_shared::config::RatesConfig;
use tripsplit_shared::types::Currency;

use crate::error::RateError;

/// Source of daily exchange rates.
///
/// Implementors must be `Send + Sync` so one provider can serve every request.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches how many units of `to` one unit of `from` bought on `date`.
    async fn fetch_rate(
        &self,
        from: Currency,
        to: Currency,
        date: NaiveDate,
    ) -> Result<Decimal, RateError>;

    /// Returns a name for this provider (used in logging).
    fn name(&self) -> &str {
        "RateProvider"
    }
}

/// Rate provider backed by a Frankfurter-style JSON API.
///
/// Requests `GET {base_url}/{date}?from={FROM}&to={TO}` and reads
/// `rates.{TO}` from the response body.
#[derive(Debug, Clone)]
pub struct HttpRateProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRateProvider {
    /// Creates a provider for `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RateError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// Creates a provider from the `rates` configuration section.
    pub fn from_config(config: &RatesConfig) -> Result<Self, RateError> {
        Self::new(&*config.base_url, Duration::from_secs(config.timeout_secs))
    }

    fn rate_url(&self, date: NaiveDate) -> String {
        format!("{}/{}", self.base_url, date.format("%Y-%m-%d"))
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    async fn fetch_rate(
        &self,
        from: Currency,
        to: Currency,
        date: NaiveDate,
    ) -> Result<Decimal, RateError> {
        let url = self.rate_url(date);
        tracing::debug!(%url, %from, %to, "Requesting exchange rate");

        let response = self
            .client
            .get(&url)
            .query(&[("from", from.code()), ("to", to.code())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateError::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        parse_rate_response(&body, from, to)
    }

    fn name(&self) -> &str {
        "HttpRateProvider"
    }
}

/// Reads `rates.{to}` from a rate API response.
///
/// The number is taken from its JSON text so no binary float is involved.
pub fn parse_rate_response(body: &Value, from: Currency, to: Currency) -> Result<Decimal, RateError> {
    let value = body
        .get("rates")
        .and_then(|rates| rates.get(to.code()))
        .ok_or(RateError::MissingRate { from, to })?;

    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_string(),
        other => return Err(RateError::Malformed(other.to_string())),
    };

    let rate = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| RateError::Malformed(text.clone()))?;

    if rate <= Decimal::ZERO {
        return Err(RateError::NonPositive(rate));
    }
    Ok(rate)
}
