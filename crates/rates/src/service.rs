//! Default-rate lookup for the expense form.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tripsplit_shared::config::RatesConfig;
use tripsplit_shared::types::Currency;

use crate::cache::DailyRateCache;
use crate::error::RateError;
use crate::provider::{HttpRateProvider, RateProvider};

/// Looks up the default rate for a currency pair and day.
///
/// Every failure is logged and reported as `None`; the caller then asks the
/// user for a manual rate.
#[derive(Clone)]
pub struct RateService {
    provider: Option<Arc<dyn RateProvider>>,
    cache: DailyRateCache,
}

impl RateService {
    /// Creates a service over `provider`.
    pub fn new(provider: Arc<dyn RateProvider>, cache: DailyRateCache) -> Self {
        Self {
            provider: Some(provider),
            cache,
        }
    }

    /// Creates a service that never fetches; only same-currency lookups succeed.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            provider: None,
            cache: DailyRateCache::new(),
        }
    }

    /// Creates the HTTP-backed service described by the `rates` section.
    pub fn from_config(config: &RatesConfig) -> Result<Self, RateError> {
        if !config.enabled {
            tracing::info!("Default exchange rates are disabled");
            return Ok(Self::disabled());
        }
        let provider = HttpRateProvider::from_config(config)?;
        Ok(Self::new(
            Arc::new(provider),
            DailyRateCache::with_capacity(config.cache_capacity),
        ))
    }

    /// Default rate from `from` to `to` on `date`, if one can be had.
    pub async fn default_rate(&self, from: Currency, to: Currency, date: NaiveDate) -> Option<Decimal> {
        if from == to {
            return Some(Decimal::ONE);
        }
        let provider = self.provider.as_deref()?;

        match self.cache.get_or_fetch(provider, from, to, date).await {
            Ok(rate) => Some(rate.rate),
            Err(err) => {
                tracing::warn!(
                    provider = provider.name(),
                    %from,
                    %to,
                    %date,
                    error = %err,
                    error_code = err.error_code(),
                    "Default exchange rate unavailable, manual rate required"
                );
                None
            }
        }
    }
}
