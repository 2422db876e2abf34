//! Daily rate caching using Moka.
//!
//! A published daily rate does not change, so each `(from, to, date)` triple
//! is fetched at most once per day per process. Failed fetches are not cached.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache;
use tripsplit_core::currency::ExchangeRate;
use tripsplit_shared::types::Currency;

use crate::error::RateError;
use crate::provider::RateProvider;

/// Default cache capacity (number of pair-day entries).
const DEFAULT_CACHE_CAPACITY: u64 = 256;

/// Time-to-live for cache entries (one day).
const DAY_TTL: Duration = Duration::from_secs(24 * 60 * 60);

type RateKey = (Currency, Currency, NaiveDate);

/// Cache of fetched rates keyed by currency pair and day.
#[derive(Clone)]
pub struct DailyRateCache {
    cache: Cache<RateKey, ExchangeRate>,
}

impl DailyRateCache {
    /// Creates a cache with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Creates a cache holding at most `max_capacity` rates.
    #[must_use]
    pub fn with_capacity(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(DAY_TTL)
            .build();
        Self { cache }
    }

    /// Returns the cached rate, if any.
    pub async fn get(&self, from: Currency, to: Currency, date: NaiveDate) -> Option<ExchangeRate> {
        self.cache.get(&(from, to, date)).await
    }

    /// Returns the cached rate or fetches it from `provider`.
    ///
    /// Concurrent callers for the same key share a single fetch.
    pub async fn get_or_fetch<P>(
        &self,
        provider: &P,
        from: Currency,
        to: Currency,
        date: NaiveDate,
    ) -> Result<ExchangeRate, Arc<RateError>>
    where
        P: RateProvider + ?Sized,
    {
        if let Some(rate) = self.get(from, to, date).await {
            tracing::debug!(%from, %to, %date, "Exchange rate cache hit");
            return Ok(rate);
        }

        self.cache
            .try_get_with((from, to, date), async {
                let rate = provider.fetch_rate(from, to, date).await?;
                ExchangeRate::new(from, to, rate, date).map_err(|_| RateError::NonPositive(rate))
            })
            .await
    }

    /// Removes every cached rate.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Returns the number of cached rates.
    ///
    /// Moka updates this lazily; call `run_pending_tasks` first for an exact count.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs pending cache maintenance.
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

impl Default for DailyRateCache {
    fn default() -> Self {
        Self::new()
    }
}
