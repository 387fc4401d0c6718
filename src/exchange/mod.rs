//! Currency exchange-rate collaborator.
//!
//! The projection never depends on the exchange rate: it is used only to
//! show costs in a second currency. The provider answers from a cached rate
//! while it is fresh, otherwise asks its [`RateSource`], falling back to the
//! last cached rate and finally to a configured default when the fetch fails.
//!
//! Storage is injected through [`KvStore`] so the cache can live in memory,
//! in a JSON file, or anywhere else a host provides.

pub mod store;

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use validator::Validate;

use crate::error::{ProjectionError, ProjectionResult};

pub use store::{JsonFileStore, KvStore, MemoryStore};

/// Exchange-rate cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ExchangeConfig {
    /// How long a cached rate stays fresh (seconds).
    #[validate(range(min = 1))]
    #[serde(default = "default_cache_duration")]
    pub cache_duration_secs: u64,
    /// Store key for the cached rate.
    #[validate(length(min = 1))]
    #[serde(default = "default_cache_key")]
    pub cache_key: String,
}

const fn default_cache_duration() -> u64 {
    24 * 60 * 60
}

fn default_cache_key() -> String {
    "exchangeRate".to_string()
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            cache_duration_secs: default_cache_duration(),
            cache_key: default_cache_key(),
        }
    }
}

impl ExchangeConfig {
    fn cache_duration_ms(&self) -> u64 {
        self.cache_duration_secs.saturating_mul(1000)
    }
}

/// Rate persisted in the store, stamped with when it was fetched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CachedRate {
    /// Target-currency units per source-currency unit.
    pub rate: f64,
    /// Fetch time, milliseconds since the Unix epoch.
    pub timestamp: u64,
}

/// Rate as seen by a host at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateQuote {
    /// Current best-known rate.
    pub rate: f64,
    /// True until the first refresh completes.
    pub is_loading: bool,
}

impl RateQuote {
    /// Convert an amount with this rate.
    #[must_use]
    pub fn convert(&self, amount: f64) -> f64 {
        amount * self.rate
    }
}

/// Somewhere a fresh rate can be fetched from.
pub trait RateSource {
    /// Fetch the current rate.
    ///
    /// # Errors
    ///
    /// Returns `RateUnavailable` (or an I/O error) when no rate can be had.
    fn fetch_rate(&mut self) -> ProjectionResult<f64>;
}

/// Source that always answers with the same rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRate(pub f64);

impl RateSource for FixedRate {
    fn fetch_rate(&mut self) -> ProjectionResult<f64> {
        Ok(self.0)
    }
}

/// Source for hosts without connectivity; every fetch fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSource;

impl RateSource for OfflineSource {
    fn fetch_rate(&mut self) -> ProjectionResult<f64> {
        Err(ProjectionError::rate_unavailable("offline"))
    }
}

/// Milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}

/// Cached, fallible exchange-rate provider.
#[derive(Debug)]
pub struct ExchangeRateProvider<S: KvStore, R: RateSource> {
    store: S,
    source: R,
    config: ExchangeConfig,
    default_rate: f64,
    quote: RateQuote,
}

impl<S: KvStore, R: RateSource> ExchangeRateProvider<S, R> {
    /// Create a provider; it quotes `default_rate` as loading until refreshed.
    #[must_use]
    pub const fn new(store: S, source: R, config: ExchangeConfig, default_rate: f64) -> Self {
        Self {
            store,
            source,
            config,
            default_rate,
            quote: RateQuote {
                rate: default_rate,
                is_loading: true,
            },
        }
    }

    /// Latest quote.
    #[must_use]
    pub const fn quote(&self) -> RateQuote {
        self.quote
    }

    /// Backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Refresh against the system clock.
    pub fn refresh(&mut self) -> RateQuote {
        self.refresh_at(now_millis())
    }

    /// Refresh as if the current time were `now_ms`.
    ///
    /// Order: fresh cache, then the source, then a stale cache, then the
    /// default. Never fails; failures are logged and fall through.
    pub fn refresh_at(&mut self, now_ms: u64) -> RateQuote {
        let cached = self.read_cache();

        if let Some(entry) = cached {
            let age = now_ms.saturating_sub(entry.timestamp);
            if age < self.config.cache_duration_ms() {
                debug!(rate = entry.rate, age_ms = age, "exchange rate cache hit");
                return self.settle(entry.rate);
            }
            debug!(age_ms = age, "exchange rate cache stale");
        }

        match self.fetch_valid() {
            Ok(rate) => {
                let entry = CachedRate {
                    rate,
                    timestamp: now_ms,
                };
                if let Err(e) = self.write_cache(&entry) {
                    warn!(error = %e, "failed to cache exchange rate");
                }
                self.settle(rate)
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch exchange rate");
                let rate = cached.map_or(self.quote.rate, |entry| entry.rate);
                self.settle(rate)
            }
        }
    }

    /// Use an explicitly supplied rate, bypassing cache and source.
    ///
    /// The rate is written to the store so later offline refreshes find it.
    ///
    /// # Errors
    ///
    /// Returns `RateUnavailable` for a non-finite or non-positive rate. A
    /// failed cache write is logged, not returned.
    pub fn pin_rate(&mut self, rate: f64) -> ProjectionResult<RateQuote> {
        self.pin_rate_at(rate, now_millis())
    }

    /// Pin `rate` as if the current time were `now_ms`.
    ///
    /// # Errors
    ///
    /// Returns `RateUnavailable` for a non-finite or non-positive rate.
    pub fn pin_rate_at(&mut self, rate: f64, now_ms: u64) -> ProjectionResult<RateQuote> {
        let rate = Self::checked(rate)?;
        let entry = CachedRate {
            rate,
            timestamp: now_ms,
        };
        if let Err(e) = self.write_cache(&entry) {
            warn!(error = %e, "failed to cache exchange rate");
        }
        debug!(rate, "exchange rate pinned");
        Ok(self.settle(rate))
    }

    fn checked(rate: f64) -> ProjectionResult<f64> {
        if rate.is_finite() && rate > 0.0 {
            Ok(rate)
        } else {
            Err(ProjectionError::rate_unavailable(format!(
                "invalid rate {rate}"
            )))
        }
    }

    fn settle(&mut self, rate: f64) -> RateQuote {
        self.quote = RateQuote {
            rate,
            is_loading: false,
        };
        self.quote
    }

    fn fetch_valid(&mut self) -> ProjectionResult<f64> {
        Self::checked(self.source.fetch_rate()?)
    }

    fn read_cache(&self) -> Option<CachedRate> {
        let raw = match self.store.get(&self.config.cache_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "failed to read exchange rate cache");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(error = %e, "ignoring malformed exchange rate cache entry");
                None
            }
        }
    }

    fn write_cache(&mut self, entry: &CachedRate) -> ProjectionResult<()> {
        let raw = serde_json::to_string(entry)?;
        self.store.set(&self.config.cache_key, raw)
    }

    /// Rate the provider starts from before any refresh.
    #[must_use]
    pub const fn default_rate(&self) -> f64 {
        self.default_rate
    }
}
