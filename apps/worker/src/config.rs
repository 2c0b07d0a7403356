use std::str::FromStr;
use std::time::Duration;

use tradedesk_core::constants::{
    DEFAULT_ALERT_SCAN_INTERVAL, DEFAULT_QUOTE_TIMEOUT, DEFAULT_SNAPSHOT_HOUR_UTC, RATE_CACHE_TTL,
};
use tradedesk_market_data::DEFAULT_BASE_URL;

pub struct Config {
    pub market_data_url: String,
    pub quote_timeout: Duration,
    pub alert_interval: Duration,
    pub snapshot_hour_utc: u32,
    pub rate_cache_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let market_data_url = lookup("TD_MARKET_DATA_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let quote_timeout = seconds(&lookup, "TD_QUOTE_TIMEOUT_SECS", DEFAULT_QUOTE_TIMEOUT);
        let alert_interval = seconds(&lookup, "TD_ALERT_INTERVAL_SECS", DEFAULT_ALERT_SCAN_INTERVAL);
        let rate_cache_ttl = seconds(&lookup, "TD_RATE_CACHE_TTL_SECS", RATE_CACHE_TTL);

        let snapshot_hour_utc = match parse(&lookup, "TD_SNAPSHOT_HOUR_UTC", DEFAULT_SNAPSHOT_HOUR_UTC)
        {
            hour if hour < 24 => hour,
            hour => {
                tracing::warn!(
                    "TD_SNAPSHOT_HOUR_UTC={} is not an hour of the day; using {}",
                    hour,
                    DEFAULT_SNAPSHOT_HOUR_UTC
                );
                DEFAULT_SNAPSHOT_HOUR_UTC
            }
        };

        Self {
            market_data_url,
            quote_timeout,
            alert_interval,
            snapshot_hour_utc,
            rate_cache_ttl,
        }
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {}={:?}; using default {}", key, raw, default);
            default
        }),
    }
}

/// Positive whole seconds; zero is rejected like any other invalid value.
fn seconds(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: Duration) -> Duration {
    match parse(lookup, key, default.as_secs()) {
        0 => {
            tracing::warn!("{} must be positive; using {:?}", key, default);
            default
        }
        secs => Duration::from_secs(secs),
    }
}
