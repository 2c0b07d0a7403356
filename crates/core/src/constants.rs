use std::time::Duration;

/// Decimal scale for stored money amounts (average cost, snapshot values, conversions)
pub const MONEY_DECIMAL_PRECISION: u32 = 4;

/// Decimal scale for derived exchange rates (reverse lookups)
pub const RATE_DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for display and return percentages
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Starting balance of a new paper-trading account
pub const DEFAULT_PAPER_BALANCE: &str = "100000";

/// Currency used when an account has no preference set
pub const DEFAULT_CURRENCY: &str = "USD";

/// Cached FX rates older than this are refetched
pub const RATE_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Upper bound for a single quote / calendar lookup
pub const DEFAULT_QUOTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound for a single FX rate lookup
pub const DEFAULT_FX_TIMEOUT: Duration = Duration::from_secs(15);

/// Days of notice for reminder alerts without an explicit value
pub const DEFAULT_DAYS_NOTICE: i64 = 1;

/// Largest accepted days of notice for reminder alerts
pub const MAX_DAYS_NOTICE: i64 = 365;

/// Interval between alert scans
pub const DEFAULT_ALERT_SCAN_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Hour of day (UTC) at which the nightly snapshot batch runs
pub const DEFAULT_SNAPSHOT_HOUR_UTC: u32 = 1;

/// Maximum number of alerts evaluated concurrently in one scan
pub const MAX_CONCURRENT_ALERT_CHECKS: usize = 8;
