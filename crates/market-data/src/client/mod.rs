//! HTTP client for the upstream market-data service.
//!
//! Endpoints:
//! - `GET /stock/{symbol}` - latest quote
//! - `GET /stock/{symbol}/earnings` - next earnings date
//! - `GET /stock/{symbol}/dividends` - next dividend payment
//! - `GET /forex/convert` - currency conversion rate

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::errors::MarketDataError;
use crate::models::{DividendCalendar, EarningsCalendar, ExchangeRateQuote, StockQuote};

/// Default base URL of the market-data service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Source of quotes, corporate-action calendars and FX rates.
///
/// Every lookup returns `Ok(None)` when the service has no data for the
/// request, and `Err` only when the service could not be asked.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Latest quote for a symbol.
    async fn get_quote(&self, symbol: &str) -> Result<Option<StockQuote>, MarketDataError>;

    /// Next earnings date for a symbol.
    async fn get_earnings(&self, symbol: &str)
        -> Result<Option<EarningsCalendar>, MarketDataError>;

    /// Next dividend payment for a symbol.
    async fn get_dividends(&self, symbol: &str)
        -> Result<Option<DividendCalendar>, MarketDataError>;

    /// Rate for converting one unit of `from` into `to`.
    async fn get_exchange_rate(
        &self,
        from: &str,
        to: &str,
    ) -> Result<Option<ExchangeRateQuote>, MarketDataError>;
}

/// reqwest-backed client for the market-data service.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
}

impl UpstreamClient {
    /// Create a client with the default request timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    /// Create a client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL with `segments` appended. Each segment is percent-encoded,
    /// so a `/` inside a symbol never changes the route.
    fn endpoint_url(&self, segments: &[&str]) -> Result<Url, MarketDataError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            MarketDataError::InvalidData(format!("invalid base URL {}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                MarketDataError::InvalidData(format!(
                    "base URL {} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET a JSON document. A 404 maps to `Ok(None)`.
    async fn fetch<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, &str)],
    ) -> Result<Option<T>, MarketDataError> {
        let url = self.endpoint_url(segments)?;
        let endpoint = url.path().to_string();
        debug!("Market data request: {} with {} params", endpoint, params.len());

        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MarketDataError::Timeout {
                        endpoint: endpoint.clone(),
                    }
                } else {
                    MarketDataError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(200).collect();
            return Err(MarketDataError::ProviderError {
                endpoint,
                message: format!("HTTP {} - {}", status, excerpt),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    endpoint: endpoint.clone(),
                }
            } else {
                MarketDataError::Network(e.to_string())
            }
        })?;

        parse_body(&endpoint, &body)
    }
}

/// A symbol usable as one path segment. Dot segments would be resolved
/// away by URL normalization.
fn symbol_segment(symbol: &str) -> Result<&str, MarketDataError> {
    let symbol = symbol.trim();
    if symbol.is_empty() || symbol == "." || symbol == ".." {
        return Err(MarketDataError::InvalidData(format!(
            "invalid symbol '{}'",
            symbol
        )));
    }
    Ok(symbol)
}

/// Decode a response body. `null` and `{}` bodies count as a miss.
pub(crate) fn parse_body<T: DeserializeOwned>(
    endpoint: &str,
    body: &str,
) -> Result<Option<T>, MarketDataError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| MarketDataError::InvalidData(format!("{}: {}", endpoint, e)))?;

    let is_empty = match &value {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if is_empty {
        return Ok(None);
    }

    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| MarketDataError::InvalidData(format!("{}: {}", endpoint, e)))
}

#[async_trait]
impl MarketDataProvider for UpstreamClient {
    async fn get_quote(&self, symbol: &str) -> Result<Option<StockQuote>, MarketDataError> {
        self.fetch(&["stock", symbol_segment(symbol)?], &[]).await
    }

    async fn get_earnings(
        &self,
        symbol: &str,
    ) -> Result<Option<EarningsCalendar>, MarketDataError> {
        self.fetch(&["stock", symbol_segment(symbol)?, "earnings"], &[])
            .await
    }

    async fn get_dividends(
        &self,
        symbol: &str,
    ) -> Result<Option<DividendCalendar>, MarketDataError> {
        self.fetch(&["stock", symbol_segment(symbol)?, "dividends"], &[])
            .await
    }

    async fn get_exchange_rate(
        &self,
        from: &str,
        to: &str,
    ) -> Result<Option<ExchangeRateQuote>, MarketDataError> {
        self.fetch(
            &["forex", "convert"],
            &[("from_currency", from), ("to_currency", to), ("amount", "1")],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_stock_quote() {
        let body = r#"{
            "symbol": "AAPL",
            "name": "Apple Inc.",
            "price": 182.52,
            "change": -1.25,
            "changePercent": -0.68,
            "currency": "USD",
            "marketState": "REGULAR",
            "timestamp": "2026-10-16T14:30:00"
        }"#;

        let quote: StockQuote = parse_body("/stock/AAPL", body).unwrap().unwrap();
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.price, dec!(182.52));
        assert_eq!(quote.change, dec!(-1.25));
        assert_eq!(quote.display_name(), "Apple Inc.");
    }

    #[test]
    fn test_parse_quote_defaults_currency_and_name() {
        let body = r#"{"symbol": "THYAO.IS", "price": 281.5}"#;
        let quote: StockQuote = parse_body("/stock/THYAO.IS", body).unwrap().unwrap();
        assert_eq!(quote.currency, "USD");
        assert_eq!(quote.display_name(), "THYAO.IS");
        assert_eq!(quote.change_percent, dec!(0));
    }

    #[test]
    fn test_parse_null_body_is_miss() {
        let parsed: Option<StockQuote> = parse_body("/stock/NOPE", "null").unwrap();
        assert!(parsed.is_none());

        let parsed: Option<StockQuote> = parse_body("/stock/NOPE", "{}").unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn test_parse_quote_without_price_is_invalid() {
        let result: Result<Option<StockQuote>, _> =
            parse_body("/stock/AAPL", r#"{"symbol": "AAPL"}"#);
        assert!(matches!(result, Err(MarketDataError::InvalidData(_))));
    }

    #[test]
    fn test_parse_earnings_calendar() {
        let body = r#"{"symbol": "MSFT", "nextEarningsDate": "2026-10-28"}"#;
        let earnings: EarningsCalendar = parse_body("/stock/MSFT/earnings", body)
            .unwrap()
            .unwrap();
        assert_eq!(
            earnings.next_earnings_date,
            NaiveDate::from_ymd_opt(2026, 10, 28)
        );
    }

    #[test]
    fn test_parse_dividend_calendar() {
        let body = r#"{"nextDividend": {"paymentDate": "2026-11-13", "amount": 0.26}}"#;
        let dividends: DividendCalendar = parse_body("/stock/AAPL/dividends", body)
            .unwrap()
            .unwrap();
        let next = dividends.next_dividend.unwrap();
        assert_eq!(next.payment_date, NaiveDate::from_ymd_opt(2026, 11, 13));
        assert_eq!(next.amount, dec!(0.26));
    }

    #[test]
    fn test_parse_dividend_calendar_without_upcoming_payment() {
        let body = r#"{"nextDividend": null}"#;
        let dividends: DividendCalendar = parse_body("/stock/TSLA/dividends", body)
            .unwrap()
            .unwrap();
        assert!(dividends.next_dividend.is_none());
    }

    #[test]
    fn test_parse_exchange_rate() {
        let body = r#"{"from": "USD", "to": "TRY", "amount": 1, "rate": 34.2521, "result": 34.2521}"#;
        let rate: ExchangeRateQuote = parse_body("/forex/convert", body).unwrap().unwrap();
        assert_eq!(rate.rate, dec!(34.2521));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = UpstreamClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_symbols_are_single_path_segments() {
        let client = UpstreamClient::new("http://localhost:8000");

        let url = client.endpoint_url(&["stock", "BRK/B"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/stock/BRK%2FB");

        let url = client
            .endpoint_url(&["stock", "../x", "earnings"])
            .unwrap();
        assert_eq!(url.path(), "/stock/..%2Fx/earnings");

        let url = client.endpoint_url(&["stock", "THYAO.IS"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/stock/THYAO.IS");
    }

    #[test]
    fn test_base_url_path_is_kept() {
        let client = UpstreamClient::new("http://localhost:8000/api/");
        let url = client
            .endpoint_url(&["stock", "AAPL", "dividends"])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/stock/AAPL/dividends");
    }

    #[test]
    fn test_dot_segments_are_rejected() {
        assert!(matches!(
            symbol_segment(".."),
            Err(MarketDataError::InvalidData(_))
        ));
        assert!(symbol_segment(" . ").is_err());
        assert!(symbol_segment("").is_err());
        assert_eq!(symbol_segment(" AAPL ").unwrap(), "AAPL");
    }
}
