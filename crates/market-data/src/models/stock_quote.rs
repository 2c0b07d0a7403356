use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Point-in-time quote for a listed instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockQuote {
    pub symbol: String,
    /// Display name; the service falls back to the symbol when it has none.
    #[serde(default)]
    pub name: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub change: Decimal,
    #[serde(default)]
    pub change_percent: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub market_state: Option<String>,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl StockQuote {
    /// Display name, or the symbol when the service did not supply one.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.symbol)
    }
}
