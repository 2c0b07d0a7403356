use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Response of the `/forex/convert` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateQuote {
    pub rate: Decimal,
    #[serde(default)]
    pub result: Option<Decimal>,
}
