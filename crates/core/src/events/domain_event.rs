//! Domain event types.

use serde::{Deserialize, Serialize};

use crate::accounts::TradingMode;
use crate::trading::TradeSide;

/// Domain events emitted by core services after successful mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// An order committed. The `(account_id, mode)` snapshot is now stale.
    TradeExecuted {
        account_id: String,
        mode: TradingMode,
        symbol: String,
        side: TradeSide,
    },

    /// An alert moved from active to triggered.
    AlertTriggered {
        account_id: String,
        alert_id: String,
        symbol: String,
    },
}

impl DomainEvent {
    /// Creates a TradeExecuted event.
    pub fn trade_executed(
        account_id: impl Into<String>,
        mode: TradingMode,
        symbol: impl Into<String>,
        side: TradeSide,
    ) -> Self {
        Self::TradeExecuted {
            account_id: account_id.into(),
            mode,
            symbol: symbol.into(),
            side,
        }
    }

    /// Creates an AlertTriggered event.
    pub fn alert_triggered(
        account_id: impl Into<String>,
        alert_id: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Self {
        Self::AlertTriggered {
            account_id: account_id.into(),
            alert_id: alert_id.into(),
            symbol: symbol.into(),
        }
    }

    pub fn account_id(&self) -> &str {
        match self {
            Self::TradeExecuted { account_id, .. } | Self::AlertTriggered { account_id, .. } => {
                account_id
            }
        }
    }
}
