//! Inbound events delivered by the host framework.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::order::ClientOrderId;
use crate::types::{BookUpdate, Price, Volume};

/// One inbound message, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// Periodic order-book snapshot.
    OrderBook(BookUpdate),
    /// Aggregated trading activity since the previous tick message.
    TradeTicks(BookUpdate),
    /// One of our orders traded (partially or fully).
    OrderFilled {
        client_order_id: ClientOrderId,
        price: Price,
        volume: Volume,
    },
    /// Status change of one of our orders. Remaining volume zero means the
    /// order is gone (filled or cancelled).
    OrderStatus {
        client_order_id: ClientOrderId,
        fill_volume: Volume,
        remaining_volume: Volume,
        fees: i64,
    },
    /// Exchange-reported error; id 0 when not about a particular order.
    Error {
        client_order_id: ClientOrderId,
        message: String,
    },
    /// One of our hedge orders traded.
    HedgeFilled {
        client_order_id: ClientOrderId,
        price: Price,
        volume: Volume,
    },
    /// Execution connection lost.
    Disconnect,
}

impl EngineEvent {
    /// Parse one JSON document into an event.
    pub fn from_json(line: &str) -> Result<Self> {
        serde_json::from_str(line).map_err(CoreError::from)
    }

    /// Short name for logging and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OrderBook(_) => "order_book",
            Self::TradeTicks(_) => "trade_ticks",
            Self::OrderFilled { .. } => "order_filled",
            Self::OrderStatus { .. } => "order_status",
            Self::Error { .. } => "error",
            Self::HedgeFilled { .. } => "hedge_filled",
            Self::Disconnect => "disconnect",
        }
    }
}
