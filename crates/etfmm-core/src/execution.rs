//! Outbound order actions.
//!
//! The engine never talks to the exchange directly. Every decision is
//! returned to the host as an `OrderAction`, which the host maps onto
//! the wire protocol.

use serde::{Deserialize, Serialize};

use crate::order::{ClientOrderId, Lifespan, Side};
use crate::types::{Price, Volume};

/// Limit order on the quoted instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertOrder {
    pub client_order_id: ClientOrderId,
    pub side: Side,
    pub price: Price,
    pub volume: Volume,
    pub lifespan: Lifespan,
}

/// Cancel request for a previously inserted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrder {
    pub client_order_id: ClientOrderId,
}

/// Offsetting order on the hedge instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HedgeOrder {
    pub client_order_id: ClientOrderId,
    pub side: Side,
    pub price: Price,
    pub volume: Volume,
}

/// Action the engine wants the host to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OrderAction {
    Insert(InsertOrder),
    Cancel(CancelOrder),
    Hedge(HedgeOrder),
}

impl OrderAction {
    /// Client order id the action refers to.
    pub fn client_order_id(&self) -> ClientOrderId {
        match self {
            Self::Insert(o) => o.client_order_id,
            Self::Cancel(c) => c.client_order_id,
            Self::Hedge(h) => h.client_order_id,
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Self::Insert(_))
    }

    pub fn is_cancel(&self) -> bool {
        matches!(self, Self::Cancel(_))
    }
}
