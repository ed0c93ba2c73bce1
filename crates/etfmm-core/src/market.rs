//! Instrument identity and exchange-wide price constants.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Price;

/// Number of price levels reported per side in book snapshots and trade ticks.
pub const TOP_LEVEL_COUNT: usize = 5;

/// Lowest price the exchange accepts on a bid, in minor currency units.
pub const MINIMUM_BID: Price = 1;

/// Highest price the exchange accepts on an ask, in minor currency units.
pub const MAXIMUM_ASK: Price = 2_147_483_647;

/// Instruments carried by the exchange feed.
///
/// The ETF is quoted; the future is the hedge reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    Future,
    #[default]
    Etf,
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Future => write!(f, "future"),
            Self::Etf => write!(f, "etf"),
        }
    }
}

/// Round `price` up to the nearest multiple of `tick`.
///
/// Prices already on a tick are returned unchanged, so the result is
/// stable under repeated application. A zero tick returns `price` as is.
pub fn round_up_to_tick(price: Price, tick: Price) -> Price {
    if tick == 0 {
        return price;
    }
    match price % tick {
        0 => price,
        rem => price.saturating_add(tick - rem),
    }
}

/// Round `price` down to the nearest multiple of `tick`.
pub fn round_down_to_tick(price: Price, tick: Price) -> Price {
    if tick == 0 {
        return price;
    }
    price - price % tick
}
