//! Market making configuration.

use etfmm_core::{
    CoreError, Instrument, Lifespan, Price, Volume, MAXIMUM_ASK, MINIMUM_BID, TOP_LEVEL_COUNT,
};
use serde::{Deserialize, Serialize};

/// Market making configuration.
///
/// All prices are in minor currency units, all volumes in lots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MakerConfig {
    /// Instrument we quote. Snapshots for any other instrument only update
    /// the hedge reference view.
    #[serde(default)]
    pub tradable_instrument: Instrument,

    /// Minimum price increment.
    #[serde(default = "default_tick_size")]
    pub tick_size: Price,

    /// Spread we aim to quote between our ask and bid.
    #[serde(default = "default_target_spread")]
    pub target_spread: Price,

    /// Per-side order capacity. Ask size is `capacity + position`,
    /// bid size is `capacity - position`.
    #[serde(default = "default_order_capacity")]
    pub order_capacity: Volume,

    /// Traded volume (buy + sell) since the last snapshot that must be
    /// exceeded before the flow skew is considered.
    #[serde(default = "default_skew_min_volume")]
    pub skew_min_volume: Volume,

    /// One side's traded volume must exceed this multiple of the other's
    /// to shift the quote.
    #[serde(default = "default_skew_imbalance_ratio")]
    pub skew_imbalance_ratio: Volume,

    /// Number of ladder levels the book walk may use (1..=5).
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Lowest admissible bid; rounded up to a tick for hedge pricing.
    #[serde(default = "default_minimum_bid")]
    pub minimum_bid: Price,

    /// Highest admissible ask; rounded down to a tick for hedge pricing.
    #[serde(default = "default_maximum_ask")]
    pub maximum_ask: Price,

    /// Lifespan attached to quote orders.
    #[serde(default)]
    pub lifespan: Lifespan,
}

impl Default for MakerConfig {
    fn default() -> Self {
        Self {
            tradable_instrument: Instrument::Etf,
            tick_size: default_tick_size(),
            target_spread: default_target_spread(),
            order_capacity: default_order_capacity(),
            skew_min_volume: default_skew_min_volume(),
            skew_imbalance_ratio: default_skew_imbalance_ratio(),
            max_depth: default_max_depth(),
            minimum_bid: default_minimum_bid(),
            maximum_ask: default_maximum_ask(),
            lifespan: Lifespan::GoodForDay,
        }
    }
}

impl MakerConfig {
    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> etfmm_core::Result<()> {
        if self.tick_size == 0 {
            return Err(CoreError::InvalidConfig("tick_size must be > 0".into()));
        }
        if self.target_spread == 0 {
            return Err(CoreError::InvalidConfig("target_spread must be > 0".into()));
        }
        if self.tick_size > MAXIMUM_ASK || self.target_spread > MAXIMUM_ASK {
            return Err(CoreError::InvalidConfig(format!(
                "tick_size and target_spread must not exceed {MAXIMUM_ASK}"
            )));
        }
        if self.order_capacity == 0 {
            return Err(CoreError::InvalidConfig(
                "order_capacity must be > 0".into(),
            ));
        }
        if self.order_capacity > i64::MAX as Volume {
            return Err(CoreError::InvalidConfig(
                "order_capacity does not fit a signed position".into(),
            ));
        }
        if self.max_depth == 0 || self.max_depth > TOP_LEVEL_COUNT {
            return Err(CoreError::InvalidConfig(format!(
                "max_depth must be within 1..={TOP_LEVEL_COUNT}, got {}",
                self.max_depth
            )));
        }
        if self.minimum_bid > self.maximum_ask {
            return Err(CoreError::InvalidConfig(format!(
                "minimum_bid ({}) exceeds maximum_ask ({})",
                self.minimum_bid, self.maximum_ask
            )));
        }
        Ok(())
    }
}

fn default_tick_size() -> Price {
    100 // one dollar in cents
}
fn default_target_spread() -> Price {
    600
}
fn default_order_capacity() -> Volume {
    100
}
fn default_skew_min_volume() -> Volume {
    200
}
fn default_skew_imbalance_ratio() -> Volume {
    2
}
fn default_max_depth() -> usize {
    TOP_LEVEL_COUNT
}
fn default_minimum_bid() -> Price {
    MINIMUM_BID
}
fn default_maximum_ask() -> Price {
    MAXIMUM_ASK
}
