//! Trade-flow skew.
//!
//! Accumulates traded volume from trade ticks between two order-book
//! snapshots and shifts the computed quote one tick in the direction of
//! a strong one-sided flow:
//! - Selling pressure (sell > ratio × buy): shift both prices up
//! - Buying pressure (buy > ratio × sell): shift both prices down
//!
//! The shift only applies once the combined volume exceeds a minimum
//! activity threshold.

use etfmm_core::{BookUpdate, Price, Volume};

use crate::config::MakerConfig;
use crate::quote_engine::TargetQuote;

/// Direction of the flow adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowSkew {
    /// Both prices one tick higher.
    Up,
    /// Both prices one tick lower.
    Down,
    /// No adjustment.
    Neutral,
}

impl FlowSkew {
    /// Shift `quote` by one tick in this direction.
    pub fn apply(&self, quote: TargetQuote, tick: Price) -> TargetQuote {
        match self {
            Self::Up => TargetQuote {
                ask: quote.ask.saturating_add(tick),
                bid: quote.bid.saturating_add(tick),
                ..quote
            },
            Self::Down => TargetQuote {
                ask: quote.ask.saturating_sub(tick),
                bid: quote.bid.saturating_sub(tick),
                ..quote
            },
            Self::Neutral => quote,
        }
    }
}

/// Traded volume observed since the last order-book snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeFlow {
    /// Volume traded on the bid ladder of trade ticks.
    pub buy_volume: Volume,
    /// Volume traded on the ask ladder of trade ticks.
    pub sell_volume: Volume,
}

impl TradeFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate one trade-tick message.
    pub fn record_ticks(&mut self, ticks: &BookUpdate) {
        self.buy_volume = self.buy_volume.saturating_add(ticks.total_bid_volume());
        self.sell_volume = self.sell_volume.saturating_add(ticks.total_ask_volume());
    }

    pub fn total(&self) -> Volume {
        self.buy_volume.saturating_add(self.sell_volume)
    }

    /// Skew implied by the accumulated flow.
    pub fn skew(&self, config: &MakerConfig) -> FlowSkew {
        if self.total() <= config.skew_min_volume {
            return FlowSkew::Neutral;
        }
        let ratio = config.skew_imbalance_ratio;
        if self.sell_volume > self.buy_volume.saturating_mul(ratio) {
            FlowSkew::Up
        } else if self.buy_volume > self.sell_volume.saturating_mul(ratio) {
            FlowSkew::Down
        } else {
            FlowSkew::Neutral
        }
    }

    /// Forget everything accumulated so far.
    pub fn reset(&mut self) {
        self.buy_volume = 0;
        self.sell_volume = 0;
    }
}
