//! Inventory tracking and hedging.
//!
//! Tracks net position in the quoted instrument, sizes quotes against the
//! per-side capacity, and turns every fill into an offsetting hedge order.

use etfmm_core::{
    round_down_to_tick, round_up_to_tick, ClientOrderId, HedgeOrder, Price, Side, Volume,
};

use crate::config::MakerConfig;
use crate::quote_manager::QuoteSide;

/// Fixed hedge prices, derived once from the admissible price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HedgePrices {
    /// Minimum admissible bid rounded up to a tick. Used for buy hedges.
    pub near_minimum_bid: Price,
    /// Maximum admissible ask rounded down to a tick. Used for sell hedges.
    pub near_maximum_ask: Price,
}

impl HedgePrices {
    pub fn from_config(config: &MakerConfig) -> Self {
        Self {
            near_minimum_bid: round_up_to_tick(config.minimum_bid, config.tick_size),
            near_maximum_ask: round_down_to_tick(config.maximum_ask, config.tick_size),
        }
    }

    /// Price used for a hedge on `side`.
    pub fn for_side(&self, side: Side) -> Price {
        match side {
            Side::Buy => self.near_minimum_bid,
            Side::Sell => self.near_maximum_ask,
        }
    }
}

/// Order sizes for the next quote on each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteSizes {
    pub ask: Volume,
    pub bid: Volume,
}

impl QuoteSizes {
    pub fn for_side(&self, side: QuoteSide) -> Volume {
        match side {
            QuoteSide::Ask => self.ask,
            QuoteSide::Bid => self.bid,
        }
    }
}

/// Net position plus hedge bookkeeping.
#[derive(Debug)]
pub struct InventoryManager {
    /// Net position in lots (positive = long).
    position: i64,
    /// Per-side order capacity.
    capacity: i64,
    hedge_prices: HedgePrices,
    /// Quote fills processed.
    fill_count: u64,
    /// Hedge orders issued.
    hedges_sent: u64,
    /// Hedge fills observed.
    hedge_fill_count: u64,
    /// Volume reported filled on hedge orders.
    hedged_volume: Volume,
}

impl InventoryManager {
    pub fn new(config: &MakerConfig) -> Self {
        Self {
            position: 0,
            capacity: i64::try_from(config.order_capacity).unwrap_or(i64::MAX),
            hedge_prices: HedgePrices::from_config(config),
            fill_count: 0,
            hedges_sent: 0,
            hedge_fill_count: 0,
            hedged_volume: 0,
        }
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn hedge_prices(&self) -> HedgePrices {
        self.hedge_prices
    }

    pub fn fill_count(&self) -> u64 {
        self.fill_count
    }

    pub fn hedges_sent(&self) -> u64 {
        self.hedges_sent
    }

    pub fn hedge_fill_count(&self) -> u64 {
        self.hedge_fill_count
    }

    pub fn hedged_volume(&self) -> Volume {
        self.hedged_volume
    }

    /// Sizes for the next orders: sell more when long, buy more when short.
    /// A side whose size would be zero or negative gets zero.
    pub fn quote_sizes(&self) -> QuoteSizes {
        QuoteSizes {
            ask: Self::non_negative(self.capacity.saturating_add(self.position)),
            bid: Self::non_negative(self.capacity.saturating_sub(self.position)),
        }
    }

    /// Apply a fill on one of our quotes and build the offsetting hedge.
    ///
    /// An ask fill (we sold) lowers the position and is hedged with a buy;
    /// a bid fill (we bought) raises it and is hedged with a sell.
    pub fn record_fill(
        &mut self,
        side: QuoteSide,
        volume: Volume,
        hedge_id: ClientOrderId,
    ) -> HedgeOrder {
        let order_side = side.order_side();
        let lots = i64::try_from(volume).unwrap_or(i64::MAX);
        self.position = self
            .position
            .saturating_add(lots.saturating_mul(order_side.sign()));
        let hedge_side = order_side.opposite();
        self.fill_count += 1;
        self.hedges_sent += 1;

        HedgeOrder {
            client_order_id: hedge_id,
            side: hedge_side,
            price: self.hedge_prices.for_side(hedge_side),
            volume,
        }
    }

    /// Record a hedge fill. Position already moved when the quote filled.
    pub fn record_hedge_fill(&mut self, volume: Volume) {
        self.hedge_fill_count += 1;
        self.hedged_volume = self.hedged_volume.saturating_add(volume);
    }

    fn non_negative(size: i64) -> Volume {
        Volume::try_from(size).unwrap_or(0)
    }
}
