//! Common data types for market data.
//!
//! Contains the five-level ladder used by both order-book snapshots and
//! trade ticks, and the top-of-book state classification.

use serde::{Deserialize, Serialize};

use crate::market::{Instrument, TOP_LEVEL_COUNT};

/// Price in minor currency units (cents). Zero marks "no level".
pub type Price = u64;

/// Volume in lots.
pub type Volume = u64;

/// Top-of-book state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LadderState {
    /// Both best levels present and ask above bid.
    Valid,
    /// No bid side.
    NoBid,
    /// No ask side.
    NoAsk,
    /// Both sides missing.
    Empty,
    /// Best bid at or above best ask.
    Crossed,
}

impl std::fmt::Display for LadderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Valid => write!(f, "VALID"),
            Self::NoBid => write!(f, "NO_BID"),
            Self::NoAsk => write!(f, "NO_ASK"),
            Self::Empty => write!(f, "EMPTY"),
            Self::Crossed => write!(f, "CROSSED"),
        }
    }
}

/// Five-level price/volume ladders for one instrument.
///
/// Order-book snapshots report resting liquidity; trade ticks report the
/// aggregated traded volume at up to five prices per side. Levels are
/// ordered best to worst and unused levels carry price and volume zero.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookUpdate {
    pub instrument: Instrument,
    pub sequence: u64,
    pub ask_prices: [Price; TOP_LEVEL_COUNT],
    pub ask_volumes: [Volume; TOP_LEVEL_COUNT],
    pub bid_prices: [Price; TOP_LEVEL_COUNT],
    pub bid_volumes: [Volume; TOP_LEVEL_COUNT],
}

impl BookUpdate {
    /// Empty ladders for `instrument`.
    pub fn empty(instrument: Instrument, sequence: u64) -> Self {
        Self {
            instrument,
            sequence,
            ..Default::default()
        }
    }

    /// Best ask price, zero when the ask side is empty.
    pub fn best_ask(&self) -> Price {
        self.ask_prices[0]
    }

    /// Best bid price, zero when the bid side is empty.
    pub fn best_bid(&self) -> Price {
        self.bid_prices[0]
    }

    /// Sum of volumes across all ask levels, saturating at `Volume::MAX`.
    pub fn total_ask_volume(&self) -> Volume {
        self.ask_volumes
            .iter()
            .fold(0, |acc, v| acc.saturating_add(*v))
    }

    /// Sum of volumes across all bid levels, saturating at `Volume::MAX`.
    pub fn total_bid_volume(&self) -> Volume {
        self.bid_volumes
            .iter()
            .fold(0, |acc, v| acc.saturating_add(*v))
    }

    /// Classify the top of the book.
    pub fn state(&self) -> LadderState {
        let has_ask = self.best_ask() != 0;
        let has_bid = self.best_bid() != 0;
        match (has_bid, has_ask) {
            (false, false) => LadderState::Empty,
            (true, false) => LadderState::NoAsk,
            (false, true) => LadderState::NoBid,
            (true, true) => {
                if self.best_bid() < self.best_ask() {
                    LadderState::Valid
                } else {
                    LadderState::Crossed
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(asks: [Price; 5], bids: [Price; 5]) -> BookUpdate {
        BookUpdate {
            instrument: Instrument::Etf,
            sequence: 1,
            ask_prices: asks,
            ask_volumes: [10, 20, 0, 0, 0],
            bid_prices: bids,
            bid_volumes: [5, 5, 5, 0, 0],
        }
    }

    #[test]
    fn test_ladder_state() {
        assert_eq!(
            book([101, 102, 0, 0, 0], [100, 99, 0, 0, 0]).state(),
            LadderState::Valid
        );
        assert_eq!(book([0; 5], [100, 0, 0, 0, 0]).state(), LadderState::NoAsk);
        assert_eq!(book([101, 0, 0, 0, 0], [0; 5]).state(), LadderState::NoBid);
        assert_eq!(book([0; 5], [0; 5]).state(), LadderState::Empty);
        assert_eq!(
            book([100, 0, 0, 0, 0], [100, 0, 0, 0, 0]).state(),
            LadderState::Crossed
        );
    }

    #[test]
    fn test_total_volumes() {
        let b = book([101, 102, 0, 0, 0], [100, 99, 98, 0, 0]);
        assert_eq!(b.total_ask_volume(), 30);
        assert_eq!(b.total_bid_volume(), 15);
    }

    #[test]
    fn test_total_volumes_saturate() {
        let b = BookUpdate {
            ask_volumes: [u64::MAX / 2, u64::MAX / 2, 10, 0, 0],
            bid_volumes: [u64::MAX, 1, 0, 0, 0],
            ..BookUpdate::empty(Instrument::Etf, 1)
        };
        assert_eq!(b.total_ask_volume(), u64::MAX);
        assert_eq!(b.total_bid_volume(), u64::MAX);
    }

    #[test]
    fn test_deserialize_with_arrays() {
        let json = r#"{
            "instrument": "etf",
            "sequence": 3,
            "ask_prices": [101, 0, 0, 0, 0],
            "ask_volumes": [7, 0, 0, 0, 0],
            "bid_prices": [99, 0, 0, 0, 0],
            "bid_volumes": [8, 0, 0, 0, 0]
        }"#;
        let b: BookUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(b.sequence, 3);
        assert_eq!(b.best_ask(), 101);
        assert_eq!(b.best_bid(), 99);
    }
}
