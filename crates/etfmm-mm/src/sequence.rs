//! Feed sequence tracking.

use std::collections::HashMap;

use etfmm_core::Instrument;

/// Feed a sequence number belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    OrderBook,
    TradeTicks,
}

impl std::fmt::Display for FeedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OrderBook => write!(f, "order_book"),
            Self::TradeTicks => write!(f, "trade_ticks"),
        }
    }
}

/// Last sequence number seen per instrument and feed.
///
/// Sequences are expected to increase strictly. Anything else is counted
/// but the message is still used.
#[derive(Debug, Default)]
pub struct SequenceTracker {
    last: HashMap<(Instrument, FeedKind), u64>,
    anomalies: u64,
}

impl SequenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `sequence` and return the previous one if it was not lower.
    pub fn observe(
        &mut self,
        instrument: Instrument,
        feed: FeedKind,
        sequence: u64,
    ) -> Option<u64> {
        let previous = self.last.insert((instrument, feed), sequence);
        match previous {
            Some(prev) if sequence <= prev => {
                self.anomalies += 1;
                Some(prev)
            }
            _ => None,
        }
    }

    pub fn anomalies(&self) -> u64 {
        self.anomalies
    }
}
