//! Quote price calculation engine.
//!
//! Walks the ask and bid ladders of a snapshot with independent cursors
//! until it finds a pair of levels it can quote around:
//! - One side empty: synthesize the other side at the target spread
//! - Book much wider than target: quote one tick inside both sides
//! - Book at (or a little over) target: step inside the heavier side
//! - Book too tight: look one level deeper on the lighter side
//!
//! Running out of levels on both sides halts quoting.

use etfmm_core::{BookUpdate, Price};

use crate::config::MakerConfig;

/// Target prices for both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetQuote {
    /// Ask (sell) price.
    pub ask: Price,
    /// Bid (buy) price.
    pub bid: Price,
    /// Ladder index the ask was derived from.
    pub ask_depth: usize,
    /// Ladder index the bid was derived from.
    pub bid_depth: usize,
}

impl TargetQuote {
    /// Quoted spread (ask - bid), negative if the quote is crossed.
    pub fn spread(&self) -> i128 {
        i128::from(self.ask) - i128::from(self.bid)
    }
}

/// Why no quote could be derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// No price on either side at the current cursors.
    EmptyBook,
    /// Both cursors reached maximum depth with the spread still too tight.
    DepthExhausted,
}

impl std::fmt::Display for HaltReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyBook => write!(f, "empty_book"),
            Self::DepthExhausted => write!(f, "depth_exhausted"),
        }
    }
}

/// Result of the book walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteOutcome {
    Quote(TargetQuote),
    Halt(HaltReason),
}

impl QuoteOutcome {
    pub fn is_halt(&self) -> bool {
        matches!(self, Self::Halt(_))
    }

    pub fn quote(&self) -> Option<TargetQuote> {
        match self {
            Self::Quote(q) => Some(*q),
            Self::Halt(_) => None,
        }
    }
}

/// Derive target ask/bid prices from an order-book snapshot.
///
/// The spread classification is deliberately asymmetric: a book exactly at
/// `target_spread` is quoted at its own best levels, while a book strictly
/// between `target_spread` and `target_spread + tick` (inclusive of the
/// upper bound) sends the walk one level deeper.
pub fn compute_quote(book: &BookUpdate, config: &MakerConfig) -> QuoteOutcome {
    let tick = i128::from(config.tick_size);
    let target = i128::from(config.target_spread);
    let last = config.max_depth.saturating_sub(1);

    let mut ask_depth = 0usize;
    let mut bid_depth = 0usize;

    loop {
        let ask_px = book.ask_prices[ask_depth];
        let bid_px = book.bid_prices[bid_depth];

        match (ask_px, bid_px) {
            (0, 0) => return QuoteOutcome::Halt(HaltReason::EmptyBook),
            (0, bid) => {
                return QuoteOutcome::Quote(TargetQuote {
                    ask: bid.saturating_add(config.target_spread),
                    bid,
                    ask_depth,
                    bid_depth,
                })
            }
            (ask, 0) => {
                return QuoteOutcome::Quote(TargetQuote {
                    ask,
                    bid: ask.saturating_sub(config.target_spread),
                    ask_depth,
                    bid_depth,
                })
            }
            _ => {}
        }

        let ask_vol = book.ask_volumes[ask_depth];
        let bid_vol = book.bid_volumes[bid_depth];
        let current_spread = i128::from(ask_px) - i128::from(bid_px);

        if current_spread > target + 2 * tick {
            return QuoteOutcome::Quote(TargetQuote {
                ask: ask_px.saturating_sub(config.tick_size),
                bid: bid_px.saturating_add(config.tick_size),
                ask_depth,
                bid_depth,
            });
        }

        if current_spread > target + tick || current_spread == target {
            // The heavier side steps inside and ties improve the bid. Keep this ordering.
            let (ask, bid) = if ask_vol > bid_vol {
                (ask_px.saturating_sub(config.tick_size), bid_px)
            } else {
                (ask_px, bid_px.saturating_add(config.tick_size))
            };
            return QuoteOutcome::Quote(TargetQuote {
                ask,
                bid,
                ask_depth,
                bid_depth,
            });
        }

        // Too tight: look one level deeper on the lighter side.
        if ask_vol > bid_vol && bid_depth != last {
            bid_depth += 1;
        } else if ask_vol <= bid_vol && ask_depth != last {
            ask_depth += 1;
        } else if bid_depth == last && ask_depth != last {
            ask_depth += 1;
        } else if ask_depth == last && bid_depth != last {
            bid_depth += 1;
        } else {
            return QuoteOutcome::Halt(HaltReason::DepthExhausted);
        }
    }
}
