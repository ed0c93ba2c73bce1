//! Quote lifecycle management.
//!
//! Keeps at most one live order per side in line with the target quote:
//! - Cancel the live order when the target price moves
//! - Hold back the replacement until the cancel is confirmed
//! - Place the replacement as soon as the zero-remaining status arrives
//! - Flatten both sides when quoting halts
//!
//! Cancel and insert are separate round trips. The pending-replacement
//! marker on each side is what stops a second order from being placed
//! while a cancel is still in flight.

use std::collections::HashMap;

use etfmm_core::{
    CancelOrder, ClientOrderId, InsertOrder, Lifespan, OrderAction, Price, Side, Volume,
};
use tracing::{debug, info};

use crate::inventory::QuoteSizes;
use crate::quote_engine::TargetQuote;

/// Which of our two quotes an order belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteSide {
    Ask,
    Bid,
}

impl QuoteSide {
    pub const BOTH: [QuoteSide; 2] = [QuoteSide::Ask, QuoteSide::Bid];

    /// Exchange side of orders on this quote.
    pub fn order_side(&self) -> Side {
        match self {
            Self::Ask => Side::Sell,
            Self::Bid => Side::Buy,
        }
    }
}

impl std::fmt::Display for QuoteSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ask => write!(f, "ask"),
            Self::Bid => write!(f, "bid"),
        }
    }
}

/// Lifecycle state of one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideState {
    /// Nothing resting and nothing being cancelled.
    NoOrder,
    /// An order is resting.
    Live,
    /// A cancel is in flight; the replacement waits for its confirmation.
    CancelPending,
}

/// The order we keep on one side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingOrder {
    /// Last target price for this side (zero when never quoted or flattened).
    pub target_price: Price,
    /// Remaining volume of the live order, as last reported.
    pub working_volume: Volume,
    /// Live order id, if any.
    pub order_id: Option<ClientOrderId>,
}

/// Per-side tracking.
#[derive(Debug, Clone, Default)]
struct SideQuoteState {
    working: WorkingOrder,
    /// Order cancelled by us and not yet confirmed gone.
    pending_replacement: Option<ClientOrderId>,
}

impl SideQuoteState {
    fn state(&self) -> SideState {
        if self.working.order_id.is_some() {
            SideState::Live
        } else if self.pending_replacement.is_some() {
            SideState::CancelPending
        } else {
            SideState::NoOrder
        }
    }
}

/// Client order id allocation and id → side correlation.
#[derive(Debug, Default)]
pub struct OrderRegistry {
    last_id: u64,
    /// Outstanding quote orders and the side each belongs to.
    outstanding: HashMap<ClientOrderId, QuoteSide>,
}

impl OrderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next client order id (1, 2, 3, ...). Shared by quotes and hedges.
    pub fn allocate(&mut self) -> ClientOrderId {
        self.last_id += 1;
        ClientOrderId::new(self.last_id)
    }

    /// Record a new quote order.
    pub fn register(&mut self, id: ClientOrderId, side: QuoteSide) {
        self.outstanding.insert(id, side);
    }

    /// Forget an order that has no remaining volume.
    pub fn remove(&mut self, id: ClientOrderId) -> Option<QuoteSide> {
        self.outstanding.remove(&id)
    }

    pub fn side_of(&self, id: ClientOrderId) -> Option<QuoteSide> {
        self.outstanding.get(&id).copied()
    }

    pub fn is_tracked(&self, id: ClientOrderId) -> bool {
        self.outstanding.contains_key(&id)
    }

    /// Number of outstanding orders on `side`.
    pub fn count(&self, side: QuoteSide) -> usize {
        self.outstanding.values().filter(|s| **s == side).count()
    }

    pub fn last_id(&self) -> u64 {
        self.last_id
    }
}

/// Manages the ask and bid quote orders.
#[derive(Debug)]
pub struct QuoteManager {
    lifespan: Lifespan,
    ask: SideQuoteState,
    bid: SideQuoteState,
    registry: OrderRegistry,
}

impl QuoteManager {
    pub fn new(lifespan: Lifespan) -> Self {
        Self {
            lifespan,
            ask: SideQuoteState::default(),
            bid: SideQuoteState::default(),
            registry: OrderRegistry::new(),
        }
    }

    /// Bring working orders in line with a fresh target quote.
    ///
    /// Every side whose target moved has its live order cancelled first.
    /// A new order goes out only where the target moved, the size is
    /// non-zero and no cancel is still awaiting confirmation.
    pub fn reconcile(&mut self, target: &TargetQuote, sizes: QuoteSizes) -> Vec<OrderAction> {
        let mut actions = Vec::new();

        let ask_changed = target.ask != self.ask.working.target_price;
        let bid_changed = target.bid != self.bid.working.target_price;

        if ask_changed {
            Self::cancel_for_requote(QuoteSide::Ask, &mut self.ask, &mut actions);
        }
        if bid_changed {
            Self::cancel_for_requote(QuoteSide::Bid, &mut self.bid, &mut actions);
        }

        if ask_changed && sizes.ask > 0 && self.ask.pending_replacement.is_none() {
            actions.push(Self::place(
                QuoteSide::Ask,
                &mut self.ask,
                &mut self.registry,
                target.ask,
                sizes.ask,
                self.lifespan,
            ));
        }
        if bid_changed && sizes.bid > 0 && self.bid.pending_replacement.is_none() {
            actions.push(Self::place(
                QuoteSide::Bid,
                &mut self.bid,
                &mut self.registry,
                target.bid,
                sizes.bid,
                self.lifespan,
            ));
        }

        self.ask.working.target_price = target.ask;
        self.bid.working.target_price = target.bid;

        actions
    }

    /// Withdraw from the market: cancel every live order and forget all
    /// per-side tracking, pending replacements included.
    pub fn flatten(&mut self) -> Vec<OrderAction> {
        let mut actions = Vec::new();
        for side in QuoteSide::BOTH {
            let state = self.side_mut(side);
            if let Some(id) = state.working.order_id {
                info!(side = %side, client_order_id = %id, "Flatten: cancelling live quote");
                actions.push(OrderAction::Cancel(CancelOrder {
                    client_order_id: id,
                }));
            }
            *state = SideQuoteState::default();
        }
        actions
    }

    /// Apply an order status update.
    ///
    /// Zero remaining volume means the order is gone. If it was the order
    /// a side was waiting on, the replacement is placed right away at the
    /// side's last target price, unless quoting is halted or the side's
    /// size is zero.
    pub fn on_status(
        &mut self,
        id: ClientOrderId,
        remaining_volume: Volume,
        halted: bool,
        sizes: QuoteSizes,
    ) -> Vec<OrderAction> {
        let mut actions = Vec::new();

        if remaining_volume == 0 {
            for side in QuoteSide::BOTH {
                let lifespan = self.lifespan;
                let (state, registry) = match side {
                    QuoteSide::Ask => (&mut self.ask, &mut self.registry),
                    QuoteSide::Bid => (&mut self.bid, &mut self.registry),
                };

                if state.working.order_id == Some(id) {
                    state.working.order_id = None;
                    state.working.working_volume = 0;
                }

                if state.pending_replacement == Some(id) {
                    state.pending_replacement = None;
                    let size = sizes.for_side(side);
                    let price = state.working.target_price;
                    if !halted && size > 0 && price != 0 && state.working.order_id.is_none() {
                        debug!(
                            side = %side,
                            cancelled = %id,
                            price,
                            size,
                            "Cancel confirmed, placing replacement"
                        );
                        actions.push(Self::place(side, state, registry, price, size, lifespan));
                    } else {
                        debug!(
                            side = %side,
                            cancelled = %id,
                            halted,
                            size,
                            "Cancel confirmed, no replacement"
                        );
                    }
                }
            }
            self.registry.remove(id);
            return actions;
        }

        for side in QuoteSide::BOTH {
            let state = self.side_mut(side);
            if state.working.order_id == Some(id) {
                state.working.working_volume = remaining_volume;
            }
        }

        actions
    }

    /// Allocate an id for a hedge order from the shared counter.
    pub fn allocate_hedge_id(&mut self) -> ClientOrderId {
        self.registry.allocate()
    }

    /// Side an outstanding quote order belongs to.
    pub fn side_of(&self, id: ClientOrderId) -> Option<QuoteSide> {
        self.registry.side_of(id)
    }

    pub fn is_tracked(&self, id: ClientOrderId) -> bool {
        self.registry.is_tracked(id)
    }

    pub fn registry(&self) -> &OrderRegistry {
        &self.registry
    }

    pub fn working(&self, side: QuoteSide) -> &WorkingOrder {
        &self.side(side).working
    }

    pub fn pending_replacement(&self, side: QuoteSide) -> Option<ClientOrderId> {
        self.side(side).pending_replacement
    }

    pub fn side_state(&self, side: QuoteSide) -> SideState {
        self.side(side).state()
    }

    // === Private helpers ===

    fn side(&self, side: QuoteSide) -> &SideQuoteState {
        match side {
            QuoteSide::Ask => &self.ask,
            QuoteSide::Bid => &self.bid,
        }
    }

    fn side_mut(&mut self, side: QuoteSide) -> &mut SideQuoteState {
        match side {
            QuoteSide::Ask => &mut self.ask,
            QuoteSide::Bid => &mut self.bid,
        }
    }

    // === Associated functions (avoid borrow conflicts) ===

    /// Cancel the live order on a side whose target moved and mark it as
    /// the pending replacement. A side without a live order keeps any
    /// earlier pending marker, so a cancel still in flight keeps blocking.
    fn cancel_for_requote(
        side: QuoteSide,
        state: &mut SideQuoteState,
        actions: &mut Vec<OrderAction>,
    ) {
        if let Some(id) = state.working.order_id.take() {
            debug!(side = %side, client_order_id = %id, "Target moved, cancelling quote");
            actions.push(OrderAction::Cancel(CancelOrder {
                client_order_id: id,
            }));
            state.pending_replacement = Some(id);
        }
        state.working.working_volume = 0;
    }

    fn place(
        side: QuoteSide,
        state: &mut SideQuoteState,
        registry: &mut OrderRegistry,
        price: Price,
        volume: Volume,
        lifespan: Lifespan,
    ) -> OrderAction {
        let id = registry.allocate();
        registry.register(id, side);
        state.working = WorkingOrder {
            target_price: price,
            working_volume: volume,
            order_id: Some(id),
        };
        debug!(
            side = %side,
            client_order_id = %id,
            price,
            volume,
            lifespan = %lifespan,
            "Placing quote"
        );
        OrderAction::Insert(InsertOrder {
            client_order_id: id,
            side: side.order_side(),
            price,
            volume,
            lifespan,
        })
    }
}
