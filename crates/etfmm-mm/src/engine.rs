//! Event-driven market-making engine.
//!
//! `MarketMaker` owns all strategy state and is driven one event at a time
//! by the host. Each handler mutates state and returns the order actions
//! the host must send, in order.

use etfmm_core::{BookUpdate, ClientOrderId, EngineEvent, Instrument, OrderAction, Price, Volume};
use tracing::{debug, info, warn};

use crate::config::MakerConfig;
use crate::flow::{FlowSkew, TradeFlow};
use crate::inventory::InventoryManager;
use crate::quote_engine::{compute_quote, QuoteOutcome};
use crate::quote_manager::{QuoteManager, QuoteSide, WorkingOrder};
use crate::sequence::{FeedKind, SequenceTracker};

/// Best prices of the hedge reference instrument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TopOfBook {
    pub best_ask: Price,
    pub best_bid: Price,
}

/// Read-only view of engine state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineStatus {
    pub position: i64,
    pub halted: bool,
    pub connected: bool,
    pub ask: WorkingOrder,
    pub bid: WorkingOrder,
    pub ask_pending: Option<ClientOrderId>,
    pub bid_pending: Option<ClientOrderId>,
    pub outstanding_asks: usize,
    pub outstanding_bids: usize,
    pub fill_count: u64,
    pub hedges_sent: u64,
    pub hedge_fill_count: u64,
    pub hedged_volume: Volume,
    pub sequence_anomalies: u64,
    pub hedge_reference: Option<TopOfBook>,
}

/// The market-making state machine.
#[derive(Debug)]
pub struct MarketMaker {
    config: MakerConfig,
    quotes: QuoteManager,
    inventory: InventoryManager,
    flow: TradeFlow,
    sequences: SequenceTracker,
    halted: bool,
    connected: bool,
    last_book: Option<BookUpdate>,
    hedge_reference: Option<TopOfBook>,
}

impl MarketMaker {
    /// Create an engine. Fails if the configuration is unusable.
    pub fn new(config: MakerConfig) -> etfmm_core::Result<Self> {
        config.validate()?;
        let inventory = InventoryManager::new(&config);
        let hedge_prices = inventory.hedge_prices();
        info!(
            instrument = %config.tradable_instrument,
            tick_size = config.tick_size,
            target_spread = config.target_spread,
            order_capacity = config.order_capacity,
            hedge_buy_price = hedge_prices.near_minimum_bid,
            hedge_sell_price = hedge_prices.near_maximum_ask,
            "Market maker initialized"
        );
        Ok(Self {
            quotes: QuoteManager::new(config.lifespan),
            inventory,
            flow: TradeFlow::new(),
            sequences: SequenceTracker::new(),
            halted: false,
            connected: true,
            last_book: None,
            hedge_reference: None,
            config,
        })
    }

    /// Dispatch one inbound event.
    pub fn handle(&mut self, event: &EngineEvent) -> Vec<OrderAction> {
        match event {
            EngineEvent::OrderBook(book) => self.on_order_book(book),
            EngineEvent::TradeTicks(ticks) => {
                self.on_trade_ticks(ticks);
                Vec::new()
            }
            EngineEvent::OrderFilled {
                client_order_id,
                price,
                volume,
            } => self.on_order_filled(*client_order_id, *price, *volume),
            EngineEvent::OrderStatus {
                client_order_id,
                fill_volume,
                remaining_volume,
                fees,
            } => self.on_order_status(*client_order_id, *fill_volume, *remaining_volume, *fees),
            EngineEvent::Error {
                client_order_id,
                message,
            } => self.on_error(*client_order_id, message),
            EngineEvent::HedgeFilled {
                client_order_id,
                price,
                volume,
            } => {
                self.on_hedge_filled(*client_order_id, *price, *volume);
                Vec::new()
            }
            EngineEvent::Disconnect => {
                self.on_disconnect();
                Vec::new()
            }
        }
    }

    /// Order-book snapshot: recompute the quote and reconcile orders.
    ///
    /// Snapshots of any instrument other than the tradable one only update
    /// the hedge reference prices.
    pub fn on_order_book(&mut self, book: &BookUpdate) -> Vec<OrderAction> {
        self.check_sequence(book.instrument, FeedKind::OrderBook, book.sequence);

        if book.instrument != self.config.tradable_instrument {
            self.hedge_reference = Some(TopOfBook {
                best_ask: book.best_ask(),
                best_bid: book.best_bid(),
            });
            return Vec::new();
        }

        let actions = match compute_quote(book, &self.config) {
            QuoteOutcome::Halt(reason) => {
                if !self.halted {
                    info!(
                        reason = %reason,
                        ladder = %book.state(),
                        sequence = book.sequence,
                        "Quoting halted, flattening both sides"
                    );
                }
                self.halted = true;
                self.quotes.flatten()
            }
            QuoteOutcome::Quote(quote) => {
                if self.halted {
                    info!(sequence = book.sequence, "Quoting resumed");
                }
                self.halted = false;

                let skew = self.flow.skew(&self.config);
                if skew != FlowSkew::Neutral {
                    debug!(
                        ?skew,
                        buy_volume = self.flow.buy_volume,
                        sell_volume = self.flow.sell_volume,
                        "Trade flow skew applied"
                    );
                }
                let target = skew.apply(quote, self.config.tick_size);
                debug!(
                    sequence = book.sequence,
                    ask = target.ask,
                    bid = target.bid,
                    spread = target.spread(),
                    ask_depth = target.ask_depth,
                    bid_depth = target.bid_depth,
                    "Target quote"
                );
                self.quotes.reconcile(&target, self.inventory.quote_sizes())
            }
        };

        self.flow.reset();
        self.last_book = Some(book.clone());
        actions
    }

    /// Trade ticks: accumulate traded volume for the next snapshot.
    pub fn on_trade_ticks(&mut self, ticks: &BookUpdate) {
        self.check_sequence(ticks.instrument, FeedKind::TradeTicks, ticks.sequence);
        if ticks.instrument == self.config.tradable_instrument {
            self.flow.record_ticks(ticks);
        }
    }

    /// One of our quotes traded: move the position and hedge the volume.
    pub fn on_order_filled(
        &mut self,
        client_order_id: ClientOrderId,
        price: Price,
        volume: Volume,
    ) -> Vec<OrderAction> {
        let Some(side) = self.quotes.side_of(client_order_id) else {
            warn!(
                client_order_id = %client_order_id,
                price,
                volume,
                "Fill for unknown order ignored"
            );
            return Vec::new();
        };

        let hedge_id = self.quotes.allocate_hedge_id();
        let hedge = self.inventory.record_fill(side, volume, hedge_id);
        info!(
            side = %side,
            client_order_id = %client_order_id,
            price,
            volume,
            position = self.inventory.position(),
            hedge_id = %hedge.client_order_id,
            hedge_side = %hedge.side,
            hedge_price = hedge.price,
            "Quote filled, hedging"
        );
        vec![OrderAction::Hedge(hedge)]
    }

    /// Order status update.
    pub fn on_order_status(
        &mut self,
        client_order_id: ClientOrderId,
        fill_volume: Volume,
        remaining_volume: Volume,
        fees: i64,
    ) -> Vec<OrderAction> {
        debug!(
            client_order_id = %client_order_id,
            fill_volume,
            remaining_volume,
            fees,
            "Order status"
        );
        self.quotes.on_status(
            client_order_id,
            remaining_volume,
            self.halted,
            self.inventory.quote_sizes(),
        )
    }

    /// Exchange error. Errors about one of our quotes end that order.
    pub fn on_error(&mut self, client_order_id: ClientOrderId, message: &str) -> Vec<OrderAction> {
        if client_order_id.is_unassigned() {
            warn!(error = %message, "Exchange error");
            return Vec::new();
        }
        if !self.quotes.is_tracked(client_order_id) {
            warn!(
                client_order_id = %client_order_id,
                error = %message,
                "Exchange error for untracked order"
            );
            return Vec::new();
        }
        warn!(
            client_order_id = %client_order_id,
            error = %message,
            "Order rejected, treating as closed"
        );
        self.on_order_status(client_order_id, 0, 0, 0)
    }

    /// One of our hedges traded. Position already moved on the quote fill.
    pub fn on_hedge_filled(
        &mut self,
        client_order_id: ClientOrderId,
        price: Price,
        volume: Volume,
    ) {
        self.inventory.record_hedge_fill(volume);
        info!(
            client_order_id = %client_order_id,
            price,
            volume,
            hedged_volume = self.inventory.hedged_volume(),
            "Hedge filled"
        );
    }

    /// Execution connection lost. State is kept.
    pub fn on_disconnect(&mut self) {
        if self.connected {
            warn!("execution connection lost");
        }
        self.connected = false;
    }

    pub fn status(&self) -> EngineStatus {
        let registry = self.quotes.registry();
        EngineStatus {
            position: self.inventory.position(),
            halted: self.halted,
            connected: self.connected,
            ask: self.quotes.working(QuoteSide::Ask).clone(),
            bid: self.quotes.working(QuoteSide::Bid).clone(),
            ask_pending: self.quotes.pending_replacement(QuoteSide::Ask),
            bid_pending: self.quotes.pending_replacement(QuoteSide::Bid),
            outstanding_asks: registry.count(QuoteSide::Ask),
            outstanding_bids: registry.count(QuoteSide::Bid),
            fill_count: self.inventory.fill_count(),
            hedges_sent: self.inventory.hedges_sent(),
            hedge_fill_count: self.inventory.hedge_fill_count(),
            hedged_volume: self.inventory.hedged_volume(),
            sequence_anomalies: self.sequences.anomalies(),
            hedge_reference: self.hedge_reference,
        }
    }

    pub fn config(&self) -> &MakerConfig {
        &self.config
    }

    pub fn position(&self) -> i64 {
        self.inventory.position()
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Last processed snapshot of the tradable instrument.
    pub fn last_book(&self) -> Option<&BookUpdate> {
        self.last_book.as_ref()
    }

    pub fn sequence_anomalies(&self) -> u64 {
        self.sequences.anomalies()
    }

    fn check_sequence(&mut self, instrument: Instrument, feed: FeedKind, sequence: u64) {
        if let Some(previous) = self.sequences.observe(instrument, feed, sequence) {
            warn!(
                instrument = %instrument,
                feed = %feed,
                sequence,
                previous,
                "Non-increasing sequence number"
            );
        }
    }
}
