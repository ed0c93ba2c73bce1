//! Market-making engine for a single ETF.
//!
//! Turns order-book snapshots and trade ticks into a two-sided quote and
//! keeps at most one live order per side in line with it:
//! - Quote calculation by walking the five-level book
//! - One-tick skew from recent trade-flow imbalance
//! - Cancel/replace lifecycle that waits for cancel confirmation
//! - Position tracking with an offsetting hedge for every fill
//!
//! # Architecture
//!
//! ```text
//! EngineEvent → MarketMaker.handle()
//!                ├─ order book → compute_quote() → FlowSkew.apply()
//!                │                 └─ QuoteManager.reconcile() / flatten()
//!                ├─ trade ticks → TradeFlow
//!                ├─ status / error → QuoteManager.on_status()
//!                └─ fill → InventoryManager.record_fill() → hedge
//!                     ↓
//!                Vec<OrderAction> (insert / cancel / hedge)
//! ```

pub mod config;
pub mod engine;
pub mod flow;
pub mod inventory;
pub mod quote_engine;
pub mod quote_manager;
pub mod sequence;

pub use config::MakerConfig;
pub use engine::{EngineStatus, MarketMaker, TopOfBook};
pub use flow::{FlowSkew, TradeFlow};
pub use inventory::{HedgePrices, InventoryManager, QuoteSizes};
pub use quote_engine::{compute_quote, HaltReason, QuoteOutcome, TargetQuote};
pub use quote_manager::{OrderRegistry, QuoteManager, QuoteSide, SideState, WorkingOrder};
pub use sequence::{FeedKind, SequenceTracker};
