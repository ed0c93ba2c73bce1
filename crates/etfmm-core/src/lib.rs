//! Core domain types for the ETF market-making engine.
//!
//! This crate provides fundamental types shared by the engine and its host:
//! - `Instrument`, `Side`, `Lifespan`: Trading enums
//! - `ClientOrderId`: Client-assigned order identifier
//! - `BookUpdate`: Five-level price/volume ladders (snapshots and trade ticks)
//! - `EngineEvent` / `OrderAction`: Inbound events and outbound order actions
//! - Tick rounding helpers for admissible price bounds

pub mod error;
pub mod event;
pub mod execution;
pub mod market;
pub mod order;
pub mod types;

pub use error::{CoreError, Result};
pub use event::EngineEvent;
pub use execution::{CancelOrder, HedgeOrder, InsertOrder, OrderAction};
pub use market::{
    round_down_to_tick, round_up_to_tick, Instrument, MAXIMUM_ASK, MINIMUM_BID, TOP_LEVEL_COUNT,
};
pub use order::{ClientOrderId, Lifespan, Side};
pub use types::{BookUpdate, LadderState, Price, Volume};
