//! Prometheus metrics for the ETF market maker.
//!
//! Covers:
//! - Events processed and rejected input lines
//! - Order actions (inserts, cancels, hedges) by side
//! - Quote fills by side
//! - Halts, exchange errors, sequence anomalies
//! - Position and halted state
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. A failure means duplicate metric
//! names, which must crash at startup. These panics only occur during
//! static initialization, never at runtime.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_int_counter, register_int_gauge, CounterVec, Encoder,
    IntCounter, IntGauge, TextEncoder,
};

use crate::error::{TelemetryError, TelemetryResult};

/// Inbound events processed.
/// Labels: kind (order_book/trade_ticks/order_filled/...)
pub static EVENTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "etfmm_events_total",
        "Total inbound events processed",
        &["kind"]
    )
    .unwrap()
});

/// Input lines that could not be decoded.
pub static MALFORMED_EVENTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "etfmm_malformed_events_total",
        "Total input lines that failed to decode"
    )
    .unwrap()
});

/// Quote orders inserted.
pub static ORDERS_INSERTED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "etfmm_orders_inserted_total",
        "Total quote orders inserted",
        &["side"]
    )
    .unwrap()
});

/// Cancel requests sent.
pub static ORDERS_CANCELLED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "etfmm_orders_cancelled_total",
        "Total cancel requests sent",
        &["side"]
    )
    .unwrap()
});

/// Hedge orders sent.
pub static HEDGES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "etfmm_hedges_total",
        "Total hedge orders sent",
        &["side"]
    )
    .unwrap()
});

/// Quote fills.
pub static FILLS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!("etfmm_fills_total", "Total quote fills", &["side"]).unwrap()
});

/// Transitions into the halted state.
pub static HALTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("etfmm_halts_total", "Total quoting halts").unwrap()
});

/// Exchange errors received.
pub static ERRORS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("etfmm_errors_total", "Total exchange errors received").unwrap()
});

/// Non-increasing feed sequence numbers.
pub static SEQUENCE_ANOMALIES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "etfmm_sequence_anomalies_total",
        "Total non-increasing feed sequence numbers"
    )
    .unwrap()
});

/// Net position in lots.
pub static POSITION: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!("etfmm_position", "Net position in lots").unwrap()
});

/// Quoting halted (1 = halted).
pub static HALTED: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!("etfmm_halted", "Quoting halted (1=halted)").unwrap()
});

/// Metrics facade for easy access.
pub struct Metrics;

impl Metrics {
    pub fn event_processed(kind: &str) {
        EVENTS_TOTAL.with_label_values(&[kind]).inc();
    }

    pub fn malformed_event() {
        MALFORMED_EVENTS_TOTAL.inc();
    }

    /// Record a quote insert. `side` is "buy" or "sell".
    pub fn order_inserted(side: &str) {
        ORDERS_INSERTED_TOTAL.with_label_values(&[side]).inc();
    }

    pub fn order_cancelled(side: &str) {
        ORDERS_CANCELLED_TOTAL.with_label_values(&[side]).inc();
    }

    pub fn hedge_sent(side: &str) {
        HEDGES_TOTAL.with_label_values(&[side]).inc();
    }

    pub fn fill(side: &str) {
        FILLS_TOTAL.with_label_values(&[side]).inc();
    }

    pub fn halted() {
        HALTS_TOTAL.inc();
    }

    pub fn exchange_error() {
        ERRORS_TOTAL.inc();
    }

    /// Add `count` newly observed sequence anomalies.
    pub fn sequence_anomalies(count: u64) {
        SEQUENCE_ANOMALIES_TOTAL.inc_by(count);
    }

    pub fn position(lots: i64) {
        POSITION.set(lots);
    }

    pub fn halted_state(is_halted: bool) {
        HALTED.set(i64::from(is_halted));
    }

    /// Render all registered metrics in the Prometheus text format.
    pub fn render() -> TelemetryResult<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&prometheus::gather(), &mut buffer)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}
