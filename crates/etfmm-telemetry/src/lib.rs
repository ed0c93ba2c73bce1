//! Prometheus metrics and structured logging for the ETF market maker.
//!
//! - Structured logging with tracing (JSON in production)
//! - Prometheus counters and gauges for engine activity

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
