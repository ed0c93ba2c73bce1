//! Host adapter for the ETF market-making engine.
//!
//! Reads newline-delimited JSON events, feeds them one at a time into
//! the engine and writes every resulting order action as a JSON line.

pub mod app;
pub mod config;
pub mod error;

pub use app::{Application, RunStats};
pub use config::{AppConfig, ReplayConfig};
pub use error::{AppError, AppResult};
