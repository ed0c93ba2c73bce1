//! Application configuration.

use crate::error::{AppError, AppResult};
use etfmm_mm::MakerConfig;
use serde::{Deserialize, Serialize};

/// Replay driver options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Flush the action stream after every event (useful when piping).
    #[serde(default = "default_flush_each_event")]
    pub flush_each_event: bool,

    /// Log the Prometheus text dump when the stream ends.
    #[serde(default)]
    pub print_metrics: bool,
}

fn default_flush_each_event() -> bool {
    true
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            flush_each_event: default_flush_each_event(),
            print_metrics: false,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Engine parameters.
    #[serde(default)]
    pub maker: MakerConfig,

    #[serde(default)]
    pub replay: ReplayConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text and validate the engine section.
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.maker.validate()?;
        Ok(config)
    }
}
