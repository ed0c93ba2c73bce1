//! ETF market maker - replay host entry point.
//!
//! Streams JSON-lines events through the engine and prints the resulting
//! order actions as JSON lines on stdout.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// ETF market-making engine replay host
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via ETFMM_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Event input file, one JSON event per line ("-" or omitted for stdin)
    #[arg(short, long)]
    input: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    etfmm_telemetry::init_logging()?;

    info!("Starting ETF market maker v{}", env!("CARGO_PKG_VERSION"));

    // Config path: CLI arg > ETFMM_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("ETFMM_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    info!(config_path = %config_path, "Loading configuration");
    let config = etfmm_bot::AppConfig::from_file(&config_path)?;
    info!(
        instrument = %config.maker.tradable_instrument,
        target_spread = config.maker.target_spread,
        "Configuration loaded"
    );

    let mut app = etfmm_bot::Application::new(config)?;
    let stats = app.run(args.input.as_deref()).await?;
    info!(events = stats.events, actions = stats.actions(), "Shutdown complete");

    Ok(())
}
