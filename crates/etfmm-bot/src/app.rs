//! Event replay driver.
//!
//! Reads one JSON event per line, dispatches it into the engine and
//! writes each resulting order action as one JSON line:
//! - Blank lines are skipped
//! - Undecodable lines are logged, counted and skipped
//! - Metrics are updated from the actions and engine state after each event

use crate::config::AppConfig;
use crate::error::AppResult;
use etfmm_core::{EngineEvent, OrderAction, Side};
use etfmm_mm::{EngineStatus, MarketMaker};
use etfmm_telemetry::Metrics;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, info, warn};

/// Counters for one replay run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub lines: u64,
    pub events: u64,
    pub malformed: u64,
    pub inserts: u64,
    pub cancels: u64,
    pub hedges: u64,
}

impl RunStats {
    pub fn actions(&self) -> u64 {
        self.inserts + self.cancels + self.hedges
    }
}

/// Main application.
pub struct Application {
    config: AppConfig,
    engine: MarketMaker,
    stats: RunStats,
}

impl Application {
    /// Create the application and its engine.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let engine = MarketMaker::new(config.maker.clone())?;
        Ok(Self {
            config,
            engine,
            stats: RunStats::default(),
        })
    }

    pub fn engine(&self) -> &MarketMaker {
        &self.engine
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Replay from `input` (a file path, or stdin when `None` or `-`) to stdout.
    pub async fn run(&mut self, input: Option<&str>) -> AppResult<RunStats> {
        let stdout = BufWriter::new(tokio::io::stdout());
        match input {
            Some(path) if path != "-" => {
                info!(input = %path, "Replaying events from file");
                let file = tokio::fs::File::open(path).await?;
                self.run_stream(BufReader::new(file), stdout).await
            }
            _ => {
                info!("Replaying events from stdin");
                self.run_stream(BufReader::new(tokio::io::stdin()), stdout)
                    .await
            }
        }
    }

    /// Replay every line of `reader`, writing actions to `writer`.
    pub async fn run_stream<R, W>(&mut self, reader: R, mut writer: W) -> AppResult<RunStats>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            self.stats.lines += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let event = match EngineEvent::from_json(trimmed) {
                Ok(event) => event,
                Err(e) => {
                    self.stats.malformed += 1;
                    Metrics::malformed_event();
                    warn!(line = self.stats.lines, error = %e, "Skipping undecodable event");
                    continue;
                }
            };

            let actions = self.process(&event);
            for action in &actions {
                let mut encoded = serde_json::to_vec(action)?;
                encoded.push(b'\n');
                writer.write_all(&encoded).await?;
            }
            if self.config.replay.flush_each_event && !actions.is_empty() {
                writer.flush().await?;
            }
        }

        writer.flush().await?;

        let status = self.engine.status();
        info!(
            lines = self.stats.lines,
            events = self.stats.events,
            malformed = self.stats.malformed,
            inserts = self.stats.inserts,
            cancels = self.stats.cancels,
            hedges = self.stats.hedges,
            position = status.position,
            halted = status.halted,
            sequence_anomalies = status.sequence_anomalies,
            "Replay finished"
        );

        if self.config.replay.print_metrics {
            info!(metrics = %Metrics::render()?, "Metrics snapshot");
        }

        Ok(self.stats.clone())
    }

    /// Dispatch one event and record metrics for what it produced.
    pub fn process(&mut self, event: &EngineEvent) -> Vec<OrderAction> {
        let before = self.engine.status();
        let actions = self.engine.handle(event);
        let after = self.engine.status();

        self.stats.events += 1;
        Metrics::event_processed(event.kind());
        if matches!(event, EngineEvent::Error { .. }) {
            Metrics::exchange_error();
        }

        for action in &actions {
            match action {
                OrderAction::Insert(order) => {
                    self.stats.inserts += 1;
                    Metrics::order_inserted(side_label(order.side));
                }
                OrderAction::Cancel(cancel) => {
                    self.stats.cancels += 1;
                    Metrics::order_cancelled(side_label(cancelled_side(
                        &before,
                        cancel.client_order_id,
                    )));
                }
                OrderAction::Hedge(hedge) => {
                    self.stats.hedges += 1;
                    Metrics::hedge_sent(side_label(hedge.side));
                    // A hedge offsets the quote fill on the opposite side.
                    Metrics::fill(side_label(hedge.side.opposite()));
                }
            }
        }

        if after.halted && !before.halted {
            Metrics::halted();
        }
        if after.sequence_anomalies > before.sequence_anomalies {
            Metrics::sequence_anomalies(after.sequence_anomalies - before.sequence_anomalies);
        }
        Metrics::position(after.position);
        Metrics::halted_state(after.halted);

        debug!(kind = event.kind(), actions = actions.len(), "Event processed");
        actions
    }
}

/// Cancels only ever target the live order of one side.
fn cancelled_side(before: &EngineStatus, id: etfmm_core::ClientOrderId) -> Side {
    if before.ask.order_id == Some(id) {
        Side::Sell
    } else {
        Side::Buy
    }
}

fn side_label(side: Side) -> &'static str {
    match side {
        Side::Buy => "buy",
        Side::Sell => "sell",
    }
}
