//! Status Poller Service
//!
//! Walks the fleet registry once per interval, fetching each charger's port
//! readings and handing them to the change recorder.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, info};

use crate::domain::charger::{format_timestamp, FleetRegistry, PortReading};
use crate::domain::ports::StatusSource;
use crate::shared::errors::{MonitorResult, StoreResult};
use crate::shared::shutdown::ShutdownSignal;

use super::recorder::ChangeRecorder;

/// Configuration for the poll loop
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Pause between the end of one pass and the start of the next
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(117),
        }
    }
}

/// Totals for one pass over the registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub polled: usize,
    /// Chargers that produced only the sentinel reading
    pub fallbacks: usize,
    /// History rows appended
    pub stored: usize,
    /// Shutdown arrived before every charger was polled
    pub interrupted: bool,
}

pub struct StatusPoller {
    registry: FleetRegistry,
    source: Arc<dyn StatusSource>,
    recorder: ChangeRecorder,
    config: PollerConfig,
}

impl StatusPoller {
    pub fn new(
        registry: FleetRegistry,
        source: Arc<dyn StatusSource>,
        recorder: ChangeRecorder,
    ) -> Self {
        Self {
            registry,
            source,
            recorder,
            config: PollerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PollerConfig) -> Self {
        self.config = config;
        self
    }

    /// Poll until shutdown. Returns an error only for store failures, which
    /// stop the loop for good.
    pub async fn run(&self, shutdown: ShutdownSignal) -> MonitorResult<()> {
        info!(
            "📡 Status poller started ({} chargers, interval: {}s)",
            self.registry.len(),
            self.config.interval.as_secs()
        );

        loop {
            let report = match self.run_cycle(&shutdown).await {
                Ok(report) => report,
                Err(e) => {
                    error!("Poll cycle aborted: {}", e);
                    return Err(e.into());
                }
            };

            if report.interrupted {
                break;
            }
            debug!(
                "Cycle done: {} polled, {} fallbacks, {} stored",
                report.polled, report.fallbacks, report.stored
            );

            tokio::select! {
                _ = tokio::time::sleep(self.config.interval) => {}
                _ = shutdown.notified().wait() => break,
            }
        }

        info!("📡 Status poller stopped");
        Ok(())
    }

    /// One pass over the registry under a single cycle timestamp.
    pub async fn run_cycle(&self, shutdown: &ShutdownSignal) -> StoreResult<CycleReport> {
        let observed_at = Utc::now();
        let stamp = format_timestamp(&observed_at);
        let mut report = CycleReport::default();

        for charger in &self.registry {
            if shutdown.is_triggered() {
                report.interrupted = true;
                break;
            }

            let readings = tokio::select! {
                readings = self.source.fetch(charger) => readings,
                _ = shutdown.notified().wait() => {
                    report.interrupted = true;
                    break;
                }
            };

            report.polled += 1;
            metrics::counter!("charger_polls_total", "charger" => charger.to_string()).increment(1);
            if readings == [PortReading::sentinel()] {
                report.fallbacks += 1;
            }

            let outcome = self
                .recorder
                .record_outcome(charger, observed_at, &readings)
                .await?;

            if outcome.stored_any() {
                info!("[{}] {}: Status changed - Stored", stamp, charger);
                for record in &outcome.stored {
                    debug!("   port {} -> {}", record.port_id, record.status);
                }
                report.stored += outcome.stored.len();
                metrics::counter!(
                    "charger_transitions_recorded_total",
                    "charger" => charger.to_string()
                )
                .increment(outcome.stored.len() as u64);
            }
        }

        Ok(report)
    }
}
