//! Monitor runtime.
//!
//! Wires the pieces together: database connection and schema, status client,
//! change recorder and poller, metrics and tracing. The CLI only parses
//! arguments and hands an [`AppConfig`] to [`run`].

use std::sync::Arc;

use tracing::info;

use crate::application::{ChangeRecorder, StatusPoller};
use crate::config::AppConfig;
use crate::infrastructure::{init_database, init_schema, SeaOrmPortHistoryRepository, StatusApiClient};
use crate::shared::errors::{MonitorError, MonitorResult};
use crate::shared::shutdown::ShutdownSignal;

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the monitor.
#[derive(Debug, Clone, Default)]
pub struct MonitorOptions {
    pub config: AppConfig,
    /// Poll every charger once, then return.
    pub once: bool,
}

/// Connect to the store, make sure the schema exists and build the poller.
pub async fn build_poller(config: &AppConfig) -> MonitorResult<StatusPoller> {
    let db = init_database(&config.database_config()).await?;
    init_schema(&db).await?;

    let repository = Arc::new(SeaOrmPortHistoryRepository::new(db));
    let source = Arc::new(StatusApiClient::new(
        &config.monitor.api_base_url,
        config.request_timeout(),
    )?);

    Ok(StatusPoller::new(config.registry(), source, ChangeRecorder::new(repository))
        .with_config(config.poller_config()))
}

/// Run the monitor until `shutdown` fires or the store fails.
pub async fn run(opts: MonitorOptions, shutdown: ShutdownSignal) -> MonitorResult<()> {
    let config = opts.config;
    config.validate()?;

    info!("Starting charger status monitor...");
    let registry = config.registry();
    info!("Monitoring {} chargers:", registry.len());
    for charger in registry.iter() {
        info!("  - {}", charger);
    }
    info!("Interval: {} seconds", config.monitor.interval_secs);

    if config.metrics.enabled {
        install_metrics_exporter(&config)?;
    }

    let poller = build_poller(&config).await?;

    if opts.once {
        let report = poller.run_cycle(&shutdown).await?;
        info!(
            "Single pass done: {} polled, {} fallbacks, {} stored",
            report.polled, report.fallbacks, report.stored
        );
        return Ok(());
    }

    poller.run(shutdown).await
}

/// Serve Prometheus metrics on `metrics.listen`.
pub fn install_metrics_exporter(config: &AppConfig) -> MonitorResult<()> {
    let addr = config.metrics_addr()?;
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| MonitorError::Metrics(e.to_string()))?;
    info!("📊 Prometheus metrics exporter listening on {}", addr);
    Ok(())
}

pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
