//! Charger monitor - CLI poller
//!
//! Long-running foreground process that polls the configured chargers and
//! records port status transitions in SQLite.
//!
//! ```sh
//! # Run with default config (~/.config/charger-monitor/config.toml)
//! charger-monitor
//!
//! # Custom config path
//! charger-monitor --config /etc/charger-monitor/config.toml
//!
//! # One pass over the fleet, then exit
//! charger-monitor --once
//!
//! # Validate config without starting
//! charger-monitor --check
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use charger_monitor::config::AppConfig;
use charger_monitor::monitor::{init_tracing, run, MonitorOptions};
use charger_monitor::shared::errors::ConfigError;
use charger_monitor::shared::shutdown::{install_signal_handler, ShutdownSignal};

/// Records per-port status transitions of EV charging stations.
#[derive(Parser, Debug)]
#[command(
    name = "charger-monitor",
    version,
    about = "Polls charging stations and stores port status changes",
    long_about = "Polls each configured charging station's status endpoint on a fixed \
                  interval and appends a history row whenever a port's status changes.\n\n\
                  Default config: ~/.config/charger-monitor/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "CHARGER_MONITOR_CONFIG")]
    config: Option<PathBuf>,

    /// Override the poll interval in seconds.
    #[arg(short, long)]
    interval: Option<u64>,

    /// Override the SQLite database file.
    #[arg(long)]
    database: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Poll every charger once and exit.
    #[arg(long)]
    once: bool,

    /// Validate the configuration and exit without polling.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(charger_monitor::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);

    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(ConfigError::CouldNotRead { ref error, .. })
            if error.kind() == std::io::ErrorKind::NotFound =>
        {
            info!(
                "No config file at {}, using defaults",
                config_path.display()
            );
        }
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    if let Some(secs) = cli.interval {
        info!("CLI override: interval = {}s", secs);
        config.monitor.interval_secs = secs;
    }
    if let Some(ref path) = cli.database {
        info!("CLI override: database = {}", path);
        config.database.path = path.clone();
        config.database.url = None;
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        if let Err(e) = config.validate() {
            eprintln!("❌ {}", e);
            return ExitCode::FAILURE;
        }
        println!("✅ Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Endpoint    : {}", config.monitor.api_base_url);
        println!("   Chargers    : {}", config.monitor.chargers.join(", "));
        println!("   Interval    : {}s", config.monitor.interval_secs);
        println!("   Database    : {}", config.database.connection_url());
        println!("   Log level   : {}", config.logging.level);
        return ExitCode::SUCCESS;
    }

    // ── Start polling ──────────────────────────────────────────
    let shutdown = ShutdownSignal::new();
    install_signal_handler(&shutdown);
    if !cli.once {
        info!("Press Ctrl+C to stop");
    }

    match run(
        MonitorOptions {
            config,
            once: cli.once,
        },
        shutdown.clone(),
    )
    .await
    {
        Ok(()) => {
            if shutdown.is_triggered() {
                info!("Monitoring stopped by user");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Unexpected error: {}", e);
            ExitCode::FAILURE
        }
    }
}
