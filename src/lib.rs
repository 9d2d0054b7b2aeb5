//! # Charger Status Monitor
//!
//! Polls charging stations' status endpoint on a fixed interval and stores
//! per-port status transitions in SQLite, never the same status twice in a
//! row for one port.
//!
//! ## Architecture
//!
//! - **domain**: Charger identity, port readings, history records and the
//!   repository / status-source ports
//! - **application**: Change recorder and the poll loop
//! - **infrastructure**: SeaORM store, in-memory store, HTTP status client
//! - **shared**: Error types and shutdown signalling
//! - **monitor**: Runtime wiring, tracing and metrics setup

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod monitor;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, init_schema, DatabaseConfig};

pub use shared::errors::{MonitorError, MonitorResult};
