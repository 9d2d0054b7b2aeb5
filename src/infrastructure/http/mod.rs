//! Outbound HTTP adapters

pub mod status_client;

pub use status_client::{extract_port_readings, readings_or_sentinel, StatusApiClient};
