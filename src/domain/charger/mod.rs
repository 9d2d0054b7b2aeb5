//! Charger aggregate
//!
//! Contains the charger identity, per-port readings, stored history records,
//! the fleet registry and the history repository interface.

pub mod fleet;
pub mod model;
pub mod repository;

pub use fleet::{FleetRegistry, DEFAULT_CHARGERS};
pub use model::{
    format_timestamp, parse_timestamp, ChargerId, HistoryRecord, PortReading, ERROR_STATUS,
    UNKNOWN,
};
pub use repository::PortHistoryRepository;
