pub mod charger;
pub mod ports;

// Re-export commonly used types
pub use charger::{
    ChargerId, FleetRegistry, HistoryRecord, PortHistoryRepository, PortReading, ERROR_STATUS,
    UNKNOWN,
};
pub use ports::StatusSource;
