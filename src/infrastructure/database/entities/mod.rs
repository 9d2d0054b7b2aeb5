//! Database entities module

pub mod charger_data;

pub use charger_data::Entity as ChargerData;
