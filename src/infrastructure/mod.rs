//! Infrastructure layer - external concerns

pub mod database;
pub mod http;
pub mod storage;

pub use database::{init_database, init_schema, DatabaseConfig, SeaOrmPortHistoryRepository};
pub use http::StatusApiClient;
pub use storage::InMemoryPortHistory;
