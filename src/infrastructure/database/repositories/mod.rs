//! SeaORM repository implementations

mod port_history_repository;

pub use port_history_repository::SeaOrmPortHistoryRepository;
