//! Port history repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{ChargerId, HistoryRecord, PortReading};
use crate::shared::errors::StoreResult;

#[async_trait]
pub trait PortHistoryRepository: Send + Sync {
    /// Status of the newest record for this port, if any.
    async fn last_status(&self, charger: &ChargerId, port_id: &str)
        -> StoreResult<Option<String>>;

    /// Append `reading` unless it repeats the port's last stored status.
    ///
    /// The lookup and the insert form one atomic decision: two callers racing
    /// on the same port can never both append the same status.
    async fn append_if_changed(
        &self,
        charger: &ChargerId,
        observed_at: DateTime<Utc>,
        reading: &PortReading,
    ) -> StoreResult<Option<HistoryRecord>>;

    /// Full history of one port, oldest first.
    async fn history(&self, charger: &ChargerId, port_id: &str) -> StoreResult<Vec<HistoryRecord>>;
}
