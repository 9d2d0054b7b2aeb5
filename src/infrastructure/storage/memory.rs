//! In-memory port history for development and testing

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::domain::charger::{ChargerId, HistoryRecord, PortHistoryRepository, PortReading};
use crate::shared::errors::StoreResult;

type PortKey = (ChargerId, String);

/// History kept per `(charger, port)`, oldest first.
pub struct InMemoryPortHistory {
    ports: DashMap<PortKey, Vec<HistoryRecord>>,
    id_counter: AtomicI64,
}

impl InMemoryPortHistory {
    pub fn new() -> Self {
        Self {
            ports: DashMap::new(),
            id_counter: AtomicI64::new(1),
        }
    }

    /// Number of stored records across all ports
    pub fn len(&self) -> usize {
        self.ports.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryPortHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PortHistoryRepository for InMemoryPortHistory {
    async fn last_status(
        &self,
        charger: &ChargerId,
        port_id: &str,
    ) -> StoreResult<Option<String>> {
        Ok(self
            .ports
            .get(&(charger.clone(), port_id.to_string()))
            .and_then(|records| records.last().map(|r| r.status.clone())))
    }

    async fn append_if_changed(
        &self,
        charger: &ChargerId,
        observed_at: DateTime<Utc>,
        reading: &PortReading,
    ) -> StoreResult<Option<HistoryRecord>> {
        // The entry guard holds the shard lock across compare and append
        let mut records = self
            .ports
            .entry((charger.clone(), reading.port_id.clone()))
            .or_default();

        if records.last().map(|r| r.status.as_str()) == Some(reading.status.as_str()) {
            return Ok(None);
        }

        let record = HistoryRecord {
            id: self.id_counter.fetch_add(1, Ordering::SeqCst),
            charger: charger.clone(),
            observed_at,
            port_id: reading.port_id.clone(),
            status: reading.status.clone(),
        };
        records.push(record.clone());
        Ok(Some(record))
    }

    async fn history(
        &self,
        charger: &ChargerId,
        port_id: &str,
    ) -> StoreResult<Vec<HistoryRecord>> {
        Ok(self
            .ports
            .get(&(charger.clone(), port_id.to_string()))
            .map(|records| records.value().clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_concurrent_writers_never_duplicate_a_status() {
        let store = Arc::new(InMemoryPortHistory::new());
        let charger = ChargerId::from("NSP-PIC-01");
        let now = Utc::now();

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            let charger = charger.clone();
            tasks.push(tokio::spawn(async move {
                store
                    .append_if_changed(&charger, now, &PortReading::new("A1", "charging"))
                    .await
                    .unwrap()
                    .is_some()
            }));
        }

        let mut stored = 0;
        for task in tasks {
            if task.await.unwrap() {
                stored += 1;
            }
        }
        assert_eq!(stored, 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_history_of_unknown_port_is_empty() {
        let store = InMemoryPortHistory::new();
        let charger = ChargerId::from("NSP-PIC-01");
        assert!(store.history(&charger, "B2").await.unwrap().is_empty());
        assert_eq!(store.last_status(&charger, "B2").await.unwrap(), None);
        assert!(store.is_empty());
    }
}
