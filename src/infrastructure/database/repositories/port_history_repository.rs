//! SeaORM implementation of PortHistoryRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::domain::charger::{
    format_timestamp, parse_timestamp, ChargerId, HistoryRecord, PortHistoryRepository,
    PortReading,
};
use crate::infrastructure::database::entities::charger_data;
use crate::shared::errors::{StoreError, StoreResult};

pub struct SeaOrmPortHistoryRepository {
    db: DatabaseConnection,
}

impl SeaOrmPortHistoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn record_from_model(model: charger_data::Model) -> StoreResult<HistoryRecord> {
    let observed_at = parse_timestamp(&model.timestamp).ok_or_else(|| StoreError::Corrupt {
        id: model.id,
        reason: format!("unparsable timestamp '{}'", model.timestamp),
    })?;
    Ok(HistoryRecord {
        id: model.id,
        charger: ChargerId::new(model.charger_name),
        observed_at,
        port_id: model.port_id,
        status: model.port_status,
    })
}

async fn find_last<C: ConnectionTrait>(
    conn: &C,
    charger: &ChargerId,
    port_id: &str,
) -> StoreResult<Option<charger_data::Model>> {
    let last = charger_data::Entity::find()
        .filter(charger_data::Column::ChargerName.eq(charger.as_str()))
        .filter(charger_data::Column::PortId.eq(port_id))
        .order_by_desc(charger_data::Column::Id)
        .limit(1)
        .one(conn)
        .await?;
    Ok(last)
}

// ── PortHistoryRepository impl ──────────────────────────────────

#[async_trait]
impl PortHistoryRepository for SeaOrmPortHistoryRepository {
    async fn last_status(
        &self,
        charger: &ChargerId,
        port_id: &str,
    ) -> StoreResult<Option<String>> {
        Ok(find_last(&self.db, charger, port_id)
            .await?
            .map(|m| m.port_status))
    }

    async fn append_if_changed(
        &self,
        charger: &ChargerId,
        observed_at: DateTime<Utc>,
        reading: &PortReading,
    ) -> StoreResult<Option<HistoryRecord>> {
        // Dropping the transaction on any early return rolls it back
        let txn = self.db.begin().await?;

        let last = find_last(&txn, charger, &reading.port_id).await?;
        if let Some(last) = &last {
            if last.port_status == reading.status {
                debug!(
                    "[{}] port {} unchanged: {}",
                    charger, reading.port_id, reading.status
                );
                txn.commit().await?;
                return Ok(None);
            }
        }

        let model = charger_data::ActiveModel {
            id: NotSet,
            charger_name: Set(charger.as_str().to_string()),
            timestamp: Set(format_timestamp(&observed_at)),
            port_id: Set(reading.port_id.clone()),
            port_status: Set(reading.status.clone()),
        };
        let inserted = model.insert(&txn).await?;
        txn.commit().await?;

        debug!(
            "[{}] port {}: {} -> {} (row {})",
            charger,
            reading.port_id,
            last.as_ref().map(|m| m.port_status.as_str()).unwrap_or("<none>"),
            reading.status,
            inserted.id
        );
        record_from_model(inserted).map(Some)
    }

    async fn history(
        &self,
        charger: &ChargerId,
        port_id: &str,
    ) -> StoreResult<Vec<HistoryRecord>> {
        charger_data::Entity::find()
            .filter(charger_data::Column::ChargerName.eq(charger.as_str()))
            .filter(charger_data::Column::PortId.eq(port_id))
            .order_by_asc(charger_data::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(record_from_model)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::{init_database, init_schema, DatabaseConfig};
    use chrono::TimeZone;

    async fn repo() -> SeaOrmPortHistoryRepository {
        let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
        init_schema(&db).await.unwrap();
        SeaOrmPortHistoryRepository::new(db)
    }

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, minute, 0).unwrap()
    }

    #[tokio::test]
    async fn test_first_observation_is_stored() {
        let repo = repo().await;
        let charger = ChargerId::from("NSP-BRI-01");

        assert_eq!(repo.last_status(&charger, "A1").await.unwrap(), None);

        let stored = repo
            .append_if_changed(&charger, at(0), &PortReading::new("A1", "available"))
            .await
            .unwrap()
            .expect("first reading stored");
        assert_eq!(stored.charger, charger);
        assert_eq!(stored.port_id, "A1");
        assert_eq!(stored.status, "available");
        assert_eq!(stored.observed_at, at(0));
        assert_eq!(
            repo.last_status(&charger, "A1").await.unwrap().as_deref(),
            Some("available")
        );
    }

    #[tokio::test]
    async fn test_unchanged_status_is_skipped() {
        let repo = repo().await;
        let charger = ChargerId::from("NSP-BRI-01");
        let reading = PortReading::new("A1", "available");

        assert!(repo.append_if_changed(&charger, at(0), &reading).await.unwrap().is_some());
        assert!(repo.append_if_changed(&charger, at(2), &reading).await.unwrap().is_none());
        assert_eq!(repo.history(&charger, "A1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_change_appends_with_increasing_id() {
        let repo = repo().await;
        let charger = ChargerId::from("NSP-BRI-01");

        let first = repo
            .append_if_changed(&charger, at(0), &PortReading::new("A1", "available"))
            .await
            .unwrap()
            .unwrap();
        let second = repo
            .append_if_changed(&charger, at(2), &PortReading::new("A1", "charging"))
            .await
            .unwrap()
            .unwrap();
        // Back to a status seen before, but not the latest one
        let third = repo
            .append_if_changed(&charger, at(4), &PortReading::new("A1", "available"))
            .await
            .unwrap()
            .unwrap();

        assert!(first.id < second.id && second.id < third.id);
        let statuses: Vec<String> = repo
            .history(&charger, "A1")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.status)
            .collect();
        assert_eq!(statuses, vec!["available", "charging", "available"]);
    }

    #[tokio::test]
    async fn test_status_comparison_is_case_sensitive() {
        let repo = repo().await;
        let charger = ChargerId::from("NSP-MAS-01");

        repo.append_if_changed(&charger, at(0), &PortReading::new("1", "Available"))
            .await
            .unwrap();
        let stored = repo
            .append_if_changed(&charger, at(2), &PortReading::new("1", "available"))
            .await
            .unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn test_ports_and_chargers_are_tracked_separately() {
        let repo = repo().await;
        let bri = ChargerId::from("NSP-BRI-01");
        let mas = ChargerId::from("NSP-MAS-01");
        let reading = PortReading::new("A1", "available");

        assert!(repo.append_if_changed(&bri, at(0), &reading).await.unwrap().is_some());
        assert!(repo.append_if_changed(&mas, at(0), &reading).await.unwrap().is_some());
        assert!(repo
            .append_if_changed(&bri, at(0), &PortReading::new("A2", "available"))
            .await
            .unwrap()
            .is_some());

        assert_eq!(repo.history(&bri, "A1").await.unwrap().len(), 1);
        assert_eq!(repo.history(&bri, "A2").await.unwrap().len(), 1);
        assert_eq!(repo.history(&mas, "A1").await.unwrap().len(), 1);
    }
}
