//! Change-detecting recorder
//!
//! Turns one poll's readings into history rows, appending only where a port's
//! status differs from the last one stored for it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::debug;

use crate::domain::charger::{ChargerId, HistoryRecord, PortHistoryRepository, PortReading};
use crate::shared::errors::StoreResult;

/// What one `record` call did, per reading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordOutcome {
    /// Rows appended, in reading order
    pub stored: Vec<HistoryRecord>,
    /// Readings that matched the last stored status
    pub unchanged: usize,
}

impl RecordOutcome {
    pub fn stored_any(&self) -> bool {
        !self.stored.is_empty()
    }
}

#[derive(Clone)]
pub struct ChangeRecorder {
    repository: Arc<dyn PortHistoryRepository>,
}

impl ChangeRecorder {
    pub fn new(repository: Arc<dyn PortHistoryRepository>) -> Self {
        Self { repository }
    }

    /// Returns whether any reading produced a new history row.
    pub async fn record(
        &self,
        charger: &ChargerId,
        observed_at: DateTime<Utc>,
        readings: &[PortReading],
    ) -> StoreResult<bool> {
        Ok(self
            .record_outcome(charger, observed_at, readings)
            .await?
            .stored_any())
    }

    /// Each reading is decided on its own; a store error aborts the rest.
    pub async fn record_outcome(
        &self,
        charger: &ChargerId,
        observed_at: DateTime<Utc>,
        readings: &[PortReading],
    ) -> StoreResult<RecordOutcome> {
        let mut outcome = RecordOutcome::default();

        for reading in readings {
            match self
                .repository
                .append_if_changed(charger, observed_at, reading)
                .await?
            {
                Some(record) => outcome.stored.push(record),
                None => outcome.unchanged += 1,
            }
        }

        debug!(
            "[{}] {} reading(s): {} stored, {} unchanged",
            charger,
            readings.len(),
            outcome.stored.len(),
            outcome.unchanged
        );
        Ok(outcome)
    }
}
