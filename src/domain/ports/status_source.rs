//! Status source port: where current port readings come from

use async_trait::async_trait;

use crate::domain::charger::{ChargerId, PortReading};

// ── StatusSource ───────────────────────────────────────────────

/// Port for observing the current state of one charger.
///
/// Implementations absorb every upstream failure into data:
/// - the returned list is never empty
/// - when no real reading can be extracted it is exactly
///   `[PortReading::sentinel()]`
/// - nothing is retried within one call; the next poll cycle is the retry
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self, charger: &ChargerId) -> Vec<PortReading>;
}
